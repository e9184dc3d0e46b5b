//! Builder to assemble and start a kitchen from configuration.

use std::sync::Arc;

use crate::config::{KitchenConfig, ReferenceData};
use crate::core::{DistributionSink, EventJournal, Kitchen, KitchenError, OrderQueue, Spawn};
use crate::infra::queue::InMemoryOrderQueue;

/// Collects the kitchen's collaborators before starting it.
pub struct KitchenBuilder {
    name: String,
    config: KitchenConfig,
    reference: Option<ReferenceData>,
    sink: Option<Arc<dyn DistributionSink>>,
    journal: Option<Arc<dyn EventJournal>>,
    queue: Option<Box<dyn OrderQueue>>,
}

impl KitchenBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: KitchenConfig::default(),
            reference: None,
            sink: None,
            journal: None,
            queue: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: KitchenConfig) -> Self {
        self.config = config;
        self
    }

    /// Use already loaded reference data instead of reading
    /// `config.reference_dir`.
    #[must_use]
    pub fn with_reference(mut self, reference: ReferenceData) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Where completed distributions go. Required.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DistributionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Record order lifecycle events.
    #[must_use]
    pub fn with_journal(mut self, journal: Arc<dyn EventJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Replace the in-memory admission queue.
    #[must_use]
    pub fn with_queue(mut self, queue: Box<dyn OrderQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Kitchen name used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the kitchen will start with.
    #[must_use]
    pub const fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Validate everything and start the kitchen on `spawner`.
    ///
    /// # Errors
    ///
    /// `Config` when the configuration is invalid or no sink was given,
    /// `ReferenceData` when reference data fails to load or validate.
    pub fn start<S>(self, spawner: S) -> Result<Kitchen<S>, KitchenError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        self.config
            .validate()
            .map_err(|e| KitchenError::Config(format!("kitchen `{}`: {e}", self.name)))?;
        let sink = self.sink.ok_or_else(|| {
            KitchenError::Config(format!("kitchen `{}` has no distribution sink", self.name))
        })?;
        let reference = match self.reference {
            Some(reference) => reference,
            None => ReferenceData::load_dir(&self.config.reference_dir)?,
        };
        let queue = self.queue.unwrap_or_else(|| {
            Box::new(InMemoryOrderQueue::with_capacity(
                self.config.nr_of_tables as usize,
            ))
        });
        tracing::info!(kitchen = %self.name, "starting kitchen");
        Kitchen::start(self.config, reference, sink, self.journal, queue, spawner)
    }
}

/// Sink delivering to the configured dining hall with retries and an
/// optional JSONL dead letter.
///
/// # Errors
///
/// `Io` if the dead-letter directory cannot be created.
#[cfg(feature = "http")]
pub fn dining_hall_sink(
    config: &KitchenConfig,
) -> Result<crate::infra::RetryingSink<crate::infra::HttpSink>, KitchenError> {
    use crate::infra::{HttpSink, JsonlDeadLetter, RetryPolicy, RetryingSink};

    let sink = RetryingSink::new(
        HttpSink::new(&config.dining_hall_url),
        RetryPolicy::from(&config.delivery),
    );
    Ok(match &config.delivery.dead_letter_path {
        Some(path) => sink.with_dead_letter(Arc::new(JsonlDeadLetter::new(path)?)),
        None => sink,
    })
}
