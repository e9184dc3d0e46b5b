//! Retry with exponential backoff, then dead-letter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DeliveryConfig;
use crate::core::{Distribution, DistributionSink, KitchenError};
use crate::infra::dead_letter::{DeadLetter, DeadLetterStore};

/// How often and how patiently to retry a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts including the first.
    pub max_attempts: u32,
    /// Wait after the first failure.
    pub initial_backoff: Duration,
    /// Cap on the wait between attempts.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Wait before attempt `attempt + 1`, given `attempt` failures so far.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl From<&DeliveryConfig> for RetryPolicy {
    fn from(cfg: &DeliveryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            initial_backoff: Duration::from_millis(cfg.initial_backoff_ms),
            max_backoff: Duration::from_millis(cfg.max_backoff_ms),
        }
    }
}

/// Wraps a sink with retries and an optional dead-letter store.
pub struct RetryingSink<S> {
    inner: S,
    policy: RetryPolicy,
    dead_letter: Option<Arc<dyn DeadLetterStore>>,
}

impl<S> RetryingSink<S>
where
    S: DistributionSink,
{
    /// Retry `inner` according to `policy`.
    #[must_use]
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            dead_letter: None,
        }
    }

    /// Keep undeliverable distributions in `store`.
    #[must_use]
    pub fn with_dead_letter(mut self, store: Arc<dyn DeadLetterStore>) -> Self {
        self.dead_letter = Some(store);
        self
    }

    /// The wrapped sink.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Hand the distribution to the dead-letter store on the blocking pool.
    async fn bury(&self, distribution: &Distribution, attempts: u32, reason: &str) {
        let Some(store) = &self.dead_letter else {
            return;
        };
        let order_id = distribution.order_id();
        let store = Arc::clone(store);
        let letter = DeadLetter::new(distribution.clone(), attempts, reason);
        let stored = tokio::task::spawn_blocking(move || store.store(letter)).await;
        match stored {
            Ok(Ok(())) => tracing::debug!(order_id, "dead letter stored"),
            Ok(Err(e)) => tracing::error!(order_id, error = %e, "dead letter lost"),
            Err(e) => tracing::error!(order_id, error = %e, "dead letter task failed"),
        }
    }
}

#[async_trait]
impl<S> DistributionSink for RetryingSink<S>
where
    S: DistributionSink,
{
    async fn deliver(&self, distribution: &Distribution) -> Result<(), KitchenError> {
        let order_id = distribution.order_id();
        let mut attempt = 0;
        loop {
            attempt += 1;
            let reason = match self.inner.deliver(distribution).await {
                Ok(()) => return Ok(()),
                Err(e) => e.to_string(),
            };
            if attempt >= self.policy.max_attempts {
                self.bury(distribution, attempt, &reason).await;
                return Err(KitchenError::DeliveryFailed {
                    order_id,
                    attempts: attempt,
                    reason,
                });
            }
            let wait = self.policy.backoff(attempt);
            tracing::warn!(
                order_id,
                attempt,
                backoff_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                error = %reason,
                "delivery failed, retrying"
            );
            tokio::time::sleep(wait).await;
        }
    }
}
