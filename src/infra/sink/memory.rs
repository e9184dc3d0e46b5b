//! In-memory sink for tests and embedding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::core::{Distribution, DistributionSink, KitchenError};

/// Collects every delivered distribution. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct InMemorySink {
    delivered: Arc<Mutex<Vec<Distribution>>>,
    arrived: Arc<Notify>,
}

impl InMemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distributions delivered so far, in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<Distribution> {
        self.delivered.lock().clone()
    }

    /// Number of distributions delivered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delivered.lock().len()
    }

    /// Whether nothing was delivered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until at least `count` distributions arrived or `timeout`
    /// elapsed, then return what was delivered.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<Distribution> {
        let wait = async {
            loop {
                let notified = self.arrived.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.len() >= count {
                    return;
                }
                notified.await;
            }
        };
        let _ = tokio::time::timeout(timeout, wait).await;
        self.delivered()
    }
}

#[async_trait]
impl DistributionSink for InMemorySink {
    async fn deliver(&self, distribution: &Distribution) -> Result<(), KitchenError> {
        self.delivered.lock().push(distribution.clone());
        self.arrived.notify_waiters();
        Ok(())
    }
}
