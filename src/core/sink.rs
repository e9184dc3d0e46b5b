//! Destination of completed distributions.

use async_trait::async_trait;

use crate::core::error::KitchenError;
use crate::core::model::Distribution;

/// Receives one distribution per completed order.
///
/// Implementations decide how the result leaves the kitchen (an HTTP call
/// to the dining hall, an in-memory buffer, ...). The kitchen never blocks
/// report processing on delivery.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use kitchen_scheduler::core::{Distribution, DistributionSink, KitchenError};
///
/// struct Printer;
///
/// #[async_trait]
/// impl DistributionSink for Printer {
///     async fn deliver(&self, d: &Distribution) -> Result<(), KitchenError> {
///         println!("order {} ready in {}", d.order.order_id, d.cooking_time);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait DistributionSink: Send + Sync + 'static {
    /// Deliver a completed distribution.
    async fn deliver(&self, distribution: &Distribution) -> Result<(), KitchenError>;
}
