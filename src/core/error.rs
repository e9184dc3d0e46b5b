//! Error types for kitchen operations.

use thiserror::Error;

use crate::util::serde::OrderId;

/// Errors produced by kitchen components.
#[derive(Debug, Error)]
pub enum KitchenError {
    /// Runtime configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Menu, roster or apparatus inventory failed to load or validate.
    #[error("invalid reference data: {0}")]
    ReferenceData(String),
    /// A submitted order was malformed.
    #[error("order {order_id} rejected: {reason}")]
    InvalidOrder {
        /// Identifier of the rejected order.
        order_id: OrderId,
        /// Why the order was rejected.
        reason: String,
    },
    /// A distribution could not be delivered after every retry.
    #[error("delivery of order {order_id} failed after {attempts} attempts: {reason}")]
    DeliveryFailed {
        /// Identifier of the undelivered order.
        order_id: OrderId,
        /// Attempts made before giving up.
        attempts: u32,
        /// Last failure reported by the sink.
        reason: String,
    },
    /// Sink-specific failure with context.
    #[error("sink error: {0}")]
    Sink(String),
    /// The kitchen no longer accepts work.
    #[error("kitchen is shut down")]
    ShutDown,
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
