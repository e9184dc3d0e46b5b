//! Runtime adapters and the kitchen's request surface.

pub mod api;
#[cfg(feature = "http")]
pub mod http;
pub mod tokio_spawner;

pub use api::{health, snapshot, submit_order, Health, KitchenSnapshot, OrderAccepted};
#[cfg(feature = "http")]
pub use http::{router, ErrorBody};
pub use tokio_spawner::{build_runtime, TokioSpawner};
