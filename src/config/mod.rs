//! Configuration models and reference-data loading.

pub mod kitchen;
pub mod reference;

pub use kitchen::{DeliveryConfig, KitchenConfig, ENV_PREFIX};
pub use reference::ReferenceData;
