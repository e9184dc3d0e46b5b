//! Builders that assemble a kitchen from configuration.

pub mod kitchen_builder;

#[cfg(feature = "http")]
pub use kitchen_builder::dining_hall_sink;
pub use kitchen_builder::KitchenBuilder;
