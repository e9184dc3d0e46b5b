//! Serializable identifier types shared across the kitchen.

/// Order identifier assigned by the dining hall.
pub type OrderId = u64;

/// 1-based menu identifier of a food.
pub type FoodId = u32;

/// Cook identifier (position in the roster as loaded).
pub type CookId = usize;

/// 0-based position of an item within its order.
pub type ItemId = usize;

/// Simulation time units (scaled by the configured time unit).
pub type TimeUnits = u32;
