//! Admission queue backends.

pub mod memory;

pub use memory::InMemoryOrderQueue;
