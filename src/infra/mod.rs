//! Infrastructure adapters: order queue, distribution sinks, dead letters.

pub mod dead_letter;
pub mod queue;
pub mod sink;

pub use dead_letter::{DeadLetter, DeadLetterStore, InMemoryDeadLetter, JsonlDeadLetter};
pub use queue::InMemoryOrderQueue;
#[cfg(feature = "http")]
pub use sink::HttpSink;
pub use sink::{InMemorySink, RetryPolicy, RetryingSink};
