//! Distribution sinks.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;
pub mod retry;

#[cfg(feature = "http")]
pub use http::HttpSink;
pub use memory::InMemorySink;
pub use retry::{RetryPolicy, RetryingSink};
