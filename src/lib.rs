//! # Kitchen Scheduler
//!
//! A concurrent kitchen simulation: orders arrive from a dining hall, are
//! admitted by priority under a concurrency limit, decomposed into cooking
//! tasks, and prepared by cooks with bounded capability and capacity that
//! share quantity-limited apparatus. Completed orders are assembled into
//! distributions and delivered back to the dining hall.
//!
//! ## Pipeline
//!
//! ```text
//! submit ─► admission queue ─► order processor ─► task queue ─► dispatcher
//!                ▲                                   ▲              │
//!                │ slot freed                        │ re-queue     ▼
//!          completion tracker ◄── completion report ─┴────────── cook turn
//!                │
//!                ▼
//!         distribution sink
//! ```
//!
//! - **Admission**: lower `priority` value first, FIFO on ties; at most
//!   `nr_of_concurrent_orders` orders in flight.
//! - **Dispatch**: each task goes to the least proficient cook whose rank
//!   covers the food and who has a free slot.
//! - **Time slicing**: a cook works one slice of `preparation_time /
//!   ctx_switch_factor` per turn and re-queues the rest, so long dishes do
//!   not monopolize cooks.
//! - **Apparatus**: ovens, stoves and the like are held for one turn at a
//!   time and never exceed their quantity.
//! - **Completion**: every item position is recorded exactly once; the
//!   distribution is finalized when the last one arrives.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kitchen_scheduler::builders::KitchenBuilder;
//! use kitchen_scheduler::config::{KitchenConfig, ReferenceData};
//! use kitchen_scheduler::infra::InMemorySink;
//! use kitchen_scheduler::runtime::TokioSpawner;
//!
//! let sink = InMemorySink::new();
//! let kitchen = KitchenBuilder::new("main")
//!     .with_config(KitchenConfig::from_json_str(r#"{"time_unit_ms": 5}"#)?)
//!     .with_reference(ReferenceData::load_dir("config")?)
//!     .with_sink(Arc::new(sink.clone()))
//!     .start(TokioSpawner::current())?;
//!
//! kitchen.submit(order)?;
//! let done = sink.wait_for(1, std::time::Duration::from_secs(5)).await;
//! ```
//!
//! For complete scenarios, see `tests/kitchen_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Kitchen scheduling core: admission, dispatch, cooking and completion.
pub mod core;
/// Configuration models and reference-data loading.
pub mod config;
/// Builders that assemble a kitchen from configuration.
pub mod builders;
/// Infrastructure adapters: order queue, distribution sinks, dead letters.
pub mod infra;
/// Runtime adapters and the kitchen's request surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
