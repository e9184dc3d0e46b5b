//! Kitchen scheduling core: admission, dispatch, cooking and completion.

pub mod admission;
pub mod apparatus;
pub mod audit;
pub mod cook;
pub mod dispatcher;
pub mod error;
pub mod kitchen;
pub mod model;
pub mod processor;
pub mod sink;
pub mod spawn;
pub mod stats;
pub mod tracker;

pub use admission::{Admission, AdmissionScheduler, OrderQueue, QueuedOrder};
pub use apparatus::{Apparatus, ApparatusGuard, ApparatusPool};
pub use audit::{build_event, EventJournal, EventKind, InMemoryJournal, KitchenEvent};
pub use cook::{plan_turn, Cook, Turn, SLICE_THRESHOLD};
pub use dispatcher::{claim, dispatch_order};
pub use error::{AppResult, KitchenError};
pub use kitchen::Kitchen;
pub use model::{
    ApparatusSpec, CompletionReport, CookProfile, CookingDetail, CookingTask, Distribution, Food,
    Menu, Order,
};
pub use processor::{decompose, OrderProcessor};
pub use sink::DistributionSink;
pub use spawn::Spawn;
pub use stats::KitchenStats;
pub use tracker::{finalize, InFlightTable, ReportOutcome};
