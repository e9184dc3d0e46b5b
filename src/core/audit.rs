//! Order lifecycle journal.
//!
//! Every significant step of an order (received, admitted, item ready,
//! distributed, ...) can be recorded as a [`KitchenEvent`]. The in-memory
//! journal keeps a bounded ring of the most recent events.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::{CookId, OrderId};

/// What happened to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Accepted at intake and queued.
    Received,
    /// Released into processing.
    Admitted,
    /// Dropped because it waited longer than `max_wait`.
    Expired,
    /// Dropped at admission.
    Rejected,
    /// One item finished cooking.
    ItemReady,
    /// Finalized and handed to the sink.
    Distributed,
    /// The sink gave up on it.
    DeliveryFailed,
}

/// Journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related order.
    pub order_id: OrderId,
    /// Lifecycle step.
    pub kind: EventKind,
    /// Cook involved, for item events.
    pub cook_id: Option<CookId>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Journal abstraction.
pub trait EventJournal: Send + Sync {
    /// Record an event.
    fn record(&self, event: KitchenEvent);
}

/// Bounded in-memory journal. Clones share the same buffer.
#[derive(Clone)]
pub struct InMemoryJournal {
    events: Arc<Mutex<VecDeque<KitchenEvent>>>,
    max_events: usize,
}

impl InMemoryJournal {
    /// Create a journal keeping at most `max_events` entries.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<KitchenEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Order ids of every event of `kind`, oldest first.
    #[must_use]
    pub fn orders_with(&self, kind: EventKind) -> Vec<OrderId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.order_id)
            .collect()
    }
}

impl EventJournal for InMemoryJournal {
    fn record(&self, event: KitchenEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an event stamped with a fresh id and the current time.
#[must_use]
pub fn build_event(
    order_id: OrderId,
    kind: EventKind,
    cook_id: Option<CookId>,
    detail: Option<String>,
) -> KitchenEvent {
    KitchenEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        order_id,
        kind,
        cook_id,
        created_at_ms: now_ms(),
        detail,
    }
}

/// Optional journal shared by the kitchen's loops.
#[derive(Clone, Default)]
pub(crate) struct Journal(Option<Arc<dyn EventJournal>>);

impl Journal {
    pub fn new(inner: Option<Arc<dyn EventJournal>>) -> Self {
        Self(inner)
    }

    pub fn record(&self, order_id: OrderId, kind: EventKind) {
        self.record_with(order_id, kind, None, None);
    }

    pub fn record_with(
        &self,
        order_id: OrderId,
        kind: EventKind,
        cook_id: Option<CookId>,
        detail: Option<String>,
    ) {
        if let Some(journal) = &self.0 {
            journal.record(build_event(order_id, kind, cook_id, detail));
        }
    }
}
