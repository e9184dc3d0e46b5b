//! Lock-free kitchen counters and their snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of kitchen activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenStats {
    /// Orders accepted at intake.
    pub orders_received: u64,
    /// Orders released into processing.
    pub orders_admitted: u64,
    /// Orders dropped because their wait exceeded `max_wait`.
    pub orders_expired: u64,
    /// Orders dropped at admission (duplicate id, unresolvable items).
    pub orders_rejected: u64,
    /// Orders whose distribution was finalized.
    pub orders_distributed: u64,
    /// Cook turns handed out by the dispatcher.
    pub tasks_dispatched: u64,
    /// Partially cooked tasks put back on the queue.
    pub slices_requeued: u64,
    /// Tasks a cook refused on receipt.
    pub tasks_dropped: u64,
    /// Completion reports discarded as stale or duplicate.
    pub reports_rejected: u64,
    /// Distributions the sink could not deliver.
    pub delivery_failures: u64,
    /// Orders waiting for admission.
    pub queued_orders: u64,
    /// Orders currently being cooked.
    pub in_flight_orders: u64,
}

/// Internal counters for kitchen statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct KitchenCounters {
    pub orders_received: AtomicU64,
    pub orders_admitted: AtomicU64,
    pub orders_expired: AtomicU64,
    pub orders_rejected: AtomicU64,
    pub orders_distributed: AtomicU64,
    pub tasks_dispatched: AtomicU64,
    pub slices_requeued: AtomicU64,
    pub tasks_dropped: AtomicU64,
    pub reports_rejected: AtomicU64,
    pub delivery_failures: AtomicU64,
}

impl KitchenCounters {
    /// Bump a counter by one.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, queued_orders: usize, in_flight_orders: usize) -> KitchenStats {
        KitchenStats {
            orders_received: self.orders_received.load(Ordering::Relaxed),
            orders_admitted: self.orders_admitted.load(Ordering::Relaxed),
            orders_expired: self.orders_expired.load(Ordering::Relaxed),
            orders_rejected: self.orders_rejected.load(Ordering::Relaxed),
            orders_distributed: self.orders_distributed.load(Ordering::Relaxed),
            tasks_dispatched: self.tasks_dispatched.load(Ordering::Relaxed),
            slices_requeued: self.slices_requeued.load(Ordering::Relaxed),
            tasks_dropped: self.tasks_dropped.load(Ordering::Relaxed),
            reports_rejected: self.reports_rejected.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            queued_orders: queued_orders as u64,
            in_flight_orders: in_flight_orders as u64,
        }
    }
}
