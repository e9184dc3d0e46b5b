//! In-memory admission queue with priority and arrival ordering.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::core::{OrderQueue, QueuedOrder};

/// Wrapper making a queued order orderable: lowest priority value first, FIFO within priority.
struct PriorityOrder {
    entry: QueuedOrder,
}

impl PartialEq for PriorityOrder {
    fn eq(&self, other: &Self) -> bool {
        self.entry.seq == other.entry.seq
    }
}

impl Eq for PriorityOrder {}

impl PartialOrd for PriorityOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the smaller priority value and the earlier arrival compare greater.
        other
            .entry
            .order
            .priority
            .cmp(&self.entry.order.priority)
            .then_with(|| other.entry.seq.cmp(&self.entry.seq))
    }
}

/// In-memory queue storing waiting orders in a priority heap.
/// This provides O(log n) enqueue and O(log n) dequeue operations.
#[derive(Default)]
pub struct InMemoryOrderQueue {
    orders: BinaryHeap<PriorityOrder>,
}

impl InMemoryOrderQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with room for `capacity` orders.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: BinaryHeap::with_capacity(capacity),
        }
    }
}

impl OrderQueue for InMemoryOrderQueue {
    fn enqueue(&mut self, entry: QueuedOrder) {
        self.orders.push(PriorityOrder { entry });
    }

    fn dequeue(&mut self) -> Option<QueuedOrder> {
        self.orders.pop().map(|po| po.entry)
    }

    fn prune_expired(&mut self, now: Instant, time_unit: Duration) -> Vec<QueuedOrder> {
        // Rebuild heap without expired orders
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .orders
            .drain()
            .partition(|po| po.entry.is_overdue(now, time_unit));
        self.orders = kept.into_iter().collect();
        expired.into_iter().map(|po| po.entry).collect()
    }

    fn len(&self) -> usize {
        self.orders.len()
    }
}
