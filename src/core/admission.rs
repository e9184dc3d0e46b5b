//! Priority admission of orders under an in-flight limit.
//!
//! Orders are pushed into an [`OrderQueue`] as soon as they arrive. The
//! admission loop releases the most urgent one whenever fewer than `limit`
//! orders are in flight, and re-evaluates on every enqueue and on every
//! completed order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};

use crate::core::audit::{EventKind, Journal};
use crate::core::model::Order;
use crate::core::processor::OrderProcessor;
use crate::core::stats::KitchenCounters;
use crate::core::tracker::InFlightTable;

/// An order waiting for admission.
#[derive(Debug, Clone)]
pub struct QueuedOrder {
    /// The order as received.
    pub order: Order,
    /// Arrival sequence; breaks priority ties first-come first-served.
    pub seq: u64,
    /// When the order was enqueued.
    pub received_at: Instant,
}

impl QueuedOrder {
    /// Whether the order has waited longer than its `max_wait`.
    ///
    /// A non-positive `max_wait` means the order never expires.
    #[must_use]
    pub fn is_overdue(&self, now: Instant, time_unit: Duration) -> bool {
        if self.order.max_wait <= 0.0 {
            return false;
        }
        let unit_secs = time_unit.as_secs_f64().max(0.001);
        let waited = now.saturating_duration_since(self.received_at).as_secs_f64() / unit_secs;
        waited > self.order.max_wait
    }
}

/// Abstraction for admission queue backends.
pub trait OrderQueue: Send {
    /// Add an order. Never fails.
    fn enqueue(&mut self, entry: QueuedOrder);
    /// Remove the most urgent order.
    fn dequeue(&mut self) -> Option<QueuedOrder>;
    /// Remove and return every order that waited past its `max_wait`.
    fn prune_expired(&mut self, now: Instant, time_unit: Duration) -> Vec<QueuedOrder>;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether no order is waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one admission attempt.
#[derive(Debug)]
pub enum Admission {
    /// The order was released and its distribution opened.
    Admitted(Order),
    /// The order waited past its `max_wait` and was dropped.
    Expired(QueuedOrder),
    /// An order with the same id is already in flight.
    Duplicate(QueuedOrder),
    /// At the limit, or nothing queued.
    Waiting,
}

/// Holds queued orders and releases them into processing.
pub struct AdmissionScheduler {
    queue: Mutex<Box<dyn OrderQueue>>,
    table: Arc<Mutex<InFlightTable>>,
    limit: usize,
    /// Time unit used for `max_wait`; `None` leaves `max_wait` unenforced.
    expiry_unit: Option<Duration>,
    next_seq: AtomicU64,
    wake: Notify,
}

impl AdmissionScheduler {
    /// Create a scheduler sharing `table` with the completion tracker.
    #[must_use]
    pub fn new(
        queue: Box<dyn OrderQueue>,
        table: Arc<Mutex<InFlightTable>>,
        limit: usize,
        expiry_unit: Option<Duration>,
    ) -> Self {
        Self {
            queue: Mutex::new(queue),
            table,
            limit,
            expiry_unit,
            next_seq: AtomicU64::new(0),
            wake: Notify::new(),
        }
    }

    /// Maximum number of orders in flight.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Orders waiting for admission.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Push an order into the queue and wake the admission loop.
    pub fn enqueue(&self, order: Order) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = QueuedOrder {
            order,
            seq,
            received_at: Instant::now(),
        };
        self.queue.lock().enqueue(entry);
        self.wake.notify_one();
    }

    /// Wake the admission loop after an order left the in-flight table.
    pub fn notify_slot_freed(&self) {
        self.wake.notify_one();
    }

    /// Drop every queued order that waited past its `max_wait`.
    ///
    /// Does nothing unless `max_wait` is enforced.
    pub fn sweep_expired(&self, now: Instant) -> Vec<QueuedOrder> {
        match self.expiry_unit {
            Some(unit) => self.queue.lock().prune_expired(now, unit),
            None => Vec::new(),
        }
    }

    /// Try to admit the next order.
    ///
    /// The in-flight check, the dequeue and the opening of the order's
    /// distribution happen under the table lock, so an order is always
    /// counted in flight before any completion can remove it.
    pub fn try_admit(&self, now: Instant) -> Admission {
        let mut table = self.table.lock();
        if table.in_flight() >= self.limit {
            return Admission::Waiting;
        }
        let Some(entry) = self.queue.lock().dequeue() else {
            return Admission::Waiting;
        };
        if let Some(unit) = self.expiry_unit {
            if entry.is_overdue(now, unit) {
                return Admission::Expired(entry);
            }
        }
        if !table.open(entry.order.clone(), now) {
            return Admission::Duplicate(entry);
        }
        Admission::Admitted(entry.order)
    }

    /// Admit orders until shutdown, handing each to `processor`.
    pub(crate) async fn run(
        self: Arc<Self>,
        processor: OrderProcessor,
        counters: Arc<KitchenCounters>,
        journal: Journal,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tracing::debug!(limit = self.limit, "admission loop started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            let notified = self.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            for entry in self.sweep_expired(Instant::now()) {
                expired(&entry, &counters, &journal);
            }
            loop {
                match self.try_admit(Instant::now()) {
                    Admission::Admitted(order) => {
                        KitchenCounters::bump(&counters.orders_admitted);
                        journal.record(order.order_id, EventKind::Admitted);
                        tracing::info!(
                            order_id = order.order_id,
                            priority = order.priority,
                            items = order.items.len(),
                            "order admitted"
                        );
                        if let Err(e) = processor.process(&order) {
                            KitchenCounters::bump(&counters.orders_rejected);
                            journal.record_with(
                                order.order_id,
                                EventKind::Rejected,
                                None,
                                Some(e.to_string()),
                            );
                            tracing::error!(
                                order_id = order.order_id,
                                error = %e,
                                "order abandoned"
                            );
                        }
                    }
                    Admission::Expired(entry) => expired(&entry, &counters, &journal),
                    Admission::Duplicate(entry) => {
                        KitchenCounters::bump(&counters.orders_rejected);
                        journal.record_with(
                            entry.order.order_id,
                            EventKind::Rejected,
                            None,
                            Some("duplicate order id".into()),
                        );
                        tracing::warn!(
                            order_id = entry.order.order_id,
                            "order with this id already in flight, dropped"
                        );
                    }
                    Admission::Waiting => break,
                }
            }

            tokio::select! {
                () = &mut notified => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("admission loop stopped");
    }
}

fn expired(entry: &QueuedOrder, counters: &KitchenCounters, journal: &Journal) {
    KitchenCounters::bump(&counters.orders_expired);
    journal.record(entry.order.order_id, EventKind::Expired);
    tracing::warn!(
        order_id = entry.order.order_id,
        max_wait = entry.order.max_wait,
        "order expired before admission"
    );
}
