//! Completion tracking and distribution assembly.
//!
//! The [`InFlightTable`] is the single owner of every open [`Distribution`].
//! Admission opens entries and the tracker loop closes them, both under the
//! same `parking_lot::Mutex`. The number of open entries is the in-flight
//! order count.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use crate::core::admission::AdmissionScheduler;
use crate::core::audit::{EventKind, Journal};
use crate::core::model::{CompletionReport, CookingDetail, Distribution, Order};
use crate::core::sink::DistributionSink;
use crate::core::spawn::Spawn;
use crate::core::stats::KitchenCounters;
use crate::util::clock::to_time_units;
use crate::util::serde::{FoodId, OrderId};

/// What happened to a completion report.
#[derive(Debug)]
pub enum ReportOutcome {
    /// Recorded; items are still outstanding.
    Accepted {
        /// Items not yet received.
        outstanding: usize,
    },
    /// Recorded and the order is now complete; it left the table.
    Completed(Distribution),
    /// No order with that id is in flight.
    UnknownOrder,
    /// The reported food is not the one at that position.
    FoodMismatch {
        /// Food recorded at that position, if the position exists.
        expected: Option<FoodId>,
    },
    /// That position was already received.
    Duplicate,
}

/// Open distributions keyed by order id.
#[derive(Debug, Default)]
pub struct InFlightTable {
    distributions: HashMap<OrderId, Distribution>,
}

impl InFlightTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.distributions.len()
    }

    /// Whether `order_id` is in flight.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.distributions.contains_key(&order_id)
    }

    /// The open distribution of `order_id`.
    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&Distribution> {
        self.distributions.get(&order_id)
    }

    /// Open a distribution for an admitted order.
    ///
    /// Returns `false`, leaving the table untouched, if the id is already open.
    pub fn open(&mut self, order: Order, admitted_at: Instant) -> bool {
        if self.contains(order.order_id) {
            return false;
        }
        self.distributions
            .insert(order.order_id, Distribution::open(order, admitted_at));
        true
    }

    /// Remove an order without completing it.
    pub fn abandon(&mut self, order_id: OrderId) -> Option<Distribution> {
        self.distributions.remove(&order_id)
    }

    /// Validate a report and record it at most once per item position.
    pub fn record(&mut self, report: &CompletionReport) -> ReportOutcome {
        let Some(distribution) = self.distributions.get_mut(&report.order_id) else {
            return ReportOutcome::UnknownOrder;
        };
        let expected = distribution.order.items.get(report.item_id).copied();
        if expected != Some(report.food_id) {
            return ReportOutcome::FoodMismatch { expected };
        }
        if distribution.is_received(report.item_id) {
            return ReportOutcome::Duplicate;
        }
        distribution.mark_received(
            report.item_id,
            CookingDetail {
                food_id: report.food_id,
                cook_id: report.cook_id,
            },
        );
        if !distribution.is_complete() {
            return ReportOutcome::Accepted {
                outstanding: distribution.outstanding(),
            };
        }
        self.distributions
            .remove(&report.order_id)
            .map_or(ReportOutcome::UnknownOrder, ReportOutcome::Completed)
    }
}

/// Stamp the elapsed cooking time onto a completed distribution.
pub fn finalize(mut distribution: Distribution, now: Instant, time_unit: Duration) -> Distribution {
    let elapsed = distribution
        .admitted_at()
        .map_or(Duration::ZERO, |at| now.saturating_duration_since(at));
    distribution.cooking_time = to_time_units(elapsed, time_unit);
    distribution
}

/// Sequential consumer of completion reports.
pub(crate) struct CompletionTracker<S> {
    pub table: Arc<Mutex<InFlightTable>>,
    pub admission: Arc<AdmissionScheduler>,
    pub sink: Arc<dyn DistributionSink>,
    pub time_unit: Duration,
    pub counters: Arc<KitchenCounters>,
    pub journal: Journal,
    pub spawner: S,
}

impl<S> CompletionTracker<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Apply one report; returns the distribution if it completed its order.
    pub fn handle(&self, report: &CompletionReport) -> Option<Distribution> {
        let outcome = self.table.lock().record(report);
        match outcome {
            ReportOutcome::Accepted { outstanding } => {
                self.journal
                    .record_with(report.order_id, EventKind::ItemReady, Some(report.cook_id), None);
                tracing::debug!(
                    order_id = report.order_id,
                    item_id = report.item_id,
                    cook_id = report.cook_id,
                    outstanding,
                    "item received"
                );
                None
            }
            ReportOutcome::Completed(distribution) => {
                self.journal
                    .record_with(report.order_id, EventKind::ItemReady, Some(report.cook_id), None);
                let distribution = finalize(distribution, Instant::now(), self.time_unit);
                KitchenCounters::bump(&self.counters.orders_distributed);
                self.journal.record_with(
                    report.order_id,
                    EventKind::Distributed,
                    None,
                    Some(format!("cooking_time={}", distribution.cooking_time)),
                );
                tracing::info!(
                    order_id = report.order_id,
                    cooking_time = distribution.cooking_time,
                    "order complete"
                );
                self.admission.notify_slot_freed();
                Some(distribution)
            }
            ReportOutcome::UnknownOrder => {
                self.reject(report, "report for an order not in flight");
                None
            }
            ReportOutcome::FoodMismatch { .. } => {
                self.reject(report, "received wrong food item");
                None
            }
            ReportOutcome::Duplicate => {
                self.reject(report, "food item already received");
                None
            }
        }
    }

    fn reject(&self, report: &CompletionReport, reason: &str) {
        KitchenCounters::bump(&self.counters.reports_rejected);
        tracing::warn!(
            order_id = report.order_id,
            item_id = report.item_id,
            food_id = report.food_id,
            cook_id = report.cook_id,
            "{reason}"
        );
    }

    /// Hand a distribution to the sink without blocking report processing.
    fn deliver(&self, distribution: Distribution) {
        let sink = Arc::clone(&self.sink);
        let counters = Arc::clone(&self.counters);
        let journal = self.journal.clone();
        self.spawner.spawn(async move {
            let order_id = distribution.order_id();
            match sink.deliver(&distribution).await {
                Ok(()) => tracing::info!(order_id, "distribution delivered"),
                Err(e) => {
                    KitchenCounters::bump(&counters.delivery_failures);
                    journal.record_with(
                        order_id,
                        EventKind::DeliveryFailed,
                        None,
                        Some(e.to_string()),
                    );
                    tracing::error!(order_id, error = %e, "failed to deliver distribution");
                }
            }
        });
    }

    /// Process reports until the channel closes or shutdown is signalled.
    pub async fn run(
        self,
        mut reports: mpsc::UnboundedReceiver<CompletionReport>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tracing::debug!("completion tracker started");
        loop {
            let report = tokio::select! {
                report = reports.recv() => report,
                _ = shutdown.changed() => None,
            };
            let Some(report) = report else { break };
            if let Some(distribution) = self.handle(&report) {
                self.deliver(distribution);
            }
        }
        tracing::debug!("completion tracker stopped");
    }
}
