//! The running kitchen: intake, observation and shutdown.
//!
//! [`Kitchen::start`] wires the admission loop, the dispatcher and the
//! completion tracker together and spawns them on the supplied runtime.
//! The returned handle validates and enqueues incoming orders and exposes
//! counters for tests and the HTTP surface. Dropping the handle stops the
//! loops as well.

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch, Notify};

use crate::config::{KitchenConfig, ReferenceData};
use crate::core::admission::{AdmissionScheduler, OrderQueue};
use crate::core::apparatus::{Apparatus, ApparatusPool};
use crate::core::audit::{EventJournal, EventKind, Journal};
use crate::core::cook::{Cook, CookContext};
use crate::core::dispatcher::Dispatcher;
use crate::core::error::KitchenError;
use crate::core::model::{Menu, Order};
use crate::core::processor::OrderProcessor;
use crate::core::sink::DistributionSink;
use crate::core::spawn::Spawn;
use crate::core::stats::{KitchenCounters, KitchenStats};
use crate::core::tracker::{CompletionTracker, InFlightTable};

/// Handle to a started kitchen.
pub struct Kitchen<S> {
    config: Arc<KitchenConfig>,
    menu: Arc<Menu>,
    max_rank: u32,
    cooks: Vec<Arc<Cook>>,
    apparatuses: Arc<ApparatusPool>,
    admission: Arc<AdmissionScheduler>,
    table: Arc<Mutex<InFlightTable>>,
    counters: Arc<KitchenCounters>,
    journal: Journal,
    shutdown: watch::Sender<bool>,
    _spawner: PhantomData<S>,
}

impl<S> Kitchen<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Validate the inputs and spawn the kitchen's loops on `spawner`.
    ///
    /// # Errors
    ///
    /// `Config` or `ReferenceData` when validation fails.
    pub fn start(
        config: KitchenConfig,
        reference: ReferenceData,
        sink: Arc<dyn DistributionSink>,
        journal: Option<Arc<dyn EventJournal>>,
        queue: Box<dyn OrderQueue>,
        spawner: S,
    ) -> Result<Self, KitchenError> {
        config.validate().map_err(KitchenError::Config)?;
        reference.validate().map_err(KitchenError::ReferenceData)?;

        let config = Arc::new(config);
        let time_unit = config.time_unit();
        let max_rank = reference.max_rank();
        let counters = Arc::new(KitchenCounters::default());
        let journal = Journal::new(journal);
        let table = Arc::new(Mutex::new(InFlightTable::new()));
        let admission = Arc::new(AdmissionScheduler::new(
            queue,
            Arc::clone(&table),
            config.nr_of_concurrent_orders,
            config.enforce_max_wait.then_some(time_unit),
        ));
        let apparatuses = Arc::new(ApparatusPool::new(
            &reference.apparatuses,
            config.apparatus_retry(),
        ));
        let cooks: Vec<Arc<Cook>> = reference
            .cooks
            .into_iter()
            .enumerate()
            .map(|(id, profile)| Arc::new(Cook::new(id, profile)))
            .collect();
        for cook in &cooks {
            let profile = cook.profile();
            tracing::info!(
                cook_id = cook.id(),
                rank = profile.rank,
                proficiency = profile.proficiency,
                "{} enters the kitchen: {}",
                profile.name,
                profile.catch_phrase
            );
        }
        let menu = Arc::new(reference.menu);

        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let ctx = Arc::new(CookContext {
            apparatuses: Arc::clone(&apparatuses),
            requeue: task_tx.clone(),
            reports: report_tx,
            cook_freed: Arc::new(Notify::new()),
            time_unit,
            ctx_switch_factor: config.ctx_switch_factor,
            counters: Arc::clone(&counters),
        });
        let processor = OrderProcessor::new(
            Arc::clone(&menu),
            task_tx,
            Arc::clone(&table),
            Arc::clone(&admission),
        );
        let dispatcher = Dispatcher::new(
            cooks.clone(),
            task_rx,
            config.dispatch_retry(),
            spawner.clone(),
            ctx,
        );
        let tracker = CompletionTracker {
            table: Arc::clone(&table),
            admission: Arc::clone(&admission),
            sink,
            time_unit,
            counters: Arc::clone(&counters),
            journal: journal.clone(),
            spawner: spawner.clone(),
        };

        spawner.spawn(Arc::clone(&admission).run(
            processor,
            Arc::clone(&counters),
            journal.clone(),
            shutdown_rx.clone(),
        ));
        spawner.spawn(dispatcher.run(shutdown_rx.clone()));
        spawner.spawn(tracker.run(report_rx, shutdown_rx));

        tracing::info!(
            cooks = cooks.len(),
            foods = menu.len(),
            concurrent_orders = config.nr_of_concurrent_orders,
            time_unit_ms = config.time_unit_ms,
            "kitchen open"
        );

        Ok(Self {
            config,
            menu,
            max_rank,
            cooks,
            apparatuses,
            admission,
            table,
            counters,
            journal,
            shutdown,
            _spawner: PhantomData,
        })
    }

    /// Validate an order and queue it for admission.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` if the order cannot be cooked here, `ShutDown` after
    /// [`Self::shutdown`].
    pub fn submit(&self, order: Order) -> Result<(), KitchenError> {
        if self.is_shut_down() {
            return Err(KitchenError::ShutDown);
        }
        if let Err(e) = self.validate(&order) {
            tracing::warn!(order_id = order.order_id, error = %e, "order refused at intake");
            return Err(e);
        }
        KitchenCounters::bump(&self.counters.orders_received);
        self.journal.record(order.order_id, EventKind::Received);
        tracing::info!(
            order_id = order.order_id,
            table_id = order.table_id,
            priority = order.priority,
            items = order.items.len(),
            "order received"
        );
        self.admission.enqueue(order);
        Ok(())
    }

    fn validate(&self, order: &Order) -> Result<(), KitchenError> {
        let invalid = |reason: String| KitchenError::InvalidOrder {
            order_id: order.order_id,
            reason,
        };
        if order.items.is_empty() {
            return Err(invalid("order has no items".into()));
        }
        if order.items.len() > self.config.max_order_items_count {
            return Err(invalid(format!(
                "{} items exceed the limit of {}",
                order.items.len(),
                self.config.max_order_items_count
            )));
        }
        for &food_id in &order.items {
            let food = self
                .menu
                .get(food_id)
                .ok_or_else(|| invalid(format!("food {food_id} is not on the menu")))?;
            if food.complexity > self.max_rank {
                return Err(invalid(format!(
                    "no cook can prepare {} (complexity {})",
                    food.name, food.complexity
                )));
            }
        }
        Ok(())
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> KitchenStats {
        let in_flight = self.in_flight();
        self.counters.snapshot(self.queued(), in_flight)
    }

    /// Orders being cooked.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.table.lock().in_flight()
    }

    /// Orders waiting for admission.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.admission.queued()
    }

    /// Current occupancy of every cook, by cook id.
    #[must_use]
    pub fn cook_occupancy(&self) -> Vec<u32> {
        self.cooks.iter().map(|cook| cook.occupancy()).collect()
    }

    /// The roster, by cook id.
    #[must_use]
    pub fn cooks(&self) -> &[Arc<Cook>] {
        &self.cooks
    }

    /// Look up an apparatus by name.
    #[must_use]
    pub fn apparatus(&self, name: &str) -> Option<Arc<Apparatus>> {
        self.apparatuses.get(name).cloned()
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// The menu orders are resolved against.
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Whether [`Self::shutdown`] was called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Stop admitting, dispatching and tracking. Turns already running
    /// finish their current slice.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            tracing::info!(
                in_flight = self.in_flight(),
                queued = self.queued(),
                "kitchen closing"
            );
        }
    }
}
