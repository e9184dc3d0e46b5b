//! Decomposes admitted orders into cooking tasks.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::core::admission::AdmissionScheduler;
use crate::core::error::KitchenError;
use crate::core::model::{CookingTask, Menu, Order};
use crate::core::tracker::InFlightTable;

/// Build one task per item position.
///
/// # Errors
///
/// `KitchenError::InvalidOrder` if an item is not on the menu.
pub fn decompose(order: &Order, menu: &Menu) -> Result<Vec<CookingTask>, KitchenError> {
    order
        .items
        .iter()
        .enumerate()
        .map(|(item_id, &food_id)| {
            menu.get(food_id)
                .map(|food| CookingTask::new(order.order_id, item_id, food.clone()))
                .ok_or_else(|| KitchenError::InvalidOrder {
                    order_id: order.order_id,
                    reason: format!("food {food_id} at position {item_id} is not on the menu"),
                })
        })
        .collect()
}

/// Forwards the tasks of admitted orders to the dispatcher's queue.
#[derive(Clone)]
pub struct OrderProcessor {
    menu: Arc<Menu>,
    tasks: mpsc::UnboundedSender<CookingTask>,
    table: Arc<Mutex<InFlightTable>>,
    admission: Arc<AdmissionScheduler>,
}

impl OrderProcessor {
    /// Create a processor feeding `tasks`.
    #[must_use]
    pub fn new(
        menu: Arc<Menu>,
        tasks: mpsc::UnboundedSender<CookingTask>,
        table: Arc<Mutex<InFlightTable>>,
        admission: Arc<AdmissionScheduler>,
    ) -> Self {
        Self {
            menu,
            tasks,
            table,
            admission,
        }
    }

    /// Submit every item of an admitted order; returns the task count.
    ///
    /// If the order cannot be fully decomposed, nothing is submitted and the
    /// order leaves the in-flight table so its slot is freed.
    ///
    /// # Errors
    ///
    /// `InvalidOrder` for unknown foods, `ShutDown` if the dispatcher is gone.
    pub fn process(&self, order: &Order) -> Result<usize, KitchenError> {
        let tasks = match decompose(order, &self.menu) {
            Ok(tasks) => tasks,
            Err(e) => {
                self.abandon(order);
                return Err(e);
            }
        };
        let count = tasks.len();
        for task in tasks {
            tracing::debug!(
                order_id = task.order_id,
                item_id = task.item_id,
                food_id = task.food_id,
                "task queued"
            );
            if self.tasks.send(task).is_err() {
                self.abandon(order);
                return Err(KitchenError::ShutDown);
            }
        }
        Ok(count)
    }

    fn abandon(&self, order: &Order) {
        self.table.lock().abandon(order.order_id);
        self.admission.notify_slot_freed();
    }
}
