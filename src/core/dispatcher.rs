//! Assigns queued cooking tasks to qualified cooks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Notify};

use crate::core::cook::{Cook, CookContext};
use crate::core::model::{CookingTask, Food};
use crate::core::spawn::Spawn;
use crate::core::stats::KitchenCounters;

/// Order in which cooks are considered: ascending proficiency, roster order
/// on ties.
#[must_use]
pub fn dispatch_order(mut cooks: Vec<Arc<Cook>>) -> Vec<Arc<Cook>> {
    cooks.sort_by_key(|cook| cook.profile().proficiency);
    cooks
}

/// Claim the first cook in `cooks` that can take `food`.
#[must_use]
pub fn claim<'a>(cooks: &'a [Arc<Cook>], food: &Food) -> Option<&'a Arc<Cook>> {
    cooks
        .iter()
        .find(|cook| cook.can_cook(food) && cook.try_occupy())
}

/// Single consumer of the shared task queue.
pub(crate) struct Dispatcher<S> {
    cooks: Vec<Arc<Cook>>,
    tasks: mpsc::UnboundedReceiver<CookingTask>,
    cook_freed: Arc<Notify>,
    retry: Duration,
    spawner: S,
    ctx: Arc<CookContext>,
}

impl<S> Dispatcher<S>
where
    S: Spawn,
{
    pub fn new(
        cooks: Vec<Arc<Cook>>,
        tasks: mpsc::UnboundedReceiver<CookingTask>,
        retry: Duration,
        spawner: S,
        ctx: Arc<CookContext>,
    ) -> Self {
        Self {
            cooks: dispatch_order(cooks),
            tasks,
            cook_freed: Arc::clone(&ctx.cook_freed),
            retry,
            spawner,
            ctx,
        }
    }

    /// Wait until some cook takes `food`; `None` on shutdown.
    async fn assign(&self, food: &Food, shutdown: &mut watch::Receiver<bool>) -> Option<Arc<Cook>> {
        loop {
            let notified = self.cook_freed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(cook) = claim(&self.cooks, food) {
                return Some(Arc::clone(cook));
            }
            tokio::select! {
                _ = tokio::time::timeout(self.retry, notified) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return None;
                    }
                }
            }
        }
    }

    /// Dispatch tasks one at a time, in arrival order, until shutdown.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::debug!(cooks = self.cooks.len(), "dispatcher started");
        loop {
            let task = tokio::select! {
                task = self.tasks.recv() => task,
                _ = shutdown.changed() => None,
            };
            let Some(mut task) = task else { break };

            if !self.cooks.iter().any(|cook| cook.is_qualified(&task.food)) {
                KitchenCounters::bump(&self.ctx.counters.tasks_dropped);
                tracing::error!(
                    order_id = task.order_id,
                    food_id = task.food_id,
                    complexity = task.food.complexity,
                    "no cook is qualified for this food, task dropped"
                );
                continue;
            }
            let Some(cook) = self.assign(&task.food, &mut shutdown).await else {
                break;
            };
            task.cook_id = Some(cook.id());
            KitchenCounters::bump(&self.ctx.counters.tasks_dispatched);
            tracing::debug!(
                order_id = task.order_id,
                item_id = task.item_id,
                food_id = task.food_id,
                cook_id = cook.id(),
                continuation = task.is_continuation(),
                "task dispatched"
            );
            self.spawner.spawn(cook.cook(task, Arc::clone(&self.ctx)));
        }
        tracing::debug!("dispatcher stopped");
    }
}
