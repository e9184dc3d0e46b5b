//! Cooks: capability- and capacity-bounded workers.
//!
//! A cook runs one *turn* per dispatched task. A turn either cooks a single
//! time slice and puts the task back on the shared queue, or cooks the rest
//! of the task and reports it complete. Either way the cook's occupancy is
//! released exactly once when the turn ends.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};

use crate::core::apparatus::{ApparatusGuard, ApparatusPool};
use crate::core::model::{CompletionReport, CookProfile, CookingTask, Food};
use crate::core::stats::KitchenCounters;
use crate::util::clock::units_to_duration;
use crate::util::serde::{CookId, TimeUnits};

/// Time left after a slice must exceed this for the task to be preempted.
pub const SLICE_THRESHOLD: TimeUnits = 0;

/// What a cook does with a task in one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Cook this many units, then re-queue the rest.
    Slice(TimeUnits),
    /// Cook the remaining units and report completion.
    Finish(TimeUnits),
}

/// Decide the next turn for a task.
///
/// `slice = preparation_time / ctx_switch_factor`. The task is preempted
/// while `remaining - slice > SLICE_THRESHOLD`; a zero-length slice always
/// finishes, so every task completes in a bounded number of turns.
#[must_use]
pub fn plan_turn(
    preparation_time: TimeUnits,
    remaining: TimeUnits,
    ctx_switch_factor: u32,
) -> Turn {
    let slice = preparation_time / ctx_switch_factor.max(1);
    if slice > 0 && remaining > slice.saturating_add(SLICE_THRESHOLD) {
        Turn::Slice(slice)
    } else {
        Turn::Finish(remaining)
    }
}

/// Everything a cook needs during a turn.
pub(crate) struct CookContext {
    pub apparatuses: Arc<ApparatusPool>,
    pub requeue: mpsc::UnboundedSender<CookingTask>,
    pub reports: mpsc::UnboundedSender<CompletionReport>,
    pub cook_freed: Arc<Notify>,
    pub time_unit: Duration,
    pub ctx_switch_factor: u32,
    pub counters: Arc<KitchenCounters>,
}

/// A cook from the roster.
#[derive(Debug)]
pub struct Cook {
    id: CookId,
    profile: CookProfile,
    occupancy: AtomicU32,
}

impl Cook {
    /// Create an idle cook.
    #[must_use]
    pub const fn new(id: CookId, profile: CookProfile) -> Self {
        Self {
            id,
            profile,
            occupancy: AtomicU32::new(0),
        }
    }

    /// Cook identifier.
    #[must_use]
    pub const fn id(&self) -> CookId {
        self.id
    }

    /// Roster record.
    #[must_use]
    pub const fn profile(&self) -> &CookProfile {
        &self.profile
    }

    /// Tasks currently held.
    #[must_use]
    pub fn occupancy(&self) -> u32 {
        self.occupancy.load(Ordering::Acquire)
    }

    /// Whether the cook is qualified for `food`.
    #[must_use]
    pub const fn is_qualified(&self, food: &Food) -> bool {
        food.complexity <= self.profile.rank
    }

    /// Whether the cook is qualified and has a free slot.
    #[must_use]
    pub fn can_cook(&self, food: &Food) -> bool {
        self.occupancy() < self.profile.proficiency && self.is_qualified(food)
    }

    /// Take a slot if the cook is below its proficiency.
    pub fn try_occupy(&self) -> bool {
        let mut current = self.occupancy.load(Ordering::Acquire);
        loop {
            if current >= self.profile.proficiency {
                return false;
            }
            match self.occupancy.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    fn vacate(&self, ctx: &CookContext) {
        if self
            .occupancy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
        {
            tracing::warn!(cook_id = self.id, "occupancy released below zero");
        }
        ctx.cook_freed.notify_one();
    }

    /// Run one turn of `task`. The dispatcher has already taken a slot.
    pub(crate) async fn cook(self: Arc<Self>, mut task: CookingTask, ctx: Arc<CookContext>) {
        if !self.is_qualified(&task.food) {
            tracing::warn!(
                cook_id = self.id,
                order_id = task.order_id,
                food_id = task.food_id,
                "{} is not qualified to cook {}",
                self.profile.name,
                task.food.name
            );
            KitchenCounters::bump(&ctx.counters.tasks_dropped);
            self.vacate(&ctx);
            return;
        }
        if self.occupancy() > self.profile.proficiency {
            tracing::warn!(
                cook_id = self.id,
                order_id = task.order_id,
                "{} is busy",
                self.profile.name
            );
            KitchenCounters::bump(&ctx.counters.tasks_dropped);
            self.vacate(&ctx);
            return;
        }

        let apparatus = self.take_apparatus(&task, &ctx).await;
        let turn = plan_turn(
            task.food.preparation_time,
            task.remaining_preparation_time,
            ctx.ctx_switch_factor,
        );
        match turn {
            Turn::Slice(slice) => {
                tokio::time::sleep(units_to_duration(slice, ctx.time_unit)).await;
                drop(apparatus);
                task.remaining_preparation_time -= slice;
                task.slices += 1;
                tracing::debug!(
                    cook_id = self.id,
                    order_id = task.order_id,
                    item_id = task.item_id,
                    remaining = task.remaining_preparation_time,
                    "{} switched away from {}",
                    self.profile.name,
                    task.food.name
                );
                KitchenCounters::bump(&ctx.counters.slices_requeued);
                if ctx.requeue.send(task).is_err() {
                    tracing::warn!(cook_id = self.id, "task queue closed, slice discarded");
                }
            }
            Turn::Finish(remaining) => {
                tokio::time::sleep(units_to_duration(remaining, ctx.time_unit)).await;
                drop(apparatus);
                task.remaining_preparation_time = 0;
                tracing::debug!(
                    cook_id = self.id,
                    order_id = task.order_id,
                    food_id = task.food_id,
                    "{} finished cooking {}",
                    self.profile.name,
                    task.food.name
                );
                let report = CompletionReport {
                    order_id: task.order_id,
                    item_id: task.item_id,
                    food_id: task.food_id,
                    cook_id: self.id,
                };
                if ctx.reports.send(report).is_err() {
                    tracing::warn!(cook_id = self.id, "completion tracker gone, report discarded");
                }
            }
        }
        self.vacate(&ctx);
    }

    async fn take_apparatus(
        &self,
        task: &CookingTask,
        ctx: &CookContext,
    ) -> Option<ApparatusGuard> {
        let name = task.food.cooking_apparatus.as_deref()?;
        let guard = ctx.apparatuses.acquire(name).await;
        if guard.is_none() {
            tracing::warn!(
                cook_id = self.id,
                food_id = task.food_id,
                apparatus = name,
                "no such apparatus, cooking without it"
            );
        }
        guard
    }
}
