//! Domain model shared by every kitchen component.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::util::serde::{CookId, FoodId, ItemId, OrderId, TimeUnits};

/// An order as sent by the dining hall. Immutable once admitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub order_id: OrderId,
    /// Table the order was taken at.
    #[serde(default)]
    pub table_id: u32,
    /// Waiter that took the order.
    #[serde(default)]
    pub waiter_id: u32,
    /// Menu ids in order; duplicates allowed, position is meaningful.
    pub items: Vec<FoodId>,
    /// Lower values are admitted first.
    #[serde(default)]
    pub priority: i32,
    /// Maximum acceptable wait in time units.
    #[serde(default)]
    pub max_wait: f64,
    /// When the waiter picked the order up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_up_time: Option<DateTime<Utc>>,
}

/// A preparable dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    /// 1-based menu identifier.
    pub id: FoodId,
    /// Display name.
    pub name: String,
    /// Base preparation duration in time units.
    pub preparation_time: TimeUnits,
    /// Minimum cook rank required.
    pub complexity: u32,
    /// Shared apparatus the dish needs, if any.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub cooking_apparatus: Option<String>,
}

/// `null`, absent and `""` all mean no apparatus.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.trim().is_empty()))
}

/// The menu, indexed by 1-based food id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Foods in id order.
    pub foods: Vec<Food>,
}

impl Menu {
    /// Build a menu from foods already in id order.
    #[must_use]
    pub const fn new(foods: Vec<Food>) -> Self {
        Self { foods }
    }

    /// Resolve a 1-based food id.
    #[must_use]
    pub fn get(&self, id: FoodId) -> Option<&Food> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.foods.get(index)
    }

    /// Number of foods on the menu.
    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    /// Whether the menu has no foods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

/// Capability and capacity record of a cook from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookProfile {
    /// Highest food complexity the cook may prepare.
    pub rank: u32,
    /// Maximum concurrently held tasks.
    pub proficiency: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Printed when the cook enters the kitchen.
    #[serde(default)]
    pub catch_phrase: String,
}

/// A shared, quantity-limited tool in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApparatusSpec {
    /// Apparatus name referenced by `Food::cooking_apparatus`.
    pub name: String,
    /// Number of slots.
    pub quantity: u32,
}

/// One item's preparation work; resumable across time slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookingTask {
    /// Owning order.
    pub order_id: OrderId,
    /// Position within the order.
    pub item_id: ItemId,
    /// Menu id of the food.
    pub food_id: FoodId,
    /// Snapshot of the food being prepared.
    pub food: Food,
    /// Cook holding the current turn, set on dispatch.
    pub cook_id: Option<CookId>,
    /// Time units still to cook.
    pub remaining_preparation_time: TimeUnits,
    /// Number of slices already cooked and re-queued.
    pub slices: u32,
}

impl CookingTask {
    /// Fresh task for the item at `item_id`.
    #[must_use]
    pub fn new(order_id: OrderId, item_id: ItemId, food: Food) -> Self {
        Self {
            order_id,
            item_id,
            food_id: food.id,
            remaining_preparation_time: food.preparation_time,
            food,
            cook_id: None,
            slices: 0,
        }
    }

    /// Whether the task has been preempted at least once.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.slices > 0
    }
}

/// Sent by a cook when an item is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Owning order.
    pub order_id: OrderId,
    /// Position within the order.
    pub item_id: ItemId,
    /// Food that was cooked.
    pub food_id: FoodId,
    /// Cook that finished it.
    pub cook_id: CookId,
}

/// A (food, cook) pair in a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingDetail {
    /// Food that was cooked.
    pub food_id: FoodId,
    /// Cook that finished it.
    pub cook_id: CookId,
}

/// The assembled result of an order, sent to the dining hall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    /// The original order.
    #[serde(flatten)]
    pub order: Order,
    /// Time units between admission and the last item.
    pub cooking_time: u64,
    /// One entry per item, in completion order.
    pub cooking_details: Vec<CookingDetail>,
    #[serde(skip)]
    received: Vec<bool>,
    #[serde(skip)]
    admitted_at: Option<Instant>,
}

impl Distribution {
    /// Open a distribution for an order admitted at `admitted_at`.
    #[must_use]
    pub fn open(order: Order, admitted_at: Instant) -> Self {
        let items = order.items.len();
        Self {
            order,
            cooking_time: 0,
            cooking_details: Vec::with_capacity(items),
            received: vec![false; items],
            admitted_at: Some(admitted_at),
        }
    }

    /// Identifier of the underlying order.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order.order_id
    }

    /// When the order was admitted, if this distribution was opened locally.
    #[must_use]
    pub const fn admitted_at(&self) -> Option<Instant> {
        self.admitted_at
    }

    /// Whether the item at `item_id` has been received.
    #[must_use]
    pub fn is_received(&self, item_id: ItemId) -> bool {
        self.received.get(item_id).copied().unwrap_or(false)
    }

    /// Mark an item received and record who cooked it.
    pub(crate) fn mark_received(&mut self, item_id: ItemId, detail: CookingDetail) {
        if let Some(slot) = self.received.get_mut(item_id) {
            *slot = true;
            self.cooking_details.push(detail);
        }
    }

    /// Number of items still outstanding.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.received.iter().filter(|r| !**r).count()
    }

    /// Whether every item position has been received.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.received.iter().all(|r| *r)
    }
}
