//! Transport-agnostic request/response models.

use serde::{Deserialize, Serialize};

use crate::core::{Kitchen, KitchenError, KitchenStats, Order, Spawn};
use crate::util::serde::OrderId;

/// Reply to an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    /// Identifier of the accepted order.
    pub order_id: OrderId,
    /// Orders waiting for admission after this one was queued.
    pub queued: usize,
}

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Orders being cooked.
    pub in_flight: usize,
    /// Orders waiting for admission.
    pub queued: usize,
}

/// Kitchen snapshot for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenSnapshot {
    /// Counters.
    pub stats: KitchenStats,
    /// Occupancy of each cook, by cook id.
    pub cook_occupancy: Vec<u32>,
}

/// Submit an order to a kitchen.
///
/// # Errors
///
/// Whatever [`Kitchen::submit`] refuses the order with.
pub fn submit_order<S>(kitchen: &Kitchen<S>, order: Order) -> Result<OrderAccepted, KitchenError>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let order_id = order.order_id;
    kitchen.submit(order)?;
    Ok(OrderAccepted {
        order_id,
        queued: kitchen.queued(),
    })
}

/// Return a health payload.
pub fn health<S>(kitchen: &Kitchen<S>) -> Health
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    Health {
        ok: !kitchen.is_shut_down(),
        in_flight: kitchen.in_flight(),
        queued: kitchen.queued(),
    }
}

/// Build the stats listing.
pub fn snapshot<S>(kitchen: &Kitchen<S>) -> KitchenSnapshot
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    KitchenSnapshot {
        stats: kitchen.stats(),
        cook_occupancy: kitchen.cook_occupancy(),
    }
}
