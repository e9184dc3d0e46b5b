//! Shared fixtures for the kitchen integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kitchen_scheduler::builders::KitchenBuilder;
use kitchen_scheduler::config::{KitchenConfig, ReferenceData};
use kitchen_scheduler::core::{
    ApparatusSpec, CookProfile, DistributionSink, EventJournal, Food, Kitchen, Menu, Order,
};
use kitchen_scheduler::runtime::TokioSpawner;

pub fn food(id: u32, preparation_time: u32, complexity: u32, apparatus: Option<&str>) -> Food {
    Food {
        id,
        name: format!("food-{id}"),
        preparation_time,
        complexity,
        cooking_apparatus: apparatus.map(Into::into),
    }
}

pub fn cook(rank: u32, proficiency: u32) -> CookProfile {
    CookProfile {
        rank,
        proficiency,
        name: format!("rank{rank}-prof{proficiency}"),
        catch_phrase: String::new(),
    }
}

pub fn oven(quantity: u32) -> ApparatusSpec {
    ApparatusSpec {
        name: "oven".into(),
        quantity,
    }
}

pub fn reference(
    foods: Vec<Food>,
    cooks: Vec<CookProfile>,
    apparatuses: Vec<ApparatusSpec>,
) -> ReferenceData {
    ReferenceData {
        menu: Menu::new(foods),
        cooks,
        apparatuses,
    }
}

pub fn sample_reference() -> ReferenceData {
    ReferenceData::load_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap()
}

pub fn order(order_id: u64, items: Vec<u32>, priority: i32) -> Order {
    Order {
        order_id,
        table_id: (order_id % 10) as u32 + 1,
        waiter_id: 1,
        items,
        priority,
        max_wait: 0.0,
        pick_up_time: None,
    }
}

pub fn config(time_unit_ms: u64, concurrent_orders: usize) -> KitchenConfig {
    KitchenConfig {
        time_unit_ms,
        nr_of_concurrent_orders: concurrent_orders,
        dispatch_retry_ms: 2,
        apparatus_retry_ms: Some(2),
        ..KitchenConfig::default()
    }
}

pub fn start(
    config: KitchenConfig,
    reference: ReferenceData,
    sink: Arc<dyn DistributionSink>,
    journal: Option<Arc<dyn EventJournal>>,
) -> Kitchen<TokioSpawner> {
    let builder = KitchenBuilder::new("test")
        .with_config(config)
        .with_reference(reference)
        .with_sink(sink);
    let builder = match journal {
        Some(journal) => builder.with_journal(journal),
        None => builder,
    };
    builder.start(TokioSpawner::current()).unwrap()
}

/// Poll `condition` every millisecond until it holds or `timeout` passes.
pub async fn eventually<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(timeout, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .is_ok()
}

/// Run `probe` every millisecond until `done` resolves.
pub async fn sample_while<D, P>(done: D, mut probe: P) -> D::Output
where
    D: Future,
    P: FnMut(),
{
    tokio::pin!(done);
    loop {
        tokio::select! {
            out = &mut done => return out,
            () = tokio::time::sleep(Duration::from_millis(1)) => probe(),
        }
    }
}
