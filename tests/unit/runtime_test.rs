//! Tests for runtime adapters and the request surface

use std::sync::Arc;

use kitchen_scheduler::builders::KitchenBuilder;
use kitchen_scheduler::config::{KitchenConfig, ReferenceData};
use kitchen_scheduler::core::{KitchenError, Order};
use kitchen_scheduler::infra::InMemorySink;
use kitchen_scheduler::runtime::{health, snapshot, submit_order, TokioSpawner};

fn order(order_id: u64, items: Vec<u32>) -> Order {
    Order {
        order_id,
        table_id: 1,
        waiter_id: 1,
        items,
        priority: 2,
        max_wait: 30.0,
        pick_up_time: None,
    }
}

#[tokio::test]
async fn test_submit_order_and_health() {
    let kitchen = KitchenBuilder::new("api")
        .with_config(KitchenConfig {
            time_unit_ms: 1,
            ..KitchenConfig::default()
        })
        .with_reference(
            ReferenceData::load_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap(),
        )
        .with_sink(Arc::new(InMemorySink::new()))
        .start(TokioSpawner::current())
        .unwrap();

    let accepted = submit_order(&kitchen, order(1, vec![2, 3])).unwrap();
    assert_eq!(accepted.order_id, 1);

    let err = submit_order(&kitchen, order(2, vec![99])).unwrap_err();
    assert!(matches!(err, KitchenError::InvalidOrder { order_id: 2, .. }));

    assert!(health(&kitchen).ok);
    let snap = snapshot(&kitchen);
    assert_eq!(snap.stats.orders_received, 1);
    assert_eq!(snap.cook_occupancy.len(), 4);

    kitchen.shutdown();
    assert!(!health(&kitchen).ok);
}

#[test]
fn test_health_serializes() {
    let payload = kitchen_scheduler::runtime::Health {
        ok: true,
        in_flight: 1,
        queued: 0,
    };
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["in_flight"], 1);
}
