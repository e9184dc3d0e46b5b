//! Tests for distribution sinks and dead letters

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use kitchen_scheduler::core::{Distribution, DistributionSink, KitchenError, Order};
use kitchen_scheduler::infra::{
    DeadLetter, DeadLetterStore, InMemoryDeadLetter, InMemorySink, JsonlDeadLetter, RetryPolicy,
    RetryingSink,
};

struct Down;

#[async_trait]
impl DistributionSink for Down {
    async fn deliver(&self, _distribution: &Distribution) -> Result<(), KitchenError> {
        Err(KitchenError::Sink("dining hall unreachable".into()))
    }
}

fn distribution(order_id: u64) -> Distribution {
    Distribution::open(
        Order {
            order_id,
            table_id: 4,
            waiter_id: 2,
            items: vec![3, 4],
            priority: 1,
            max_wait: 12.5,
            pick_up_time: None,
        },
        Instant::now(),
    )
}

#[tokio::test]
async fn test_in_memory_sink_collects() {
    let sink = InMemorySink::new();
    sink.deliver(&distribution(1)).await.unwrap();
    sink.deliver(&distribution(2)).await.unwrap();
    let got = sink.wait_for(2, Duration::from_millis(50)).await;
    assert_eq!(got.iter().map(Distribution::order_id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_retrying_sink_dead_letters_to_file() {
    let dir = std::env::temp_dir().join(format!("kitchen-sink-{}", uuid::Uuid::new_v4()));
    let store = Arc::new(JsonlDeadLetter::new(dir.join("dead.jsonl")).unwrap());
    let sink = RetryingSink::new(
        Down,
        RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
        },
    )
    .with_dead_letter(store.clone());

    assert!(sink.deliver(&distribution(5)).await.is_err());
    let letters = store.load().unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].distribution.order_id(), 5);
    assert_eq!(letters[0].distribution.order.items, vec![3, 4]);
    assert_eq!(letters[0].attempts, 2);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_dead_letter_serializes_flat_order() {
    let letter = DeadLetter::new(distribution(8), 1, "timeout");
    let json = serde_json::to_value(&letter).unwrap();
    assert_eq!(json["distribution"]["order_id"], 8);
    assert_eq!(json["distribution"]["cooking_time"], 0);
    assert_eq!(json["reason"], "timeout");
}

#[test]
fn test_in_memory_dead_letter() {
    let store = InMemoryDeadLetter::new();
    store.store(DeadLetter::new(distribution(1), 3, "x")).unwrap();
    assert_eq!(store.letters()[0].attempts, 3);
}
