//! Tests for builder modules

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use kitchen_scheduler::builders::KitchenBuilder;
use kitchen_scheduler::config::{KitchenConfig, ReferenceData};
use kitchen_scheduler::core::{KitchenError, Order, OrderQueue, QueuedOrder};
use kitchen_scheduler::infra::{InMemoryOrderQueue, InMemorySink};
use kitchen_scheduler::runtime::TokioSpawner;

fn reference() -> ReferenceData {
    ReferenceData::load_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap()
}

#[test]
fn test_kitchen_builder_defaults() {
    let builder = KitchenBuilder::new("kitchen1");
    assert_eq!(builder.name(), "kitchen1");
    assert_eq!(builder.config(), &KitchenConfig::default());
}

#[test]
fn test_kitchen_builder_with_config() {
    let config = KitchenConfig {
        nr_of_concurrent_orders: 5,
        ..KitchenConfig::default()
    };
    let builder = KitchenBuilder::new("kitchen1").with_config(config);
    assert_eq!(builder.config().nr_of_concurrent_orders, 5);
}

#[tokio::test]
async fn test_start_requires_sink() {
    let result = KitchenBuilder::new("no-sink")
        .with_reference(reference())
        .start(TokioSpawner::current());
    assert!(matches!(
        result,
        Err(KitchenError::Config(msg)) if msg.contains("no distribution sink")
    ));
}

#[tokio::test]
async fn test_start_rejects_invalid_config() {
    let config = KitchenConfig {
        ctx_switch_factor: 0,
        ..KitchenConfig::default()
    };
    let result = KitchenBuilder::new("bad")
        .with_config(config)
        .with_reference(reference())
        .with_sink(Arc::new(InMemorySink::new()))
        .start(TokioSpawner::current());
    assert!(matches!(result, Err(KitchenError::Config(_))));
}

#[tokio::test]
async fn test_start_loads_reference_dir() {
    let config = KitchenConfig {
        reference_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/config").into(),
        ..KitchenConfig::default()
    };
    let kitchen = KitchenBuilder::new("main")
        .with_config(config)
        .with_sink(Arc::new(InMemorySink::new()))
        .start(TokioSpawner::current())
        .unwrap();
    assert_eq!(kitchen.menu().len(), 13);
    assert_eq!(kitchen.cooks().len(), 4);
    assert_eq!(kitchen.apparatus("oven").map(|a| a.quantity()), Some(2));
    kitchen.shutdown();
}

/// Counts enqueues on top of the in-memory queue.
struct CountingQueue {
    inner: InMemoryOrderQueue,
    enqueued: Arc<AtomicUsize>,
}

impl OrderQueue for CountingQueue {
    fn enqueue(&mut self, entry: QueuedOrder) {
        self.enqueued.fetch_add(1, Ordering::SeqCst);
        self.inner.enqueue(entry);
    }

    fn dequeue(&mut self) -> Option<QueuedOrder> {
        self.inner.dequeue()
    }

    fn prune_expired(&mut self, now: Instant, time_unit: Duration) -> Vec<QueuedOrder> {
        self.inner.prune_expired(now, time_unit)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_with_custom_queue() {
    let enqueued = Arc::new(AtomicUsize::new(0));
    let sink = InMemorySink::new();
    let kitchen = KitchenBuilder::new("custom-queue")
        .with_config(KitchenConfig {
            time_unit_ms: 1,
            ..KitchenConfig::default()
        })
        .with_reference(reference())
        .with_sink(Arc::new(sink.clone()))
        .with_queue(Box::new(CountingQueue {
            inner: InMemoryOrderQueue::new(),
            enqueued: Arc::clone(&enqueued),
        }))
        .start(TokioSpawner::current())
        .unwrap();

    kitchen
        .submit(Order {
            order_id: 1,
            table_id: 1,
            waiter_id: 1,
            items: vec![2],
            priority: 1,
            max_wait: 0.0,
            pick_up_time: None,
        })
        .unwrap();

    assert_eq!(sink.wait_for(1, Duration::from_secs(10)).await.len(), 1);
    assert_eq!(enqueued.load(Ordering::SeqCst), 1);
    kitchen.shutdown();
}
