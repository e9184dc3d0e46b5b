//! Tests for the order event journal

use kitchen_scheduler::core::{build_event, EventJournal, EventKind, InMemoryJournal};

#[test]
fn test_in_memory_journal() {
    let journal = InMemoryJournal::new(10);

    let event = build_event(1, EventKind::Received, None, Some("table 3".to_string()));
    journal.record(event.clone());
    assert_eq!(journal.events().len(), 1);

    let events = journal.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].order_id, 1);
    assert_eq!(events[0].kind, EventKind::Received);
    assert_eq!(events[0].detail.as_deref(), Some("table 3"));
}

#[test]
fn test_journal_overflow() {
    let journal = InMemoryJournal::new(2);

    journal.record(build_event(1, EventKind::Received, None, None));
    journal.record(build_event(2, EventKind::Received, None, None));
    journal.record(build_event(3, EventKind::Received, None, None));

    let events = journal.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].order_id, 2); // First one evicted
    assert_eq!(events[1].order_id, 3);
}

#[test]
fn test_orders_with_filters_by_kind() {
    let journal = InMemoryJournal::new(16);
    journal.record(build_event(1, EventKind::Received, None, None));
    journal.record(build_event(1, EventKind::Admitted, None, None));
    journal.record(build_event(2, EventKind::Received, None, None));
    journal.record(build_event(1, EventKind::ItemReady, Some(3), None));

    assert_eq!(journal.orders_with(EventKind::Received), vec![1, 2]);
    assert_eq!(journal.orders_with(EventKind::Admitted), vec![1]);
    assert!(journal.orders_with(EventKind::Expired).is_empty());
}

#[test]
fn test_clones_share_buffer() {
    let journal = InMemoryJournal::new(4);
    let clone = journal.clone();
    clone.record(build_event(9, EventKind::Distributed, None, None));
    assert_eq!(journal.orders_with(EventKind::Distributed), vec![9]);
}

#[test]
fn test_event_ids_are_unique() {
    let a = build_event(1, EventKind::Received, None, None);
    let b = build_event(1, EventKind::Received, None, None);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_event_kind_serializes_snake_case() {
    let json = serde_json::to_string(&EventKind::DeliveryFailed).unwrap();
    assert_eq!(json, "\"delivery_failed\"");
}
