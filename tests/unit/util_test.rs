//! Tests for utility functions

use std::time::Duration;

use kitchen_scheduler::util::{now_ms, to_time_units, units_to_duration, FoodId, OrderId, TimeUnits};

#[test]
fn test_time_unit_round_trip() {
    let unit = Duration::from_millis(250);
    let units: TimeUnits = 7;
    assert_eq!(to_time_units(units_to_duration(units, unit), unit), 7);
}

#[test]
fn test_partial_units_are_truncated() {
    let unit = Duration::from_millis(100);
    assert_eq!(to_time_units(Duration::from_millis(399), unit), 3);
}

#[test]
fn test_now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_identifier_types() {
    let order: OrderId = 12_345;
    let food: FoodId = 13;
    assert_eq!(order, 12_345);
    assert_eq!(food, 13);
}
