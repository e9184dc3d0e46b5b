//! Tests for configuration loading

use std::time::Duration;

use kitchen_scheduler::config::{DeliveryConfig, KitchenConfig};

#[test]
fn test_defaults_match_dining_hall_setup() {
    let cfg = KitchenConfig::default();
    assert_eq!(cfg.time_unit_ms, 250);
    assert_eq!(cfg.nr_of_tables, 10);
    assert_eq!(cfg.max_order_items_count, 10);
    assert_eq!(cfg.ctx_switch_factor, 3);
    assert_eq!(cfg.nr_of_concurrent_orders, 2);
    assert_eq!(cfg.kitchen_port, "8081");
    assert!(!cfg.enforce_max_wait);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_from_json_str_valid() {
    let json = r#"{
        "time_unit_ms": 5,
        "nr_of_concurrent_orders": 4,
        "apparatus_retry_ms": 2,
        "enforce_max_wait": true,
        "delivery": { "max_attempts": 2, "dead_letter_path": "data/dead.jsonl" }
    }"#;
    let cfg = KitchenConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.time_unit(), Duration::from_millis(5));
    assert_eq!(cfg.apparatus_retry(), Duration::from_millis(2));
    assert_eq!(cfg.nr_of_concurrent_orders, 4);
    assert!(cfg.enforce_max_wait);
    assert_eq!(cfg.delivery.max_attempts, 2);
    assert_eq!(cfg.delivery.initial_backoff_ms, 100);
}

#[test]
fn test_from_json_str_invalid() {
    assert!(KitchenConfig::from_json_str(r#"{"nr_of_concurrent_orders":0}"#).is_err());
    assert!(KitchenConfig::from_json_str(r#"{"time_unit_ms":0}"#).is_err());
    assert!(KitchenConfig::from_json_str(r#"{"kitchen_port":"http"}"#).is_err());
    assert!(KitchenConfig::from_json_str("not json")
        .unwrap_err()
        .starts_with("parse error"));
}

#[test]
fn test_delivery_validation() {
    let delivery = DeliveryConfig {
        max_attempts: 0,
        ..DeliveryConfig::default()
    };
    assert!(delivery.validate().is_err());
}

#[test]
fn test_from_file_reads_sample_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/cfg.json");
    let cfg = KitchenConfig::from_file(path).unwrap();
    assert_eq!(cfg.reference_dir.to_str(), Some("config"));
    assert!(cfg.delivery.dead_letter_path.is_some());
}

#[test]
fn test_from_file_missing() {
    assert!(KitchenConfig::from_file("/nonexistent/cfg.json").is_err());
}
