//! Tests for error types

use kitchen_scheduler::core::KitchenError;

#[test]
fn test_invalid_order_display() {
    let err = KitchenError::InvalidOrder {
        order_id: 4,
        reason: "order has no items".into(),
    };
    assert_eq!(err.to_string(), "order 4 rejected: order has no items");
}

#[test]
fn test_delivery_failed_display() {
    let err = KitchenError::DeliveryFailed {
        order_id: 9,
        attempts: 3,
        reason: "connection refused".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("order 9"));
    assert!(msg.contains("3 attempts"));
    assert!(msg.contains("connection refused"));
}

#[test]
fn test_config_and_shutdown_display() {
    assert_eq!(
        KitchenError::Config("bad".into()).to_string(),
        "invalid configuration: bad"
    );
    assert_eq!(KitchenError::ShutDown.to_string(), "kitchen is shut down");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "menu.json");
    let err: KitchenError = io.into();
    assert!(matches!(err, KitchenError::Io(_)));
}

#[test]
fn test_serde_error_conversion() {
    let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: KitchenError = parse.into();
    assert!(err.to_string().starts_with("serialization error"));
}

#[test]
fn test_anyhow_wraps_kitchen_error() {
    fn fails() -> kitchen_scheduler::core::AppResult<()> {
        Err(KitchenError::ShutDown.into())
    }
    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<KitchenError>().is_some());
}
