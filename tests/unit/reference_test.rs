//! Tests for reference data loading

use std::path::PathBuf;

use kitchen_scheduler::config::ReferenceData;
use kitchen_scheduler::core::KitchenError;

fn sample_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kitchen-reference-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_load_sample_reference_data() {
    let data = ReferenceData::load_dir(sample_dir()).unwrap();
    assert_eq!(data.menu.len(), 13);
    assert_eq!(data.cooks.len(), 4);
    assert_eq!(data.apparatuses.len(), 2);
    assert_eq!(data.max_rank(), 3);

    let pizza = data.menu.get(1).unwrap();
    assert_eq!(pizza.cooking_apparatus.as_deref(), Some("oven"));
    assert!(data.menu.get(2).unwrap().cooking_apparatus.is_none());
}

#[test]
fn test_missing_file_names_it() {
    let dir = scratch_dir();
    let err = ReferenceData::load_dir(&dir).unwrap_err();
    assert!(matches!(err, KitchenError::ReferenceData(ref msg) if msg.contains("menu.json")));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_invalid_quantity_rejected() {
    let dir = scratch_dir();
    std::fs::write(
        dir.join("menu.json"),
        concat!(
            r#"{"foods":[{"id":1,"name":"salad","preparation_time":10,"#,
            r#""complexity":1,"cooking_apparatus":null}]}"#,
        ),
    )
    .unwrap();
    std::fs::write(
        dir.join("cooks.json"),
        r#"{"cooks":[{"rank":1,"proficiency":1,"name":"a","catch_phrase":"b"}]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("apparatuses.json"),
        r#"{"apparatuses":[{"name":"oven","quantity":0}]}"#,
    )
    .unwrap();

    let err = ReferenceData::load_dir(&dir).unwrap_err();
    assert!(err.to_string().contains("zero quantity"));
    std::fs::remove_dir_all(dir).ok();
}
