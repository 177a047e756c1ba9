//! Integration tests for the file-backed store's seeding lifecycle.

use std::fs;

use opentdc_store::file::{DATA_FILE_NAME, FileStoreConfig, JsonFileStore, SEED_FILE_NAME};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

fn write_seed(dir: &TempDir, prefix: &str, records: &Value) {
    let path = dir.path().join(format!("{prefix}{SEED_FILE_NAME}"));
    fs::write(path, serde_json::to_string(records).unwrap()).unwrap();
}

fn store(dir: &TempDir, prefix: &str) -> JsonFileStore<Value> {
    JsonFileStore::new(FileStoreConfig::persistent(dir.path()).with_prefix(prefix))
}

#[test]
fn test_first_run_seeds_persistent_file() {
    let dir = TempDir::new().unwrap();
    let seed = json!([
        { "title": "Arbalo AG", "city": "Zug" },
        { "title": "Example GmbH", "city": "Bern" },
        { "title": "Sample SA", "city": "Genf" },
    ]);
    write_seed(&dir, "companies-", &seed);

    let store = store(&dir, "companies-");
    let records = store.import_or_seed().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(Value::Array(records.clone()), seed);

    let data_path = dir.path().join(format!("companies-{DATA_FILE_NAME}"));
    assert_eq!(store.data_path(), data_path);
    let persisted: Value = serde_json::from_str(&fs::read_to_string(&data_path).unwrap()).unwrap();
    assert_eq!(persisted, seed);
}

#[test]
fn test_second_run_ignores_changed_seed() {
    let dir = TempDir::new().unwrap();
    write_seed(&dir, "", &json!([{ "n": 1 }, { "n": 2 }]));
    let store = store(&dir, "");

    let first = store.import_or_seed().unwrap();
    write_seed(&dir, "", &json!([{ "n": 99 }]));
    let second = store.import_or_seed().unwrap();

    assert_eq!(first, second);
    assert_eq!(second, vec![json!({ "n": 1 }), json!({ "n": 2 })]);
}

#[test]
fn test_exported_changes_survive_restart() {
    let dir = TempDir::new().unwrap();
    write_seed(&dir, "", &json!([{ "n": 1 }]));

    let store = store(&dir, "");
    let mut records = store.import_or_seed().unwrap();
    records.push(json!({ "n": 2 }));
    store.export_to(&records).unwrap();

    let restarted = self::store(&dir, "");
    assert_eq!(restarted.import_or_seed().unwrap(), records);
}

#[test]
fn test_missing_seed_bootstraps_empty_file() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir, "");

    assert!(store.import_or_seed().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.data_path()).unwrap(), "[]");
}

#[test]
fn test_corrupt_data_file_is_internal_error() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir, "");
    fs::write(store.data_path(), "{ not json").unwrap();

    let err = store.import_or_seed().unwrap_err();
    assert!(err.is_internal());
}

#[test]
fn test_export_replaces_previous_contents() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir, "");

    store.export_to(&[json!({ "n": 1 }), json!({ "n": 2 })]).unwrap();
    store.export_to(&[json!({ "n": 3 })]).unwrap();

    assert_eq!(
        store.import_from(&store.data_path()).unwrap(),
        vec![json!({ "n": 3 })]
    );
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from(DATA_FILE_NAME)]);
}
