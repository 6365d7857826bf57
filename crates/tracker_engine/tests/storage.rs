use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use tracker_core::{JobKey, JobRecord};
use tracker_engine::{
    JobStore, JsonFileStorage, StorageBackend, StorageError, StorageMap, JOB_DETAILS_KEY,
    TRACKED_JOBS_KEY,
};

fn items(pairs: &[(&str, serde_json::Value)]) -> StorageMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(temp.path().join("store.json"));

    let found = storage.get(&["jobDetails"]).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn set_get_remove_round_through_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("store.json");
    let storage = JsonFileStorage::new(&path);

    storage
        .set(items(&[("a", json!(1)), ("b", json!([true]))]))
        .await
        .unwrap();
    storage.set(items(&[("c", json!("x"))])).await.unwrap();
    assert!(path.is_file());

    let found = storage.get(&["a", "b", "missing"]).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found["a"], json!(1));

    storage.remove(&["a", "b"]).await.unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({ "c": "x" }));

    // No temp files are left behind next to the document.
    let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn non_object_document_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "[1,2,3]").unwrap();
    let storage = JsonFileStorage::new(&path);

    assert!(matches!(
        storage.get(&["a"]).await,
        Err(StorageError::NotAnObject(_))
    ));
    // A broken document is never overwritten by a write.
    assert!(storage.set(items(&[("a", json!(1))])).await.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[1,2,3]");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();
    let storage = JsonFileStorage::new(&path);

    assert!(matches!(
        storage.get(&["a"]).await,
        Err(StorageError::Malformed { .. })
    ));
}

#[tokio::test]
async fn store_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let record = JobRecord {
        title: "T1".to_string(),
        company_name: "C1".to_string(),
        ..JobRecord::unavailable()
    };

    {
        let store = JobStore::new(Arc::new(JsonFileStorage::new(&path)));
        store.track(record.clone()).await.unwrap();
    }

    let reopened = JobStore::new(Arc::new(JsonFileStorage::new(&path)));
    assert_eq!(reopened.list().await.unwrap(), vec![record]);
    assert!(reopened.is_tracked(&JobKey::new("T1", "C1")).await.unwrap());

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk.get(JOB_DETAILS_KEY).is_some());
    assert_eq!(on_disk[TRACKED_JOBS_KEY], json!({ "T1_C1": true }));
}
