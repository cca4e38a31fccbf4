use gatehouse::store::{json::JsonFileStore, sqlite::SqliteStore, RecordStore};
use gatehouse::validate::{SubmissionType, ValidatedRecord};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

fn rsvp_record(index: usize) -> ValidatedRecord {
    let mut fields = BTreeMap::new();
    fields.insert("code".to_owned(), "IC-1234".to_owned());
    fields.insert("firstName".to_owned(), format!("Guest{}", index));
    fields.insert("lastName".to_owned(), "Stone".to_owned());
    fields.insert("notify".to_owned(), "email".to_owned());
    fields.insert("plusOne".to_owned(), "no".to_owned());
    ValidatedRecord {
        kind: SubmissionType::Rsvp,
        fields,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_to_json_store_all_land() {
    let data_dir = std::env::temp_dir().join(format!("gatehouse-test-{}", Uuid::new_v4()));
    let store = Arc::new(JsonFileStore::new(&data_dir).await.unwrap());

    let mut handles = Vec::new();
    for index in 0..16 {
        let store = store.to_owned();
        handles.push(tokio::spawn(async move {
            store.append(&rsvp_record(index)).await.unwrap()
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }

    assert_eq!(ids.len(), 16);
    assert_eq!(store.count(SubmissionType::Rsvp).await.unwrap(), 16);

    let _ = tokio::fs::remove_dir_all(&data_dir).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_to_sqlite_store_all_land() {
    let store = Arc::new(SqliteStore::new(":memory:").unwrap());

    let mut handles = Vec::new();
    for index in 0..8 {
        let store = store.to_owned();
        handles.push(tokio::spawn(async move {
            store.append(&rsvp_record(index)).await.unwrap()
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }

    assert_eq!(ids.len(), 8);
    assert_eq!(store.count(SubmissionType::Rsvp).await.unwrap(), 8);
}
