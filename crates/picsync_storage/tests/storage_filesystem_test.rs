//! Tests for the filesystem-backed record store.

use picsync_core::{Chunk, RecordContent, RecordId};
use picsync_storage::{
    FileSystemRecordStore, RecordStore, StoreLimits, WriteBatch, fingerprint, join,
    split_into_chunks,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> FileSystemRecordStore {
    FileSystemRecordStore::open(dir.path(), StoreLimits::new(64, 16).unwrap()).unwrap()
}

#[tokio::test]
async fn test_open_creates_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");

    let store = FileSystemRecordStore::open(&nested, StoreLimits::default()).unwrap();
    assert!(nested.exists());
    assert_eq!(store.base_path(), nested.as_path());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_records_and_chunks_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let payload = "data:image/png;base64,".to_string() + &"Q".repeat(100);
    let id = RecordId::from("persisted");

    let stamp = {
        let store = open(&dir);
        let chunks = split_into_chunks(&payload, 48).unwrap();
        let mut batch = WriteBatch::new();
        for chunk in &chunks {
            batch = batch.put_chunk(id.clone(), chunk.clone());
        }
        let batch = batch.put_record(
            id.clone(),
            fingerprint(&payload),
            RecordContent::Chunked {
                chunk_count: chunks.len() as u32,
            },
        );
        store.commit(batch).await.unwrap().stamp
    };

    let store = open(&dir);
    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(*record.order(), stamp);
    assert_eq!(record.chunk_count(), Some(3));

    let joined = join(&id, store.chunks(&id).await.unwrap(), 3).unwrap();
    assert_eq!(joined, payload);

    // Clock continues past the persisted stamp
    let next = store.commit(WriteBatch::new().touch_record(id)).await.unwrap();
    assert!(next.stamp > stamp);
}

#[tokio::test]
async fn test_rejected_batch_leaves_disk_unchanged() {
    let dir = TempDir::new().unwrap();
    let id = RecordId::from("keep");

    {
        let store = open(&dir);
        store
            .upsert(
                id.clone(),
                fingerprint("small"),
                RecordContent::Inline {
                    payload: "small".to_string(),
                },
            )
            .await
            .unwrap();

        let oversized = WriteBatch::new()
            .delete_record(id.clone())
            .put_chunk(RecordId::from("big"), Chunk::new(0, "x".repeat(49)));
        assert!(store.commit(oversized).await.is_err());
        assert!(store.get(&id).await.unwrap().is_some());
    }

    let store = open(&dir);
    assert!(store.get(&id).await.unwrap().is_some());
    assert!(store.chunks(&RecordId::from("big")).await.unwrap().is_empty());
    assert!(!dir.path().join("records.tmp").exists());
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("records.json"), b"{not json").unwrap();

    let result = FileSystemRecordStore::open(dir.path(), StoreLimits::default());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_filesystem_store_publishes_commits() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let mut subscription = store.subscribe();
    assert!(subscription.next().await.unwrap().unwrap().records.is_empty());

    store
        .upsert(
            RecordId::from("a"),
            fingerprint("a"),
            RecordContent::Inline {
                payload: "a".to_string(),
            },
        )
        .await
        .unwrap();

    let snapshot = subscription.next().await.unwrap().unwrap();
    assert_eq!(snapshot.records.len(), 1);
}

#[tokio::test]
async fn test_reload_picks_up_other_writers() {
    let dir = TempDir::new().unwrap();
    let reader = open(&dir);
    let writer = open(&dir);
    let mut subscription = reader.subscribe();
    subscription.next().await.unwrap().unwrap();

    assert!(!reader.reload().await.unwrap());

    writer
        .upsert(
            RecordId::from("remote"),
            fingerprint("remote"),
            RecordContent::Inline {
                payload: "remote".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(reader.reload().await.unwrap());
    assert!(reader.get(&RecordId::from("remote")).await.unwrap().is_some());
    let snapshot = subscription.next().await.unwrap().unwrap();
    assert_eq!(snapshot.records.len(), 1);

    assert!(!reader.reload().await.unwrap());
}

#[tokio::test]
async fn test_two_writers_keep_each_others_records() {
    let dir = TempDir::new().unwrap();
    let a = open(&dir);
    let b = open(&dir);

    a.upsert(
        RecordId::from("from-a"),
        fingerprint("a"),
        RecordContent::Inline {
            payload: "a".to_string(),
        },
    )
    .await
    .unwrap();
    b.upsert(
        RecordId::from("from-b"),
        fingerprint("b"),
        RecordContent::Inline {
            payload: "b".to_string(),
        },
    )
    .await
    .unwrap();

    // b built on a's commit before writing
    assert_eq!(b.list().await.unwrap().len(), 2);
    assert!(a.reload().await.unwrap());
    assert_eq!(a.list().await.unwrap().len(), 2);

    let reopened = open(&dir);
    let ids: Vec<String> = reopened
        .list()
        .await
        .unwrap()
        .iter()
        .map(|record| record.id().to_string())
        .collect();
    assert_eq!(ids, vec!["from-b".to_string(), "from-a".to_string()]);
}
