//! Tests for the in-memory record store and subscriptions.

use futures::StreamExt;
use picsync_core::{Chunk, RecordContent, RecordId};
use picsync_storage::{
    ChangeKind, MemoryRecordStore, RecordStore, StoreLimits, WriteBatch, fingerprint,
};

fn inline(payload: &str) -> RecordContent {
    RecordContent::Inline {
        payload: payload.to_string(),
    }
}

#[tokio::test]
async fn test_upsert_and_get() {
    let store = MemoryRecordStore::default();
    let id = store.new_record_id();

    store
        .upsert(id.clone(), fingerprint("one"), inline("one"))
        .await
        .unwrap();

    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.inline_payload(), Some("one"));
    assert_eq!(record.fingerprint(), &fingerprint("one"));
    assert_eq!(record.order(), record.created_at());
}

#[tokio::test]
async fn test_order_is_monotonic_and_created_at_preserved() {
    let store = MemoryRecordStore::default();
    let id = store.new_record_id();

    let first = store
        .upsert(id.clone(), fingerprint("one"), inline("one"))
        .await
        .unwrap();
    let second = store
        .commit(WriteBatch::new().touch_record(id.clone()))
        .await
        .unwrap();
    assert!(second.stamp > first.stamp);
    assert!(second.version > first.version);

    let third = store
        .upsert(id.clone(), fingerprint("two"), inline("two"))
        .await
        .unwrap();
    let record = store.get(&id).await.unwrap().unwrap();
    assert_eq!(*record.order(), third.stamp);
    assert_eq!(*record.created_at(), first.stamp);
}

#[tokio::test]
async fn test_list_and_query_are_newest_first() {
    let store = MemoryRecordStore::default();
    let a = RecordId::from("a");
    let b = RecordId::from("b");

    store.upsert(a.clone(), fingerprint("x"), inline("x")).await.unwrap();
    store.upsert(b.clone(), fingerprint("y"), inline("y")).await.unwrap();

    let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id().clone()).collect();
    assert_eq!(ids, vec![b.clone(), a.clone()]);

    let matches = store.find_by_fingerprint(&fingerprint("x")).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id(), &a);
    assert!(store.find_by_fingerprint(&fingerprint("z")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_chunk_aborts_whole_batch() {
    let store = MemoryRecordStore::new(StoreLimits::new(20, 10).unwrap());
    let id = store.new_record_id();

    let batch = WriteBatch::new()
        .put_chunk(id.clone(), Chunk::new(0, "0123456789"))
        .put_chunk(id.clone(), Chunk::new(1, "0123456789X"))
        .put_record(id.clone(), fingerprint("p"), RecordContent::Chunked { chunk_count: 2 });

    assert!(store.commit(batch).await.is_err());
    assert!(store.get(&id).await.unwrap().is_none());
    assert!(store.chunks(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_inline_payload_is_rejected() {
    let store = MemoryRecordStore::new(StoreLimits::new(20, 10).unwrap());
    let id = store.new_record_id();

    assert!(store.upsert(id.clone(), fingerprint("a"), inline("0123456789")).await.is_ok());
    assert!(store.upsert(id, fingerprint("b"), inline("0123456789X")).await.is_err());
}

#[tokio::test]
async fn test_touch_of_missing_record_fails_without_side_effects() {
    let store = MemoryRecordStore::default();
    let id = store.new_record_id();

    let batch = WriteBatch::new()
        .put_chunk(id.clone(), Chunk::new(0, "a"))
        .touch_record(RecordId::from("missing"));

    let err = store.commit(batch).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(store.chunks(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_record_does_not_cascade_to_chunks() {
    let store = MemoryRecordStore::default();
    let id = store.new_record_id();

    store
        .commit(
            WriteBatch::new()
                .put_chunk(id.clone(), Chunk::new(0, "a"))
                .put_record(id.clone(), fingerprint("a"), RecordContent::Chunked { chunk_count: 1 }),
        )
        .await
        .unwrap();

    store.delete(&id).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_none());
    assert_eq!(store.chunks(&id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_batch_is_a_no_op() {
    let store = MemoryRecordStore::default();
    let before = store.commit(WriteBatch::new()).await.unwrap();
    let after = store.commit(WriteBatch::new()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_subscription_yields_full_snapshot_then_deltas() {
    let store = MemoryRecordStore::default();
    let a = RecordId::from("a");
    store.upsert(a.clone(), fingerprint("a"), inline("a")).await.unwrap();

    let mut subscription = store.subscribe();
    let first = subscription.next().await.unwrap().unwrap();
    assert_eq!(first.records.len(), 1);
    assert_eq!(first.changes.len(), 1);
    assert_eq!(first.changes[0].kind, ChangeKind::Added);

    let b = RecordId::from("b");
    store.upsert(b.clone(), fingerprint("b"), inline("b")).await.unwrap();
    let second = subscription.next().await.unwrap().unwrap();
    assert_eq!(second.records[0].id(), &b);
    assert_eq!(second.changes.len(), 1);
    assert_eq!(second.changes[0].id, b);
    assert_eq!(second.changes[0].kind, ChangeKind::Added);

    store.commit(WriteBatch::new().touch_record(a.clone())).await.unwrap();
    let third = subscription.next().await.unwrap().unwrap();
    assert_eq!(third.records[0].id(), &a);
    assert_eq!(third.changes[0].kind, ChangeKind::Modified);

    store.delete(&b).await.unwrap();
    let fourth = subscription.next().await.unwrap().unwrap();
    assert_eq!(fourth.records.len(), 1);
    assert_eq!(fourth.changes[0].kind, ChangeKind::Removed);
    assert_eq!(fourth.changes[0].id, b);
}

#[tokio::test]
async fn test_subscription_coalesces_missed_commits() {
    let store = MemoryRecordStore::default();
    let mut subscription = store.subscribe();
    let initial = subscription.next().await.unwrap().unwrap();
    assert!(initial.records.is_empty());

    for name in ["a", "b", "c"] {
        store
            .upsert(RecordId::from(name), fingerprint(name), inline(name))
            .await
            .unwrap();
    }

    let latest = subscription.next().await.unwrap().unwrap();
    assert_eq!(latest.records.len(), 3);
    assert_eq!(latest.changes.len(), 3);
}

#[tokio::test]
async fn test_subscription_stop_and_restart() {
    let store = MemoryRecordStore::default();
    store
        .upsert(RecordId::from("a"), fingerprint("a"), inline("a"))
        .await
        .unwrap();

    let mut subscription = store.subscribe();
    subscription.next().await.unwrap().unwrap();

    subscription.stop();
    assert!(!subscription.is_active());
    assert!(subscription.next().await.is_none());

    subscription.restart();
    let snapshot = subscription.next().await.unwrap().unwrap();
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.changes[0].kind, ChangeKind::Added);
}

#[tokio::test]
async fn test_subscription_reports_closed_store() {
    let store = MemoryRecordStore::default();
    let mut subscription = store.subscribe();
    subscription.next().await.unwrap().unwrap();

    drop(store);
    let err = subscription.next().await.unwrap().unwrap_err();
    assert!(format!("{}", err).contains("Store operation failed"));
    assert!(subscription.next().await.is_none());
}

#[tokio::test]
async fn test_subscription_as_stream() {
    let store = MemoryRecordStore::default();
    store
        .upsert(RecordId::from("a"), fingerprint("a"), inline("a"))
        .await
        .unwrap();

    let stream = store.subscribe().into_stream();
    drop(store);

    let items: Vec<_> = stream.collect().await;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(items[1].is_err());
}
