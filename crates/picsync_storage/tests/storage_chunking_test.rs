//! Tests for the chunk codec.

use picsync_core::{Chunk, RecordId};
use picsync_error::{PicsyncErrorKind, StorageErrorKind};
use picsync_storage::{
    DEFAULT_CHUNK_CAPACITY_BYTES, chunk_count_for, join, split, split_into_chunks,
};

fn payload_of(len: usize) -> String {
    let prefix = "data:image/png;base64,";
    let body: String = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/"
        .chars()
        .cycle()
        .take(len - prefix.len())
        .collect();
    format!("{}{}", prefix, body)
}

#[test]
fn test_default_capacity_leaves_headroom() {
    assert_eq!(DEFAULT_CHUNK_CAPACITY_BYTES, 1_048_387);
}

#[test]
fn test_split_then_join_restores_payload() {
    let id = RecordId::from("r1");
    for (len, capacity) in [(100, 7), (100, 99), (100, 100), (4096, 1000), (23, 1)] {
        let payload = payload_of(len);
        let chunks = split_into_chunks(&payload, capacity).unwrap();
        assert_eq!(chunks.len(), chunk_count_for(len, capacity));
        assert!(chunks.iter().all(|chunk| chunk.data.len() <= capacity));

        let count = chunks.len() as u32;
        assert_eq!(join(&id, chunks, count).unwrap(), payload);
    }
}

#[test]
fn test_large_payload_splits_into_three_chunks() {
    let payload = payload_of(2_200_000);
    let pieces = split(&payload, DEFAULT_CHUNK_CAPACITY_BYTES).unwrap();

    let sizes: Vec<usize> = pieces.iter().map(|piece| piece.len()).collect();
    assert_eq!(sizes, vec![1_048_387, 1_048_387, 103_226]);
    assert_eq!(pieces.concat(), payload);
}

#[test]
fn test_split_respects_character_boundaries() {
    // Each 'é' is two bytes; capacity 3 must never cut one in half
    let payload = "éééé";
    let pieces = split(payload, 3).unwrap();
    assert!(pieces.iter().all(|piece| piece.len() <= 3));
    assert_eq!(pieces.concat(), payload);

    assert!(split(payload, 1).is_err());
}

#[test]
fn test_split_empty_payload_yields_nothing() {
    assert!(split("", 10).unwrap().is_empty());
}

#[test]
fn test_split_rejects_zero_capacity() {
    let err = split("abc", 0).unwrap_err();
    assert!(matches!(
        err.kind(),
        PicsyncErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::InvalidConfig(_))
    ));
}

#[test]
fn test_join_sorts_out_of_order_chunks() {
    let id = RecordId::from("r1");
    let chunks = vec![Chunk::new(2, "c"), Chunk::new(0, "a"), Chunk::new(1, "b")];
    assert_eq!(join(&id, chunks, 3).unwrap(), "abc");
}

#[test]
fn test_join_reports_incomplete_data() {
    let id = RecordId::from("r1");
    let chunks = vec![Chunk::new(0, "a"), Chunk::new(1, "b")];

    let err = join(&id, chunks, 3).unwrap_err();
    assert!(err.is_incomplete_data());
    match err.kind() {
        PicsyncErrorKind::Storage(e) => assert_eq!(
            e.kind,
            StorageErrorKind::IncompleteData {
                record: "r1".to_string(),
                expected: 3,
                found: 2,
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_join_rejects_gaps_and_duplicates() {
    let id = RecordId::from("r1");

    let duplicate = vec![Chunk::new(0, "a"), Chunk::new(0, "a"), Chunk::new(2, "c")];
    let err = join(&id, duplicate, 3).unwrap_err();
    assert!(!err.is_incomplete_data());
    assert!(matches!(
        err.kind(),
        PicsyncErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::CorruptChunks(_))
    ));

    let extra = vec![Chunk::new(0, "a"), Chunk::new(1, "b"), Chunk::new(2, "c")];
    assert!(join(&id, extra, 2).is_err());
}
