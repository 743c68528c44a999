//! Tests for record, fingerprint and rotation types.

use picsync_core::{Chunk, Fingerprint, ImageRecord, RecordContent, RecordId, Rotation};
use strum::IntoEnumIterator;

#[test]
fn test_fingerprint_from_digest_is_lowercase_hex() {
    let fingerprint = Fingerprint::from_digest([0xAB, 0x01, 0xFF]);
    assert_eq!(fingerprint.as_str(), "ab01ff");
}

#[test]
fn test_fingerprint_short_prefix_is_bounded() {
    let fingerprint = Fingerprint::from_digest([0x12u8; 32]);
    assert_eq!(fingerprint.short(12), "121212121212");
    assert_eq!(fingerprint.short(100).len(), 64);
}

#[test]
fn test_fingerprint_parse_rejects_malformed_digests() {
    assert!(Fingerprint::parse("0".repeat(64)).is_ok());
    assert!(Fingerprint::parse("0".repeat(63)).is_err());
    assert!(Fingerprint::parse("A".repeat(64)).is_err());
    assert!(Fingerprint::parse("g".repeat(64)).is_err());
}

#[test]
fn test_record_serializes_with_flat_layout() {
    let record = ImageRecord::new(
        RecordId::from("r1"),
        Fingerprint::from_digest([7u8; 32]),
        5,
        3,
        RecordContent::Chunked { chunk_count: 3 },
    );

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["layout"], "chunked");
    assert_eq!(json["chunk_count"], 3);
    assert_eq!(json["id"], "r1");

    let back: ImageRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
    assert!(back.is_chunked());
    assert_eq!(back.chunk_count(), Some(3));
    assert_eq!(back.inline_payload(), None);
}

#[test]
fn test_record_rejects_invalid_fingerprint_on_deserialize() {
    let json = serde_json::json!({
        "id": "r1",
        "fingerprint": "not-a-digest",
        "order": 1,
        "created_at": 1,
        "layout": "inline",
        "payload": "data:,"
    });

    assert!(serde_json::from_value::<ImageRecord>(json).is_err());
}

#[test]
fn test_chunk_new() {
    let chunk = Chunk::new(2, "abc");
    assert_eq!(chunk.part, 2);
    assert_eq!(chunk.data, "abc");
}

#[test]
fn test_rotation_full_turn_returns_upright() {
    for rotation in Rotation::iter() {
        let turned = rotation.clockwise().clockwise().clockwise().clockwise();
        assert_eq!(turned, rotation);
        assert_eq!(rotation.clockwise().counter_clockwise(), rotation);
        assert_eq!(Rotation::from_degrees(i32::from(rotation.degrees())), Some(rotation));
    }
}
