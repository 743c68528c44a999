//! Splitting oversized payloads into bounded chunks and joining them back.
//!
//! Chunk boundaries are byte offsets snapped back to the nearest UTF-8
//! character boundary. Data URLs are ASCII, so in practice every chunk but
//! the last is exactly `capacity` bytes.

use picsync_core::{Chunk, RecordId};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};

/// Hard cap on a single stored document, in bytes.
pub const DOCUMENT_CAPACITY_BYTES: usize = 1_048_487;

/// Bytes reserved in every document for metadata fields.
pub const METADATA_HEADROOM_BYTES: usize = 100;

/// Largest payload slice a single document can carry.
pub const DEFAULT_CHUNK_CAPACITY_BYTES: usize = DOCUMENT_CAPACITY_BYTES - METADATA_HEADROOM_BYTES;

/// Number of chunks `split` produces for a payload of `len` bytes.
///
/// # Examples
///
/// ```
/// use picsync_storage::chunk_count_for;
///
/// assert_eq!(chunk_count_for(2_200_000, 1_048_387), 3);
/// assert_eq!(chunk_count_for(0, 10), 0);
/// ```
pub fn chunk_count_for(len: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    len.div_ceil(capacity)
}

/// Slice `payload` into contiguous pieces of at most `capacity` bytes.
///
/// The pieces cover the payload exactly, in order, with no gaps or overlaps.
/// An empty payload yields no pieces.
///
/// # Errors
///
/// Returns `InvalidConfig` when `capacity` is zero or smaller than a single
/// character of the payload.
pub fn split(payload: &str, capacity: usize) -> PicsyncResult<Vec<&str>> {
    if capacity == 0 {
        return Err(StorageError::new(StorageErrorKind::InvalidConfig(
            "chunk capacity must be positive".to_string(),
        ))
        .into());
    }

    let mut pieces = Vec::with_capacity(chunk_count_for(payload.len(), capacity));
    let mut rest = payload;
    while !rest.is_empty() {
        let mut end = capacity.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            return Err(StorageError::new(StorageErrorKind::InvalidConfig(format!(
                "chunk capacity of {} bytes cannot hold a single character",
                capacity
            )))
            .into());
        }
        let (head, tail) = rest.split_at(end);
        pieces.push(head);
        rest = tail;
    }
    Ok(pieces)
}

/// Split `payload` into chunks numbered from zero.
pub fn split_into_chunks(payload: &str, capacity: usize) -> PicsyncResult<Vec<Chunk>> {
    Ok(split(payload, capacity)?
        .into_iter()
        .enumerate()
        .map(|(part, data)| Chunk::new(part as u32, data))
        .collect())
}

/// Reassemble a chunked payload.
///
/// Chunks may arrive in any order; they are sorted by `part` first.
///
/// # Errors
///
/// - `IncompleteData` when fewer than `expected_count` chunks are supplied,
///   which signals a partial write or a read racing a write.
/// - `CorruptChunks` when the parts are not exactly `0..expected_count`.
pub fn join(record: &RecordId, mut chunks: Vec<Chunk>, expected_count: u32) -> PicsyncResult<String> {
    let found = chunks.len() as u32;
    if found < expected_count {
        return Err(StorageError::new(StorageErrorKind::IncompleteData {
            record: record.to_string(),
            expected: expected_count,
            found,
        })
        .into());
    }

    chunks.sort_by_key(|chunk| chunk.part);
    let in_sequence = found == expected_count
        && chunks
            .iter()
            .enumerate()
            .all(|(index, chunk)| chunk.part as usize == index);
    if !in_sequence {
        let parts: Vec<u32> = chunks.iter().map(|chunk| chunk.part).collect();
        return Err(StorageError::new(StorageErrorKind::CorruptChunks(format!(
            "record {} declares {} chunks but holds parts {:?}",
            record, expected_count, parts
        )))
        .into());
    }

    let mut payload = String::with_capacity(chunks.iter().map(|chunk| chunk.data.len()).sum());
    for chunk in &chunks {
        payload.push_str(&chunk.data);
    }
    Ok(payload)
}
