//! Tests for error classification helpers.

use picsync_error::{
    HostingError, HostingErrorKind, PicsyncError, PicsyncErrorKind, StorageError,
    StorageErrorKind, SyncError, SyncErrorKind,
};

#[test]
fn test_incomplete_data_is_classified() {
    let err: PicsyncError = StorageError::new(StorageErrorKind::IncompleteData {
        record: "abc".to_string(),
        expected: 3,
        found: 2,
    })
    .into();

    assert!(err.is_incomplete_data());
    assert!(!err.is_payload_too_large());
    assert!(format!("{}", err).contains("expected 3 chunks, found 2"));
}

#[test]
fn test_payload_too_large_is_classified() {
    let err: PicsyncError = SyncError::new(SyncErrorKind::PayloadTooLarge {
        size: 2_000_000,
        limit: 1_048_487,
    })
    .into();

    assert!(err.is_payload_too_large());
    assert!(format!("{}", err).contains("Image too large"));
}

#[test]
fn test_upload_rejected_is_classified() {
    let err: PicsyncError =
        HostingError::new(HostingErrorKind::UploadRejected("400 Bad Request".to_string())).into();

    assert!(err.is_upload_rejected());
    assert!(matches!(err.kind(), PicsyncErrorKind::Hosting(_)));
}

#[test]
fn test_location_is_captured() {
    let err = StorageError::new(StorageErrorKind::NotFound("missing".to_string()));
    assert!(err.file.ends_with("error_classification_test.rs"));
    assert!(err.line > 0);

    let wrapped: PicsyncError = err.into();
    assert!(wrapped.is_not_found());
}
