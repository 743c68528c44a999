//! Tests for layered configuration.

use picsync::{
    ConfigErrorKind, HostProvider, ImageHost, PicsyncConfig, PicsyncError, PicsyncErrorKind,
    PolicyMode, SizePolicy, DEFAULT_CHUNK_CAPACITY_BYTES,
};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_error_kind(err: &PicsyncError) -> ConfigErrorKind {
    match err.kind() {
        PicsyncErrorKind::Config(e) => e.kind.clone(),
        other => panic!("unexpected error: {}", other),
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_bundled_defaults() {
    let config = PicsyncConfig::bundled().unwrap();

    assert_eq!(config.store.document_capacity, 1_048_487);
    assert_eq!(config.store.metadata_headroom, 100);
    assert_eq!(config.store.path, None);
    assert_eq!(config.policy.mode, PolicyMode::Chunked);
    assert_eq!(config.hosting.provider, HostProvider::Imgur);
    assert_eq!(config, PicsyncConfig::default());

    assert_eq!(
        config.size_policy().unwrap(),
        SizePolicy::Chunked {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY_BYTES,
            max_payload_bytes: None,
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_overrides_only_given_keys() {
    let file = config_file(
        r#"
[store]
path = "/tmp/picsync-test"

[policy]
mode = "inline_only"
max_payload_bytes = 500
"#,
    );

    let config = PicsyncConfig::from_file(file.path()).unwrap();
    assert_eq!(config.store.resolved_path(), PathBuf::from("/tmp/picsync-test"));
    assert_eq!(config.store.document_capacity, 1_048_487);
    assert_eq!(
        config.size_policy().unwrap(),
        SizePolicy::InlineOnly {
            max_inline_bytes: 500
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_inline_only_defaults_to_document_field_cap() {
    let file = config_file(
        r#"
[store]
document_capacity = 1000
metadata_headroom = 200

[policy]
mode = "inline_only"
max_payload_bytes = 5000
"#,
    );

    let config = PicsyncConfig::from_file(file.path()).unwrap();
    assert_eq!(
        config.size_policy().unwrap(),
        SizePolicy::InlineOnly {
            max_inline_bytes: 800
        }
    );
}

#[test]
fn test_headroom_must_leave_room_for_data() {
    let file = config_file(
        r#"
[store]
document_capacity = 100
metadata_headroom = 100
"#,
    );

    let config = PicsyncConfig::from_file(file.path()).unwrap();
    assert!(config.limits().is_err());
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_and_malformed_files_are_errors() {
    let err = PicsyncConfig::from_file("/nonexistent/picsync.toml").unwrap_err();
    match config_error_kind(&err) {
        ConfigErrorKind::Load { source_name, .. } => {
            assert_eq!(source_name, "/nonexistent/picsync.toml")
        }
        other => panic!("expected a load failure, got {}", other),
    }

    let file = config_file("[policy]\nmode = \"sometimes\"\n");
    let err = PicsyncConfig::from_file(file.path()).unwrap_err();
    assert!(format!("{}", err).contains("Configuration"));
    assert!(matches!(config_error_kind(&err), ConfigErrorKind::Parse(_)));
}

#[test]
fn test_hosting_requires_credentials() {
    let config = PicsyncConfig::bundled().unwrap();
    assert!(config.hosting.build_host().is_err());

    let file = config_file(
        r#"
[hosting]
provider = "cloudinary"
cloudinary_cloud_name = "demo"
cloudinary_upload_preset = "unsigned"
"#,
    );
    let config = PicsyncConfig::from_file(file.path()).unwrap();
    let host = config.hosting.build_host().unwrap();
    assert_eq!(host.provider(), HostProvider::Cloudinary);
}
