//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the picsync binary.

mod commands;
mod records;
mod sync;
mod watch;

pub use commands::{Cli, Commands, OutputFormat};
pub use records::{delete_record, list_records, show_record};
pub use sync::{sync_file, upload_file};
pub use watch::watch_store;

use picsync::{FileSystemRecordStore, PicsyncConfig, PicsyncResult, Session, SyncOrchestrator};
use std::sync::Arc;

/// Open the configured store and wrap it in a session.
pub(crate) fn open_session(
    config: &PicsyncConfig,
) -> PicsyncResult<Session<FileSystemRecordStore>> {
    let store = FileSystemRecordStore::open(config.store.resolved_path(), config.limits()?)?;
    let orchestrator = SyncOrchestrator::new(Arc::new(store), config.size_policy()?)?;
    Ok(Session::new(orchestrator))
}
