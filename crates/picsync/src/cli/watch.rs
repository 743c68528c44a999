//! Watch command handler.

use super::open_session;
use picsync::{ChangeKind, Notice, NoticeLevel, PicsyncConfig, RecordId, RecordStore, Snapshot};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Shortest allowed polling interval.
const MIN_POLL: Duration = Duration::from_millis(50);

/// Follow the store, printing changes and the image currently on display.
#[instrument(skip(config))]
pub async fn watch_store(
    config: &PicsyncConfig,
    poll_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(config)?;
    let store = session.orchestrator().store().clone();
    let mut view = session.watch();
    let mut changes = store.subscribe();

    let follow = session.follow(session.subscribe());
    tokio::pin!(follow);

    let mut ticker = tokio::time::interval(Duration::from_millis(poll_ms).max(MIN_POLL));
    let mut shown: Option<RecordId> = None;
    let mut last_notice: Option<Notice> = None;

    info!(path = %store.base_path().display(), "Watching record store");
    loop {
        tokio::select! {
            _ = &mut follow => break,
            item = changes.next() => match item {
                Some(Ok(snapshot)) => print_changes(&snapshot),
                Some(Err(e)) => eprintln!("Live updates failed: {}", e),
                None => break,
            },
            _ = ticker.tick() => {
                if let Err(e) = store.reload().await {
                    warn!(error = %e, "Failed to reload record store");
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = view.borrow_and_update().clone();
                let origin = state
                    .displayed()
                    .as_ref()
                    .and_then(|displayed| displayed.origin.as_ref())
                    .map(|origin| origin.record_id.clone());
                if origin != shown {
                    match (&origin, state.displayed()) {
                        (Some(id), Some(displayed)) => {
                            println!("showing {} ({} bytes)", id, displayed.payload.len())
                        }
                        _ => println!("showing nothing"),
                    }
                    shown = origin;
                }
                if *state.notice() != last_notice {
                    if let Some(notice) = state.notice().as_ref().filter(|n| n.level == NoticeLevel::Error) {
                        eprintln!("{}", notice.message);
                    }
                    last_notice = state.notice().clone();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

fn print_changes(snapshot: &Snapshot) {
    for change in &snapshot.changes {
        let marker = match change.kind {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
            ChangeKind::Removed => '-',
        };
        println!("{} {} (version {})", marker, change.id, snapshot.version);
    }
}
