//! Sync and upload command handlers.

use super::open_session;
use picsync::{PicsyncConfig, RecordId, RecordStore, Rotation, Session, canonical_payload};
use std::path::Path;
use tracing::{info, instrument};

/// Canonicalize an image file and sync it.
#[instrument(skip(config))]
pub async fn sync_file(
    config: &PicsyncConfig,
    file: &Path,
    rotate: i32,
    active: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rotation = Rotation::from_degrees(rotate)
        .ok_or_else(|| format!("Rotation must be a multiple of 90 degrees, got {}", rotate))?;

    let bytes = tokio::fs::read(file).await?;
    let upright = canonical_payload(&bytes, Rotation::Upright)?;
    info!(size = upright.len(), "Read image");

    let session = open_session(config)?;
    match active {
        Some(id) => {
            session.refresh().await;
            if !session.open_record(&RecordId::from(id)).await {
                return Err(notice_error(&session));
            }
            session.replace_displayed(upright);
        }
        None => session.load_local(upright),
    }
    session.rotate(rotation);

    let report = session.sync().await.ok_or_else(|| notice_error(&session))?;
    println!("{}", report);
    Ok(())
}

/// Upload an image file to the configured host and sync its link.
#[instrument(skip(config))]
pub async fn upload_file(
    config: &PicsyncConfig,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.hosting.build_host()?;
    let bytes = tokio::fs::read(file).await?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");

    let session = open_session(config)?;
    let report = session
        .sync_hosted(host.as_ref(), bytes, filename)
        .await
        .ok_or_else(|| notice_error(&session))?;
    println!("{}", report);
    Ok(())
}

/// Turn the session's last notice into a command failure.
fn notice_error<S: RecordStore>(session: &Session<S>) -> Box<dyn std::error::Error> {
    session
        .state()
        .notice()
        .as_ref()
        .map_or_else(|| "Operation failed".to_string(), |notice| notice.message.clone())
        .into()
}
