//! Record listing and management command handlers.

use super::{OutputFormat, open_session};
use picsync::{DataUrl, Fingerprint, ImageRecord, PicsyncConfig, RecordId, RecordStore};
use serde::Serialize;
use std::path::Path;
use tracing::instrument;

/// Record metadata without the payload.
#[derive(Debug, Serialize)]
struct RecordSummary {
    id: String,
    fingerprint: Fingerprint,
    order: String,
    created_at: String,
    layout: &'static str,
    chunk_count: u32,
}

impl From<&ImageRecord> for RecordSummary {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: record.id().to_string(),
            fingerprint: record.fingerprint().clone(),
            order: format_millis(*record.order()),
            created_at: format_millis(*record.created_at()),
            layout: if record.is_chunked() { "chunked" } else { "inline" },
            chunk_count: record.chunk_count().unwrap_or(0),
        }
    }
}

fn format_millis(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map_or_else(|| millis.to_string(), |time| time.to_rfc3339())
}

/// List stored records, newest first.
#[instrument(skip(config))]
pub async fn list_records(
    config: &PicsyncConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(config)?;
    let records = session.orchestrator().store().list().await?;
    let summaries: Vec<RecordSummary> = records.iter().map(RecordSummary::from).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("No images stored.");
                return Ok(());
            }
            println!("{:<34} {:<14} {:<9} {:>6}  Updated", "ID", "Fingerprint", "Layout", "Chunks");
            println!("{}", "-".repeat(100));
            for summary in &summaries {
                println!(
                    "{:<34} {:<14} {:<9} {:>6}  {}",
                    summary.id,
                    summary.fingerprint.short(12),
                    summary.layout,
                    summary.chunk_count,
                    summary.order
                );
            }
            println!();
            println!("Total: {} images", summaries.len());
        }
    }
    Ok(())
}

/// Show one record, optionally writing its image to a file.
#[instrument(skip(config))]
pub async fn show_record(
    config: &PicsyncConfig,
    id: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(config)?;
    let orchestrator = session.orchestrator();
    let id = RecordId::from(id);
    let record = orchestrator
        .store()
        .get(&id)
        .await?
        .ok_or_else(|| format!("Record not found: {}", id))?;
    let payload = orchestrator.materialize(&record).await?;
    let summary = RecordSummary::from(&record);

    println!("ID:          {}", summary.id);
    println!("Fingerprint: {}", summary.fingerprint);
    println!("Updated:     {}", summary.order);
    println!("Created:     {}", summary.created_at);
    println!("Layout:      {} ({} chunks)", summary.layout, summary.chunk_count);

    match DataUrl::parse(&payload) {
        Ok(url) => {
            println!("Payload:     {} image, {} bytes", url.mime(), url.data().len());
            if let Some(path) = output {
                tokio::fs::write(path, url.into_data()).await?;
                println!("Wrote image to {}", path.display());
            }
        }
        Err(_) => {
            println!("Payload:     {}", payload);
            if let Some(path) = output {
                tokio::fs::write(path, payload.as_bytes()).await?;
                println!("Wrote link to {}", path.display());
            }
        }
    }
    Ok(())
}

/// Delete a record and every chunk it owns.
#[instrument(skip(config))]
pub async fn delete_record(
    config: &PicsyncConfig,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(config)?;
    let id = RecordId::from(id);
    session.orchestrator().delete(&id).await?;
    println!("Deleted {}", id);
    Ok(())
}
