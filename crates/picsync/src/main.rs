//! picsync CLI binary.
//!
//! This binary provides command-line access to a picsync store:
//! - Sync local images, optionally rotated, or upload them to an image host
//! - List, show and delete stored records
//! - Follow the store and report every change

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // Load .env before reading configuration
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    picsync::init_tracing(cli.verbose, cli.log_format.into())?;

    let config = match &cli.config {
        Some(path) => picsync::PicsyncConfig::from_file(path)?,
        None => picsync::PicsyncConfig::load()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Sync {
            file,
            rotate,
            active,
        } => cli::sync_file(&config, &file, rotate, active).await?,
        Commands::Upload { file } => cli::upload_file(&config, &file).await?,
        Commands::List { format } => cli::list_records(&config, format).await?,
        Commands::Show { id, output } => cli::show_record(&config, &id, output.as_deref()).await?,
        Commands::Delete { id } => cli::delete_record(&config, &id).await?,
        Commands::Watch { poll_ms } => cli::watch_store(&config, poll_ms).await?,
    }

    Ok(())
}
