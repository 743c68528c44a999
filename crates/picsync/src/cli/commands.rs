//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use picsync::LogFormat;
use std::path::PathBuf;

/// picsync - sync images through a size-capped document store
#[derive(Parser, Debug)]
#[command(name = "picsync")]
#[command(about = "Sync images through a size-capped document store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file only
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormatArg,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed an image in the store
    Sync {
        /// Image file to sync
        file: PathBuf,

        /// Clockwise rotation in degrees, a multiple of 90
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotate: i32,

        /// Replace the image stored under this record
        #[arg(long)]
        active: Option<String>,
    },

    /// Upload an image to the configured host and sync its link
    Upload {
        /// Image file to upload
        file: PathBuf,
    },

    /// List stored records, newest first
    List {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show one record
    Show {
        /// Record ID
        id: String,

        /// Write the image to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a record and its chunks
    Delete {
        /// Record ID
        id: String,
    },

    /// Follow the store and print every change
    Watch {
        /// How often to check for commits from other processes, in milliseconds
        #[arg(long, default_value = "1000")]
        poll_ms: u64,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Log format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogFormatArg {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
