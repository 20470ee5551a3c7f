//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for listsync using clap.

pub mod commands;

use crate::domain::{DestinationError, SourceError, SyncError};
use clap::{Parser, Subcommand};

/// listsync - incremental CRM list to marketing-platform contact sync
#[derive(Parser, Debug)]
#[command(name = "listsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "listsync.toml", env = "LISTSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LISTSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync every list on a schedule, or once with --once
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show lists and their stored watermarks
    Status(commands::status::StatusArgs),
}

/// Process exit code for an error that stopped a command
///
/// - 2: configuration or rejected credentials
/// - 4: an external system could not be reached
/// - 5: anything else
pub fn exit_code_for(error: &SyncError) -> i32 {
    match error.root() {
        SyncError::Configuration(_) | SyncError::Validation(_) => 2,
        SyncError::Source(SourceError::ClientError { status: 401 | 403, .. }) => 2,
        SyncError::Destination(DestinationError::Rejected { status: 401 | 403, .. }) => 2,
        SyncError::Source(SourceError::ConnectionFailed(_) | SourceError::Timeout(_))
        | SyncError::Destination(
            DestinationError::ConnectionFailed(_) | DestinationError::Timeout(_),
        )
        | SyncError::State(_) => 4,
        _ => 5,
    }
}
