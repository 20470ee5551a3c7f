//! Domain error types
//!
//! This module defines the error hierarchy for listsync.
//! All errors are domain-specific and don't expose third-party types.

use std::fmt;
use thiserror::Error;

/// Main listsync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source CRM API errors
    #[error("Source API error: {0}")]
    Source(#[from] SourceError),

    /// Destination API errors
    #[error("Destination API error: {0}")]
    Destination(#[from] DestinationError),

    /// Watermark store errors
    #[error("State management error: {0}")]
    State(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// An error annotated with the sync stage it happened in
    #[error("{stage}: {source}")]
    Stage {
        /// Stage of the sync cycle that failed
        stage: SyncStage,
        /// Underlying error
        #[source]
        source: Box<SyncError>,
    },

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// Wrap this error with the stage it occurred in
    pub fn at(self, stage: SyncStage) -> Self {
        SyncError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Stage of the outermost stage annotation, if any
    pub fn stage(&self) -> Option<&SyncStage> {
        match self {
            SyncError::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// The error with all stage annotations stripped
    pub fn root(&self) -> &SyncError {
        match self {
            SyncError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Stage of a collection sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Reading the last completed watermark
    ReadWatermark,
    /// Fetching the page with the given index
    FetchPage(usize),
    /// Pushing the page with the given index to the destination
    PushPage(usize),
    /// Waiting for page results from the workers
    DrainResults,
    /// Writing the new watermark
    CommitWatermark,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::ReadWatermark => write!(f, "unable to read the last run watermark"),
            SyncStage::FetchPage(page) => write!(f, "unable to fetch page {page}"),
            SyncStage::PushPage(page) => write!(f, "unable to push page {page}"),
            SyncStage::DrainResults => write!(f, "unable to collect page results"),
            SyncStage::CommitWatermark => write!(f, "unable to save the run watermark"),
        }
    }
}

/// Extension for annotating results with a [`SyncStage`]
pub trait StageContext<T> {
    /// Annotate the error, if any, with `stage`
    fn at_stage(self, stage: SyncStage) -> Result<T, SyncError>;
}

impl<T, E> StageContext<T> for Result<T, E>
where
    E: Into<SyncError>,
{
    fn at_stage(self, stage: SyncStage) -> Result<T, SyncError> {
        self.map_err(|e| e.into().at(stage))
    }
}

/// Source CRM API errors
///
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to reach the source API
    #[error("Failed to connect to source API: {0}")]
    ConnectionFailed(String),

    /// Response body could not be decoded
    #[error("Invalid response from source API: {0}")]
    InvalidResponse(String),

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Destination API errors
#[derive(Debug, Error)]
pub enum DestinationError {
    /// Failed to reach the destination API
    #[error("Failed to connect to destination API: {0}")]
    ConnectionFailed(String),

    /// The batch was not accepted
    #[error("Batch rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
