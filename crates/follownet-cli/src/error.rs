//! Error types for the follownet CLI

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed input or missing columns
    #[error("{0}")]
    InvalidInput(String),

    /// Stage invoked out of order
    #[error("{0}")]
    Precursor(String),

    /// Degenerate input for the requested analysis
    #[error("{0}")]
    EmptyInput(String),

    /// Invalid configuration
    #[error("{0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other analysis failure
    #[error("{0}")]
    Analysis(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Analysis(_) | Self::Json(_) => ExitCode::from(1),
            Self::Config(_) => ExitCode::from(2),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidInput(_) => ExitCode::from(4),
            Self::EmptyInput(_) => ExitCode::from(5),
            Self::Precursor(_) => ExitCode::from(6),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<follownet::FollownetError> for CliError {
    fn from(e: follownet::FollownetError) -> Self {
        use follownet::FollownetError as E;
        let message = e.to_string();
        match e {
            E::Validation { .. } | E::Csv(_) | E::DimensionMismatch { .. } => {
                Self::InvalidInput(message)
            }
            E::PrecursorMissing { .. } => Self::Precursor(message),
            E::EmptyInput { .. } => Self::EmptyInput(message),
            E::Config(_) => Self::Config(message),
            E::Io(io) => Self::Io(io),
            E::Numerical { .. } => Self::Analysis(message),
        }
    }
}
