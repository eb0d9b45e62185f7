//! Error types for follownet operations.
//!
//! Fatal conditions surface as [`FollownetError`]. Recoverable numeric
//! conditions are reported as [`NumericWarning`] values attached to the
//! result that produced them.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for follownet operations.
pub type Result<T> = std::result::Result<T, FollownetError>;

/// Main error type for follownet operations.
///
/// # Examples
///
/// ```
/// use follownet::error::FollownetError;
///
/// let err = FollownetError::PrecursorMissing {
///     operation: "project_weighted",
///     requires: "build_graph",
/// };
/// assert!(err.to_string().contains("build_graph"));
/// ```
#[derive(Error, Debug)]
pub enum FollownetError {
    /// Malformed input, or required columns absent.
    #[error("Validation failed: {message}")]
    Validation {
        /// Validation failure message
        message: String,
    },

    /// An operation ran before the artifact it consumes was produced.
    #[error("{operation} requires {requires} to run first")]
    PrecursorMissing {
        /// Operation that was invoked
        operation: &'static str,
        /// Stage that must have produced its artifact
        requires: &'static str,
    },

    /// Degenerate input: empty graph or contingency table below 2x2.
    #[error("Empty input: {message}")]
    EmptyInput {
        /// What was empty
        message: String,
    },

    /// Matrix dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A decomposition could not be computed.
    #[error("Numerical failure: {message}")]
    Numerical {
        /// Failure description
        message: String,
    },

    /// Invalid configuration value or unparsable configuration file.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text read or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FollownetError {
    /// Shorthand for a [`FollownetError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`FollownetError::EmptyInput`].
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    /// Shorthand for a [`FollownetError::Numerical`].
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }
}

/// Axis of a contingency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Actor rows
    Rows,
    /// Entity columns
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Columns => write!(f, "columns"),
        }
    }
}

/// Non-fatal numeric condition recovered locally.
///
/// The affected rows, columns or dimensions are excluded and the partial
/// result stays usable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericWarning {
    /// Rows or columns with a zero margin were excluded before profiling.
    ZeroMarginDropped {
        /// Which axis lost entries
        axis: Axis,
        /// Labels of the dropped entries
        labels: Vec<String>,
    },
    /// Fewer dimensions than requested carry non-zero inertia.
    RankDeficient {
        /// Dimensions requested (after the min(rows, cols) - 1 cap)
        requested: usize,
        /// Dimensions retained
        retained: usize,
    },
}

impl NumericWarning {
    /// Number of rows, columns or dimensions affected.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            NumericWarning::ZeroMarginDropped { labels, .. } => labels.len(),
            NumericWarning::RankDeficient {
                requested,
                retained,
            } => requested.saturating_sub(*retained),
        }
    }
}

impl fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericWarning::ZeroMarginDropped { axis, labels } => {
                write!(f, "dropped {} {axis} with zero margin", labels.len())
            }
            NumericWarning::RankDeficient {
                requested,
                retained,
            } => {
                write!(
                    f,
                    "rank deficient: retained {retained} of {requested} requested dimensions"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = FollownetError::validation("missing column 'follower_id'");
        assert_eq!(
            err.to_string(),
            "Validation failed: missing column 'follower_id'"
        );
    }

    #[test]
    fn test_precursor_display() {
        let err = FollownetError::PrecursorMissing {
            operation: "communities",
            requires: "project",
        };
        assert_eq!(err.to_string(), "communities requires project to run first");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FollownetError = io.into();
        assert!(matches!(err, FollownetError::Io(_)));
        assert!(err.to_string().contains("gone"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_warning_counts() {
        let w = NumericWarning::ZeroMarginDropped {
            axis: Axis::Columns,
            labels: vec!["E3".into()],
        };
        assert_eq!(w.count(), 1);
        assert_eq!(w.to_string(), "dropped 1 columns with zero margin");

        let w = NumericWarning::RankDeficient {
            requested: 4,
            retained: 2,
        };
        assert_eq!(w.count(), 2);
    }
}
