//! Error types for voucher splitting.
//!
//! This module provides a comprehensive error handling strategy with proper
//! error categorization and context preservation. Errors are split into
//! batch-fatal conditions (bad roster, unreadable document, broken archive)
//! and per-record conditions that are collected without aborting the batch.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for splitting operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Comprehensive error type for all splitting operations.
///
/// This enum categorizes errors by their source and provides rich context
/// for debugging and error recovery. [`SplitError::is_fatal`] tells the
/// batch orchestrator whether to abort or to record the failure and move on.
#[derive(Debug)]
pub enum SplitError {
    /// A required input (roster, document bytes) was absent or empty
    MissingInput { what: String },

    /// The roster is malformed (missing columns, unreadable rows)
    Schema { reason: String },

    /// The source document contained zero bytes
    EmptyDocument,

    /// The source document could not be parsed
    CorruptDocument {
        message: String,
        page: Option<usize>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Matching, annotation, or extraction failed for a single record
    RecordProcessing {
        identifier: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Output protection was requested but could not be applied
    Protection { identifier: String, message: String },

    /// Archive assembly failed after processing
    Packaging {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error occurred while reading or writing files
    Io { path: PathBuf, source: io::Error },
}

impl SplitError {
    /// Returns true when this error aborts the whole batch.
    ///
    /// Per-record failures (`RecordProcessing`, `Protection`) are collected
    /// by the orchestrator and excluded from the ledger and archive; every
    /// other variant poisons shared state and stops the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::RecordProcessing { .. } | Self::Protection { .. }
        )
    }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput { what } => {
                write!(f, "Missing required input: {}", what)
            }
            Self::Schema { reason } => {
                write!(f, "Roster schema error: {}", reason)
            }
            Self::EmptyDocument => {
                write!(f, "Source document is empty")
            }
            Self::CorruptDocument { message, page, .. } => {
                if let Some(p) = page {
                    write!(f, "Corrupt document at page {}: {}", p + 1, message)
                } else {
                    write!(f, "Corrupt document: {}", message)
                }
            }
            Self::RecordProcessing {
                identifier,
                message,
                ..
            } => {
                write!(
                    f,
                    "Processing failed for record '{}': {}",
                    identifier, message
                )
            }
            Self::Protection {
                identifier,
                message,
            } => {
                write!(
                    f,
                    "Output protection failed for record '{}': {}",
                    identifier, message
                )
            }
            Self::Packaging { message, .. } => {
                write!(f, "Archive packaging error: {}", message)
            }
            Self::Io { path, source } => {
                write!(f, "IO error for path '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::CorruptDocument { source, .. }
            | Self::RecordProcessing { source, .. }
            | Self::Packaging { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// Conversion implementations for collaborator error types
impl From<csv::Error> for SplitError {
    fn from(err: csv::Error) -> Self {
        Self::Schema {
            reason: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for SplitError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Packaging {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SplitError::MissingInput {
            what: "roster records".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required input: roster records");

        let err = SplitError::CorruptDocument {
            message: "bad xref".to_string(),
            page: Some(2),
            source: None,
        };
        assert_eq!(err.to_string(), "Corrupt document at page 3: bad xref");
    }

    #[test]
    fn test_fatality_classification() {
        assert!(SplitError::EmptyDocument.is_fatal());
        assert!(SplitError::MissingInput {
            what: "x".to_string()
        }
        .is_fatal());
        assert!(SplitError::Packaging {
            message: "x".to_string(),
            source: None
        }
        .is_fatal());

        assert!(!SplitError::RecordProcessing {
            identifier: "123".to_string(),
            message: "x".to_string(),
            source: None
        }
        .is_fatal());
        assert!(!SplitError::Protection {
            identifier: "123".to_string(),
            message: "x".to_string()
        }
        .is_fatal());
    }
}
