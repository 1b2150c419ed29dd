//! Error types for the bulk session.

use std::path::PathBuf;

use sfbulk_core::ClientError;

/// Errors produced by [`Session`](crate::Session) and the table loader.
#[derive(Debug, thiserror::Error)]
pub enum SfBulkError {
    /// Bad command argument, unknown action, malformed query string or an
    /// unreadable input file.
    #[error("{0}")]
    Parameter(String),

    /// A data line of the input CSV has a different column count than the header.
    #[error("{path}: line {line} has {found} fields, header has {expected}")]
    FieldLenMismatch {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A column does not name a field of the target object type.
    #[error("{0}")]
    Validation(String),

    /// Network, authentication or remote-side failure.
    #[error(transparent)]
    Remote(#[from] ClientError),

    /// Continuation requested while no query cursor is held.
    #[error("{0}")]
    State(String),

    /// Failure writing an artifact file.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV input or failure encoding an artifact row.
    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl SfBulkError {
    /// Class name reported to the operator in one-line error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parameter(_) => "ParameterError",
            Self::FieldLenMismatch { .. } => "FieldLenMismatch",
            Self::Validation(_) => "ValidationError",
            Self::Remote(_) => "RemoteError",
            Self::State(_) => "StateError",
            Self::Io { .. } => "IOError",
            Self::Csv { .. } => "CsvError",
        }
    }
}
