//! Error types for bundle export.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a bundle.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Version string is empty after trimming.
    #[error("Export version must not be empty")]
    EmptyVersion,

    /// Version string would escape the export root or nest directories.
    #[error("Export version '{version}' must be a single path segment")]
    InvalidVersion { version: String },

    /// Display name has no character usable in a file name.
    #[error("Display name '{name}' contains no letters, digits or underscores")]
    EmptySpeciesKey { name: String },

    /// Reading or writing the export root failed.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Installing a bundle failed and the previous bundle could not be put
    /// back. It is left at `preserved` instead of being deleted.
    #[error(
        "IO error at {path}: {source}; restoring the previous bundle also failed ({rollback}), it was kept at {preserved}"
    )]
    RollbackFailed {
        path: PathBuf,
        preserved: PathBuf,
        #[source]
        source: io::Error,
        rollback: io::Error,
    },

    /// A payload could not be serialized.
    #[error("Failed to serialize {payload}: {source}")]
    Serialize {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExportError {
    /// Returns a stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::EmptyVersion => "EXPORT_001",
            ExportError::InvalidVersion { .. } => "EXPORT_002",
            ExportError::EmptySpeciesKey { .. } => "EXPORT_003",
            ExportError::Io { .. } => "EXPORT_004",
            ExportError::Serialize { .. } => "EXPORT_005",
            ExportError::RollbackFailed { .. } => "EXPORT_006",
        }
    }

    /// Returns true for failures raised before any filesystem access.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExportError::EmptyVersion
                | ExportError::InvalidVersion { .. }
                | ExportError::EmptySpeciesKey { .. }
        )
    }
}

/// Wraps an I/O error with the path it happened at.
pub(crate) fn io_at(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
