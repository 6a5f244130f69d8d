//! Errors raised by the blueprint store and template catalog.

use std::io;
use std::path::{Path, PathBuf};

use creature_spec::{SpecError, ValidationFailure};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by [`BlueprintStore`](crate::store::BlueprintStore) and
/// [`TemplateCatalog`](crate::templates::TemplateCatalog).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file resolves to the requested name.
    #[error("No blueprint found for name: {name}")]
    NotFound { name: String },

    /// The template file for a known label is missing on disk.
    #[error("Template blueprint file '{file}' not found in {}", dir.display())]
    TemplateMissing { file: String, dir: PathBuf },

    /// The label does not name any template.
    #[error("Unknown template type '{label}'. Expected one of: {expected}")]
    UnknownTemplate { label: String, expected: String },

    /// Input bytes are not UTF-8 or not JSON.
    #[error("{what} is not valid {format}: {message}")]
    Malformed {
        what: String,
        format: &'static str,
        message: String,
    },

    /// The document parsed but was rejected by validation.
    #[error("Blueprint '{name}' failed validation: {failure}")]
    Invalid {
        name: String,
        failure: ValidationFailure,
    },

    /// Protected names can be neither deleted nor claimed.
    #[error("Blueprint '{name}' is protected and cannot be {action}")]
    Protected { name: String, action: &'static str },

    /// A new blueprint would overwrite an existing one.
    #[error("A blueprint named '{name}' already exists; choose a different name or delete the existing species first")]
    AlreadyExists { name: String },

    /// Names must contain a non-whitespace character.
    #[error("Blueprint name must be a non-empty string")]
    BlankName,

    /// Names become file names inside the store and may not leave it.
    #[error("Blueprint name '{name}' may not contain path separators or '..'")]
    UnsafeName { name: String },

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A blueprint could not be serialized back to JSON.
    #[error("Failed to serialize blueprint '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: SpecError,
    },
}

impl StoreError {
    /// Validation diagnostics, if this error carries any.
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            StoreError::Invalid { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

pub(crate) fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
