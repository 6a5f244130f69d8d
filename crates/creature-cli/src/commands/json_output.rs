//! JSON output types for machine-readable CLI output.
//!
//! Every command that accepts `--json` prints exactly one [`CommandOutput`]
//! document on stdout, so scripts can branch on `success` and read stable
//! error codes.

use std::collections::BTreeMap;

use creature_export::ExportError;
use creature_spec::{ValidationError, ValidationFailure, ValidationWarning};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Error codes for CLI operations.
///
/// These codes are stable. Validation and export failures pass their own
/// codes through (`F002`, `G003`, `EXPORT_002`, ...).
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Input is not valid JSON or UTF-8
    pub const JSON_PARSE: &str = "CLI_002";
    /// No blueprint resolves to the requested name
    pub const NOT_FOUND: &str = "CLI_003";
    /// Protected blueprint name
    pub const PROTECTED: &str = "CLI_004";
    /// Blueprint name already taken
    pub const ALREADY_EXISTS: &str = "CLI_005";
    /// Blank blueprint name
    pub const BLANK_NAME: &str = "CLI_006";
    /// Unknown template label or missing template file
    pub const TEMPLATE: &str = "CLI_007";
    /// Filesystem or serialization failure in the store
    pub const STORE_IO: &str = "CLI_008";
    /// Blueprint name would resolve outside the store
    pub const UNSAFE_NAME: &str = "CLI_009";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "G002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the JSON path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Envelope shared by every `--json` command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors (empty on success)
    pub errors: Vec<JsonError>,
    /// Warnings (may be present even on success)
    pub warnings: Vec<JsonWarning>,
    /// Command-specific result (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }

    /// Prints the output as pretty JSON on stdout.
    pub fn print(&self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Result payload of `validate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResult {
    /// `meta.name` of the blueprint
    pub name: String,
    /// Whether the V2 anatomy pipeline applies
    pub v2_anatomy: bool,
    /// Canonical BLAKE3 hash of the blueprint content
    pub blueprint_hash: String,
}

/// Result payload of `export --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub species_key: String,
    pub version: String,
    pub archive_path: String,
    pub staging_dir: String,
    /// Bundle-relative file name to SHA-256 checksum
    pub checksums: BTreeMap<String, String>,
}

pub fn validation_error_to_json(error: &ValidationError) -> JsonError {
    let json = JsonError::new(error.code.code(), &error.message);
    match &error.path {
        Some(path) => json.with_path(path),
        None => json,
    }
}

pub fn validation_warning_to_json(warning: &ValidationWarning) -> JsonWarning {
    JsonWarning {
        code: warning.code.code().to_string(),
        message: warning.message.clone(),
        path: warning.path.clone(),
    }
}

pub fn validation_failure_to_json(failure: &ValidationFailure) -> Vec<JsonError> {
    failure.iter().map(validation_error_to_json).collect()
}

pub fn export_error_to_json(error: &ExportError) -> JsonError {
    JsonError::new(error.code(), error.to_string())
}

/// Converts a store error. Validation failures expand to one entry per error.
pub fn store_error_to_json(error: &StoreError) -> Vec<JsonError> {
    let code = match error {
        StoreError::Invalid { failure, .. } => return validation_failure_to_json(failure),
        StoreError::NotFound { .. } => error_codes::NOT_FOUND,
        StoreError::TemplateMissing { .. } | StoreError::UnknownTemplate { .. } => {
            error_codes::TEMPLATE
        }
        StoreError::Malformed { .. } => error_codes::JSON_PARSE,
        StoreError::Protected { .. } => error_codes::PROTECTED,
        StoreError::AlreadyExists { .. } => error_codes::ALREADY_EXISTS,
        StoreError::BlankName => error_codes::BLANK_NAME,
        StoreError::UnsafeName { .. } => error_codes::UNSAFE_NAME,
        StoreError::Io { .. } | StoreError::Serialize { .. } => error_codes::STORE_IO,
    };
    vec![JsonError::new(code, error.to_string())]
}
