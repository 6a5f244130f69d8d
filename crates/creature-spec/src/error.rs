//! Error types for blueprint parsing and validation.

use thiserror::Error;

/// Stable codes for blueprint validation errors.
///
/// `F0xx` codes are field-level (shape and range) failures; `G0xx` codes are
/// graph-level failures spanning several entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Field errors (F001-F009)
    /// F001: Document does not match the blueprint shape
    MalformedDocument,
    /// F002: Numeric value outside its declared range
    OutOfRange,
    /// F003: Segment count below the minimum of 3
    TooFewSides,
    /// F004: Option value has the wrong type
    InvalidOptionType,

    // Graph errors (G001-G009)
    /// G001: V2 body parts declared without any V2 chain
    MissingChains,
    /// G002: Chain references bones absent from the skeleton
    ChainMissingBones,
    /// G003: Body part targets a chain that does not exist
    UnknownChain,
    /// G004: Body part options reference unknown additional chains
    UnknownAdditionalChains,
    /// G005: Two entities of one kind share a name
    DuplicateName,
    /// G006: Bone parent links form a cycle
    ParentCycle,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "G002").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedDocument => "F001",
            ErrorCode::OutOfRange => "F002",
            ErrorCode::TooFewSides => "F003",
            ErrorCode::InvalidOptionType => "F004",
            ErrorCode::MissingChains => "G001",
            ErrorCode::ChainMissingBones => "G002",
            ErrorCode::UnknownChain => "G003",
            ErrorCode::UnknownAdditionalChains => "G004",
            ErrorCode::DuplicateName => "G005",
            ErrorCode::ParentCycle => "G006",
        }
    }

    /// Returns true for graph-level codes.
    pub fn is_graph(&self) -> bool {
        self.code().starts_with('G')
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Stable codes for validation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Bone parent names a bone that is not in the skeleton
    UnknownParent,
    /// W002: `skeleton.root` names a bone that is not in the skeleton
    UnknownRoot,
    /// W003: Chain extension names a bone that is not in the skeleton
    UnknownExtensionBone,
    /// W004: Legacy chain slot names a bone that is not in the skeleton
    LegacyChainMissingBone,
    /// W005: Legacy body part targets an empty or unknown legacy chain
    LegacyUnknownChain,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::UnknownParent => "W001",
            WarningCode::UnknownRoot => "W002",
            WarningCode::UnknownExtensionBone => "W003",
            WarningCode::LegacyChainMissingBone => "W004",
            WarningCode::LegacyUnknownChain => "W005",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "chainsV2\[0\].bones").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Rejection of a blueprint document.
///
/// Field errors and graph errors are kept apart so callers can map them to
/// distinct transport-level outcomes (malformed input vs. unprocessable).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Shape and range violations.
    pub field_errors: Vec<ValidationError>,
    /// Dangling or inconsistent cross-entity references.
    pub graph_errors: Vec<ValidationError>,
}

impl ValidationFailure {
    /// Creates a failure holding only field errors.
    pub fn fields(field_errors: Vec<ValidationError>) -> Self {
        Self {
            field_errors,
            graph_errors: Vec::new(),
        }
    }

    /// Creates a failure holding only graph errors.
    pub fn graph(graph_errors: Vec<ValidationError>) -> Self {
        Self {
            field_errors: Vec::new(),
            graph_errors,
        }
    }

    /// Returns true if any field-level error is present.
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Total number of errors across both categories.
    pub fn len(&self) -> usize {
        self.field_errors.len() + self.graph_errors.len()
    }

    /// Returns true if no error was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over field errors followed by graph errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.field_errors.iter().chain(self.graph_errors.iter())
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "blueprint validation failed with {} field error(s) and {} graph error(s)",
            self.field_errors.len(),
            self.graph_errors.len()
        )?;
        for error in self.iter() {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Top-level error type for blueprint operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Blueprint validation failed.
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
