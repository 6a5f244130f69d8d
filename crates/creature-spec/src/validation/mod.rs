//! Blueprint validation.
//!
//! Validation runs in two stages. The schema stage parses the document entity
//! by entity into a typed [`Blueprint`], collecting every shape and range
//! violation with its path. Only if that succeeds does the graph stage check
//! the references between skeleton bones, chains and body parts.

mod fields;
mod graph;
mod schema;

#[cfg(test)]
mod tests;

use serde_json::Value;

use crate::blueprint::Blueprint;
use crate::error::{ErrorCode, ValidationError, ValidationFailure, ValidationWarning};

pub use fields::MIN_SIDES;

/// A blueprint that passed both validation stages.
///
/// Only [`validate`] and its wrappers construct this type, so holding one is
/// proof the document was checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBlueprint {
    blueprint: Blueprint,
    source: Value,
    warnings: Vec<ValidationWarning>,
}

impl ValidatedBlueprint {
    /// The typed blueprint.
    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// The document the blueprint was parsed from, unchanged.
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Non-fatal findings from the graph stage.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.blueprint.name()
    }

    /// Consumes the wrapper and returns the typed blueprint.
    pub fn into_blueprint(self) -> Blueprint {
        self.blueprint
    }
}

/// Validates a raw blueprint document.
///
/// # Example
/// ```
/// use creature_spec::validate;
/// use serde_json::json;
///
/// let document = json!({
///     "meta": {"name": "Sketch"},
///     "bodyPlan": {"type": "biped"},
///     "skeleton": {"bones": [{"name": "root", "parent": "", "position": [0, 0, 0]}]},
///     "bodyPartsV2": [{"name": "head", "generator": "headGenerator", "chain": "neck"}]
/// });
///
/// let failure = validate(&document).unwrap_err();
/// assert!(failure.field_errors.is_empty());
/// assert_eq!(failure.graph_errors[0].code.code(), "G001");
/// ```
pub fn validate(document: &Value) -> Result<ValidatedBlueprint, ValidationFailure> {
    let blueprint = schema::parse(document).map_err(ValidationFailure::fields)?;

    let report = graph::check_graph(&blueprint);
    if !report.errors.is_empty() {
        return Err(ValidationFailure::graph(report.errors));
    }

    Ok(ValidatedBlueprint {
        blueprint,
        source: document.clone(),
        warnings: report.warnings,
    })
}

/// Validates a blueprint given as JSON text.
pub fn validate_str(json: &str) -> Result<ValidatedBlueprint, ValidationFailure> {
    let document: Value = serde_json::from_str(json).map_err(|e| {
        ValidationFailure::fields(vec![ValidationError::new(
            ErrorCode::MalformedDocument,
            format!("invalid JSON: {e}"),
        )])
    })?;
    validate(&document)
}

/// Validates an already-typed blueprint, e.g. after an edit.
///
/// The blueprint's own serialization becomes the source document.
pub fn validate_blueprint(blueprint: &Blueprint) -> Result<ValidatedBlueprint, ValidationFailure> {
    let document = serde_json::to_value(blueprint).map_err(|e| {
        ValidationFailure::fields(vec![ValidationError::new(
            ErrorCode::MalformedDocument,
            e.to_string(),
        )])
    })?;
    validate(&document)
}
