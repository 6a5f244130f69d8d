//! Field-level range checks over parsed blueprint entities.
//!
//! Shape errors are caught while each entity deserializes; these checks cover
//! numeric ranges that the type system cannot express. Every check appends to
//! a shared list so all violations are reported together.

use serde_json::{Map, Value};

use crate::blueprint::{SizeProfile, Sizes};
use crate::body_parts::{BodyPart, LegacyBodyParts};
use crate::chains::{Chain, ChainExtension};
use crate::error::{ErrorCode, ValidationError};
use crate::material::MaterialDefinition;
use crate::options::BodyPartOptions;

/// Option keys whose values must be non-negative numbers.
const RADIUS_KEYS: &[&str] = &[
    "radius",
    "radiusTop",
    "radiusBottom",
    "baseRadius",
    "midRadius",
    "tipRadius",
    "flatten",
    "rumpBulgeDepth",
    "extraMargin",
    "lengthScale",
    "elongation",
    "lowPolyWeldTolerance",
];

/// Option keys whose values are segment counts.
const SEGMENT_KEYS: &[&str] = &["sides", "lowPolySegments"];

/// Smallest segment count a generator accepts.
pub const MIN_SIDES: i64 = 3;

pub(crate) fn check_chain(chain: &Chain, path: &str, errors: &mut Vec<ValidationError>) {
    if let Some(radii) = &chain.radii {
        for (j, radius) in radii.iter().enumerate() {
            non_negative(*radius, &format!("{path}.radii[{j}]"), errors);
        }
    }
    if let Some(ChainExtension::Detailed(ext)) = &chain.extend_to {
        non_negative(ext.extra_margin, &format!("{path}.extendTo.extraMargin"), errors);
        for (bone, radius) in &ext.bone_radii {
            non_negative(*radius, &format!("{path}.extendTo.boneRadii.{bone}"), errors);
        }
    }
}

pub(crate) fn check_body_part(part: &BodyPart, path: &str, errors: &mut Vec<ValidationError>) {
    check_options(&part.options, &format!("{path}.options"), errors);
}

pub(crate) fn check_legacy_parts(legacy: &LegacyBodyParts, errors: &mut Vec<ValidationError>) {
    for (name, part) in legacy.iter() {
        let path = if legacy.extra_parts.contains_key(name) {
            format!("bodyParts.extraParts.{name}.options")
        } else {
            format!("bodyParts.{name}.options")
        };
        check_options(&part.options, &path, errors);
    }
}

pub(crate) fn check_sizes(sizes: &Sizes, errors: &mut Vec<ValidationError>) {
    if let Some(radius) = sizes.default_radius {
        non_negative(radius, "sizes.defaultRadius", errors);
    }
    for (bone, profile) in &sizes.by_bone {
        check_size_profile(profile, &format!("sizes.byBone.{bone}"), errors);
    }
    for (chain, profile) in &sizes.by_chain {
        check_size_profile(profile, &format!("sizes.byChain.{chain}"), errors);
    }
}

fn non_negative(value: f64, path: &str, errors: &mut Vec<ValidationError>) {
    if value < 0.0 {
        errors.push(ValidationError::with_path(
            ErrorCode::OutOfRange,
            format!("value must be >= 0, got {value}"),
            path,
        ));
    }
}

fn check_size_profile(profile: &SizeProfile, path: &str, errors: &mut Vec<ValidationError>) {
    for (field, value) in profile.values() {
        non_negative(value, &format!("{path}.{field}"), errors);
    }
}

pub(crate) fn check_material(material: &MaterialDefinition, path: &str, errors: &mut Vec<ValidationError>) {
    for (field, value) in material.unit_factors() {
        if let Some(value) = value {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ValidationError::with_path(
                    ErrorCode::OutOfRange,
                    format!("{field} must be within [0, 1], got {value}"),
                    format!("{path}.{field}"),
                ));
            }
        }
    }
}

/// Checks option values, typed or raw, through their JSON form.
fn check_options(options: &BodyPartOptions, path: &str, errors: &mut Vec<ValidationError>) {
    check_option_map(&options.to_map(), path, errors);
}

fn check_option_map(map: &Map<String, Value>, path: &str, errors: &mut Vec<ValidationError>) {
    for (key, value) in map {
        let key_path = format!("{path}.{key}");
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            k if RADIUS_KEYS.contains(&k) => check_radius_value(value, &key_path, errors),
            k if SEGMENT_KEYS.contains(&k) => check_segment_value(value, &key_path, errors),
            "radii" => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        check_radius_value(item, &format!("{key_path}[{i}]"), errors);
                    }
                }
                None => errors.push(type_error(&key_path, "a list of numbers")),
            },
            "boneRadii" => match value.as_object() {
                Some(radii) => {
                    for (bone, radius) in radii {
                        check_radius_value(radius, &format!("{key_path}.{bone}"), errors);
                    }
                }
                None => errors.push(type_error(&key_path, "a map of bone names to numbers")),
            },
            "additionalChains" => {
                let all_strings = value
                    .as_array()
                    .map(|items| items.iter().all(Value::is_string))
                    .unwrap_or(false);
                if !all_strings {
                    errors.push(type_error(&key_path, "a list of chain names"));
                }
            }
            _ => {
                if let Some(nested) = value.as_object() {
                    check_option_map(nested, &key_path, errors);
                }
            }
        }
    }
}

fn check_radius_value(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    match value.as_f64() {
        Some(number) => non_negative(number, path, errors),
        None => errors.push(type_error(path, "a number")),
    }
}

fn check_segment_value(value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let count = value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64));
    match count {
        Some(count) if count < MIN_SIDES => errors.push(ValidationError::with_path(
            ErrorCode::TooFewSides,
            format!("segment count must be >= {MIN_SIDES}, got {count}"),
            path,
        )),
        Some(_) => {}
        None => errors.push(type_error(path, "an integer")),
    }
}

fn type_error(path: &str, expected: &str) -> ValidationError {
    ValidationError::with_path(
        ErrorCode::InvalidOptionType,
        format!("expected {expected}"),
        path,
    )
}
