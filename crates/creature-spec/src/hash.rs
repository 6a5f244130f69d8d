//! Canonical content hashing for blueprints.
//!
//! The hash identifies a blueprint's content independent of key order and
//! number spelling:
//!
//! ```text
//! blueprint_hash = hex(BLAKE3(canonical_json(blueprint)))
//! ```
//!
//! Canonical JSON sorts object keys, drops whitespace, and writes integral
//! numbers without a fractional part (`1.0` and `1` hash alike).

use std::fmt::Write;

use serde_json::Value;

use crate::blueprint::Blueprint;
use crate::error::SpecError;

/// Computes the canonical BLAKE3 hash of a blueprint.
///
/// # Example
/// ```
/// use creature_spec::{Blueprint, canonical_blueprint_hash};
///
/// let blueprint = Blueprint::new("Sketch", "quadruped");
/// let hash = canonical_blueprint_hash(&blueprint).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_blueprint_hash(blueprint: &Blueprint) -> Result<String, SpecError> {
    let value = blueprint.to_value()?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of any JSON value.
pub fn canonical_value_hash(value: &Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Renders a JSON value in canonical form.
pub fn canonicalize_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn write_number(n: &serde_json::Number, out: &mut String) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "{u}");
    } else if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.abs() < 1e15 {
            let _ = write!(out, "{}", f as i64);
        } else {
            let _ = write!(out, "{f}");
        }
    } else {
        out.push_str("null");
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
