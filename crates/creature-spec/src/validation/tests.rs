//! Validation tests.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::*;
use crate::error::{ErrorCode, WarningCode};

fn skeleton(bones: &[(&str, &str)]) -> Value {
    let bones: Vec<Value> = bones
        .iter()
        .map(|(name, parent)| json!({"name": name, "parent": parent, "position": [0.0, 1.0, 0.0]}))
        .collect();
    json!({"root": "root", "bones": bones})
}

fn document(chains: Value, parts: Value) -> Value {
    json!({
        "meta": {"name": "Testodon"},
        "bodyPlan": {"type": "quadruped"},
        "skeleton": skeleton(&[("root", ""), ("spine1", "root"), ("head", "spine1")]),
        "chainsV2": chains,
        "bodyPartsV2": parts,
    })
}

fn graph_codes(failure: &ValidationFailure) -> Vec<ErrorCode> {
    failure.graph_errors.iter().map(|e| e.code).collect()
}

#[test]
fn test_valid_v2_document() {
    let doc = document(
        json!([{"name": "spine", "bones": ["root", "spine1", "head"]}]),
        json!([{"name": "body", "generator": "torsoGenerator", "chain": "spine", "options": {"sides": 24}}]),
    );
    let validated = validate(&doc).unwrap();
    assert_eq!(validated.name(), "Testodon");
    assert!(validated.warnings().is_empty());
    assert_eq!(validated.source(), &doc);
}

#[test]
fn test_chain_missing_bone_names_chain_and_bone() {
    let doc = document(
        json!([{"name": "spine", "bones": ["spine1", "headX"]}]),
        json!([{"name": "head", "generator": "headGenerator", "chain": "spine"}]),
    );
    let failure = validate(&doc).unwrap_err();
    assert!(failure.field_errors.is_empty());
    assert_eq!(graph_codes(&failure), vec![ErrorCode::ChainMissingBones]);
    let message = &failure.graph_errors[0].message;
    assert!(message.contains("'spine'"), "{message}");
    assert!(message.contains("headX"), "{message}");
}

#[test]
fn test_all_missing_bones_in_one_error() {
    let doc = document(
        json!([{"name": "tail", "bones": ["t1", "spine1", "t2", "t1"]}]),
        json!([]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(failure.graph_errors.len(), 1);
    assert_eq!(
        failure.graph_errors[0].message,
        "Chain 'tail' references missing bones: t1, t2"
    );
    assert_eq!(failure.graph_errors[0].path.as_deref(), Some("chainsV2[0].bones"));
}

#[test]
fn test_body_parts_without_chains() {
    let doc = document(
        json!([]),
        json!([{"name": "head", "generator": "headGenerator", "chain": "neck"}]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(
        graph_codes(&failure),
        vec![ErrorCode::MissingChains, ErrorCode::UnknownChain]
    );
    assert!(failure.graph_errors[1].message.ends_with("Known chains: none"));
}

#[test]
fn test_unknown_chain_lists_known_chains_sorted() {
    let doc = document(
        json!([
            {"name": "spine", "bones": ["root", "spine1"]},
            {"name": "neck", "bones": ["spine1", "head"]}
        ]),
        json!([{"name": "tail", "generator": "tailGenerator", "chain": "tail"}]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(
        failure.graph_errors[0].message,
        "Body part 'tail' targets unknown chain 'tail'. Known chains: neck, spine"
    );
}

#[test]
fn test_unknown_additional_chains_reported_individually() {
    let doc = document(
        json!([{"name": "spine", "bones": ["root", "spine1"]}]),
        json!([{
            "name": "wings",
            "generator": "wingGenerator",
            "chain": "spine",
            "options": {"span": 2.0, "additionalChains": ["spine", "wing_l", "wing_r"]}
        }]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(
        graph_codes(&failure),
        vec![ErrorCode::UnknownAdditionalChains, ErrorCode::UnknownAdditionalChains]
    );
    assert_eq!(
        failure.graph_errors[1].path.as_deref(),
        Some("bodyPartsV2[0].options.additionalChains[2]")
    );
}

#[test]
fn test_every_category_reported_together() {
    let doc = document(
        json!([{"name": "spine", "bones": ["ghost"]}]),
        json!([{"name": "head", "generator": "headGenerator", "chain": "skull"}]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(
        graph_codes(&failure),
        vec![ErrorCode::ChainMissingBones, ErrorCode::UnknownChain]
    );
}

#[test]
fn test_duplicate_names() {
    let doc = document(
        json!([
            {"name": "spine", "bones": ["root"]},
            {"name": "spine", "bones": ["spine1"]}
        ]),
        json!([
            {"name": "a", "generator": "limb", "chain": "spine"},
            {"name": "a", "generator": "limb", "chain": "spine"}
        ]),
    );
    let failure = validate(&doc).unwrap_err();
    assert_eq!(
        graph_codes(&failure),
        vec![ErrorCode::DuplicateName, ErrorCode::DuplicateName]
    );
}

#[test]
fn test_parent_cycle_is_graph_error() {
    let mut doc = document(json!([{"name": "spine", "bones": ["root"]}]), json!([]));
    doc["skeleton"] = skeleton(&[("root", ""), ("a", "b"), ("b", "a")]);
    let failure = validate(&doc).unwrap_err();
    assert_eq!(graph_codes(&failure), vec![ErrorCode::ParentCycle]);
    assert!(failure.graph_errors[0].message.contains("a -> b -> a"));
}

#[test]
fn test_unknown_parent_and_root_are_warnings() {
    let mut doc = document(json!([{"name": "spine", "bones": ["root"]}]), json!([]));
    doc["skeleton"] = skeleton(&[("root", ""), ("ear", "skull")]);
    doc["skeleton"]["root"] = json!("pelvis");
    let validated = validate(&doc).unwrap();
    let codes: Vec<WarningCode> = validated.warnings().iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::UnknownParent, WarningCode::UnknownRoot]);
}

#[test]
fn test_extension_bone_warning() {
    let doc = document(
        json!([{"name": "spine", "bones": ["root", "spine1"], "extendTo": {"bones": ["hip"], "extraMargin": 0.1}}]),
        json!([]),
    );
    let validated = validate(&doc).unwrap();
    assert_eq!(validated.warnings()[0].code, WarningCode::UnknownExtensionBone);
}

#[test]
fn test_field_errors_are_exhaustive() {
    let mut doc = document(
        json!([{"name": "spine", "bones": ["root"], "radii": [-1.0]}]),
        json!([{"name": "body", "generator": "torso", "chain": "spine", "options": {"sides": 2, "rumpBulgeDepth": -0.2}}]),
    );
    doc["materials"] = json!({"surface": {"roughness": 1.5}, "extraMaterials": {"skin": {"metallic": -0.1}}});
    doc["sizes"] = json!({"defaultRadius": -3.0});
    let failure = validate(&doc).unwrap_err();
    assert!(failure.graph_errors.is_empty());
    let paths: Vec<&str> = failure
        .field_errors
        .iter()
        .filter_map(|e| e.path.as_deref())
        .collect();
    assert_eq!(
        paths,
        vec![
            "chainsV2[0].radii[0]",
            "bodyPartsV2[0].options.rumpBulgeDepth",
            "bodyPartsV2[0].options.sides",
            "sizes.defaultRadius",
            "materials.surface.roughness",
            "materials.extraMaterials.skin.metallic",
        ]
    );
}

#[test]
fn test_shape_and_range_errors_reported_together() {
    let mut doc = document(
        json!([{"name": "spine", "bones": ["root"]}]),
        json!([{"name": "body", "generator": "torso", "chain": "spine"}]),
    );
    doc["skeleton"]["bones"][0]["position"] = json!([0, 1]);
    doc["skeleton"]["bones"][1]["position"] = json!("up");
    doc["materials"] = json!({"surface": {"roughness": 2.0}, "eye": {"metallic": "shiny"}});

    let failure = validate(&doc).unwrap_err();
    assert!(failure.graph_errors.is_empty());
    let found: Vec<(ErrorCode, &str)> = failure
        .field_errors
        .iter()
        .map(|e| (e.code, e.path.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(
        found,
        vec![
            (ErrorCode::MalformedDocument, "skeleton.bones[0]"),
            (ErrorCode::MalformedDocument, "skeleton.bones[1]"),
            (ErrorCode::OutOfRange, "materials.surface.roughness"),
            (ErrorCode::MalformedDocument, "materials.eye"),
        ]
    );
    assert!(failure.field_errors[3].message.contains("shiny"));
}

#[test]
fn test_malformed_document_is_field_error() {
    let failure = validate(&json!({"meta": {"name": "x"}})).unwrap_err();
    assert_eq!(failure.field_errors.len(), 2);
    assert!(failure
        .field_errors
        .iter()
        .all(|e| e.code == ErrorCode::MalformedDocument));

    let failure = validate_str("{not json").unwrap_err();
    assert!(failure.field_errors[0].message.starts_with("invalid JSON"));
}

#[test]
fn test_legacy_document_skips_graph_errors() {
    let doc = json!({
        "meta": {"name": "Oldie"},
        "bodyPlan": {"type": "quadruped"},
        "skeleton": skeleton(&[("root", ""), ("spine1", "root")]),
        "chains": {"spine": ["root", "spine1", "missing"]},
        "bodyParts": {
            "torso": {"generator": "torso", "chain": "spine"},
            "tail": {"generator": "tail", "chain": "tail"}
        }
    });
    let validated = validate(&doc).unwrap();
    let codes: Vec<WarningCode> = validated.warnings().iter().map(|w| w.code).collect();
    assert_eq!(
        codes,
        vec![WarningCode::LegacyChainMissingBone, WarningCode::LegacyUnknownChain]
    );
}

#[test]
fn test_round_trip_is_identical() {
    let doc = document(
        json!([{"name": "spine", "bones": ["root", "spine1", "head"], "extendTo": true}]),
        json!([
            {"name": "body", "generator": "torsoGenerator", "chain": "spine", "options": {"radii": [1.0, 0.8], "lowPoly": true}},
            {"name": "crest", "generator": "crestGenerator", "chain": "spine", "options": {"height": 0.3, "sides": 5.0}}
        ]),
    );
    let first = validate(&doc).unwrap();
    let again = validate_blueprint(first.blueprint()).unwrap();
    assert_eq!(again.blueprint(), first.blueprint());
}
