//! End-to-end validation tests over the fixture blueprints.

use creature_spec::{
    canonical_value_hash, validate, validate_blueprint, BodyPartOptions, ErrorCode, GeneratorFamily,
};
use creature_tests::fixtures::{fixtures_dir, templates_dir};
use creature_tests::{elephant, headx_scenario, legacy_quadruped, load_fixture};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn codes(errors: &[creature_spec::ValidationError]) -> Vec<&'static str> {
    errors.iter().map(|e| e.code.code()).collect()
}

#[test]
fn elephant_fixture_is_valid_v2() {
    let validated = validate(&elephant()).expect("elephant validates");
    let blueprint = validated.blueprint();

    assert_eq!(blueprint.name(), "Elephant");
    assert!(blueprint.uses_v2_anatomy());
    assert!(blueprint.body_plan.has_trunk);
    assert_eq!(blueprint.chains_v2.len(), 12);
    assert_eq!(blueprint.body_parts_v2.len(), 13);
    assert!(validated.warnings().is_empty(), "{:?}", validated.warnings());
}

#[test]
fn elephant_options_resolve_to_generator_families() {
    let validated = validate(&elephant()).unwrap();
    let families: Vec<(String, Option<GeneratorFamily>)> = validated
        .blueprint()
        .body_parts_v2
        .iter()
        .map(|p| (p.name.clone(), p.options.family()))
        .collect();

    let family_of = |name: &str| {
        families
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, f)| *f)
    };
    assert_eq!(family_of("torso"), Some(GeneratorFamily::Torso));
    assert_eq!(family_of("trunk"), Some(GeneratorFamily::Nose));
    assert_eq!(family_of("tuskLeft"), Some(GeneratorFamily::Nose));
    assert_eq!(family_of("earRight"), Some(GeneratorFamily::Ear));
    assert_eq!(family_of("backLegR"), Some(GeneratorFamily::Limb));

    let torso = &validated.blueprint().body_parts_v2[0];
    match &torso.options {
        BodyPartOptions::Torso(options) => {
            let rump = options.extend_rump_to_rear_legs.as_ref().unwrap();
            assert_eq!(rump.bones.len(), 4);
        }
        other => panic!("expected torso options, got {:?}", other),
    }
}

#[test]
fn legacy_fixture_skips_v2_graph_checks() {
    let validated = validate(&legacy_quadruped()).expect("legacy validates");
    let blueprint = validated.blueprint();
    assert!(!blueprint.uses_v2_anatomy());
    assert!(blueprint.meta.force_legacy_build);
    assert_eq!(blueprint.body_parts.as_ref().unwrap().iter().count(), 8);
    assert!(validated.warnings().is_empty(), "{:?}", validated.warnings());
}

#[test]
fn every_template_validates() {
    for file in [
        "TemplateQuadruped.json",
        "TemplateBiped.json",
        "TemplateWinged.json",
        "TemplateNoPed.json",
    ] {
        let document = load_fixture(&format!("templates/{file}"));
        let validated = validate(&document)
            .unwrap_or_else(|f| panic!("{file} failed validation: {f}"));
        assert!(validated.blueprint().uses_v2_anatomy(), "{file}");
    }
    assert!(templates_dir().starts_with(fixtures_dir()));
}

#[test]
fn headx_scenario_names_chain_and_bone() {
    let failure = validate(&headx_scenario()).unwrap_err();
    assert!(failure.field_errors.is_empty());
    assert_eq!(codes(&failure.graph_errors), vec!["G002"]);
    let error = &failure.graph_errors[0];
    assert_eq!(error.message, "Chain 'spine' references missing bones: headX");
    assert_eq!(error.path.as_deref(), Some("chainsV2[0].bones"));
}

#[test]
fn removing_leg_bones_reports_every_missing_bone_once() {
    let mut document = elephant();
    let bones = document["skeleton"]["bones"].as_array_mut().unwrap();
    bones.retain(|b| {
        let name = b["name"].as_str().unwrap();
        name != "back_left_lower" && name != "back_left_foot"
    });

    let failure = validate(&document).unwrap_err();
    assert_eq!(codes(&failure.graph_errors), vec!["G002"]);
    assert_eq!(
        failure.graph_errors[0].message,
        "Chain 'backLegL' references missing bones: back_left_lower, back_left_foot"
    );
}

#[test]
fn renamed_chain_breaks_every_part_that_targets_it() {
    let mut document = elephant();
    let chains = document["chainsV2"].as_array_mut().unwrap();
    for chain in chains.iter_mut() {
        if chain["name"] == "neck" {
            chain["name"] = json!("throat");
        }
    }

    let failure = validate(&document).unwrap_err();
    assert_eq!(codes(&failure.graph_errors), vec!["G003", "G003"]);
    let parts: Vec<&str> = failure
        .graph_errors
        .iter()
        .map(|e| e.path.as_deref().unwrap())
        .collect();
    assert_eq!(parts, vec!["bodyPartsV2[1].chain", "bodyPartsV2[2].chain"]);
    assert!(failure.graph_errors[0].message.contains("Known chains: backLegL, backLegR"));
}

#[test]
fn v2_parts_without_chains_fail() {
    let mut document = elephant();
    document["chainsV2"] = json!([]);
    let failure = validate(&document).unwrap_err();
    assert_eq!(failure.graph_errors[0].code, ErrorCode::MissingChains);
}

#[test]
fn field_errors_in_fixture_are_exhaustive() {
    let mut document = elephant();
    document["bodyPartsV2"][1]["options"]["sides"] = json!(2);
    document["bodyPartsV2"][3]["options"]["tipRadius"] = json!(-0.1);
    document["materials"]["eye"]["roughness"] = json!(1.5);

    let failure = validate(&document).unwrap_err();
    assert!(failure.graph_errors.is_empty());
    let paths: Vec<&str> = failure
        .field_errors
        .iter()
        .map(|e| e.path.as_deref().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec![
            "bodyPartsV2[1].options.sides",
            "bodyPartsV2[3].options.tipRadius",
            "materials.eye.roughness",
        ]
    );
}

#[test]
fn fixtures_round_trip_through_serialization() {
    for document in [elephant(), legacy_quadruped()] {
        let first = validate(&document).unwrap();
        let second = validate_blueprint(first.blueprint()).unwrap();
        assert_eq!(first.blueprint(), second.blueprint());

        let reparsed: Value = serde_json::to_value(second.blueprint()).unwrap();
        assert_eq!(&reparsed, second.source());
    }
}

#[test]
fn canonical_hash_ignores_key_order() {
    let document = elephant();
    let text = serde_json::to_string(&document).unwrap();
    let reordered: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(canonical_value_hash(&document), canonical_value_hash(&reordered));

    let mut renamed = document.clone();
    renamed["meta"]["name"] = json!("Mammoth");
    assert_ne!(canonical_value_hash(&document), canonical_value_hash(&renamed));
}
