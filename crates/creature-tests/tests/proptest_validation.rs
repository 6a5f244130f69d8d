//! Property-based tests for blueprint validation and material resolution.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p creature-tests --test proptest_validation
//! ```

use std::collections::BTreeSet;

use creature_export::{resolve_material_slots, Workflow};
use creature_spec::{validate, validate_blueprint, Blueprint, MaterialDefinition};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generators the renderer knows about, in both spellings.
const KNOWN_GENERATORS: &[&str] = &[
    "torsoGenerator",
    "torso",
    "neckGenerator",
    "headGenerator",
    "noseGenerator",
    "trunk",
    "tailGenerator",
    "earGenerator",
    "limbGenerator",
    "limb",
    "wingGenerator",
];

fn generator() -> impl Strategy<Value = String> {
    prop::sample::select(KNOWN_GENERATORS).prop_map(str::to_string)
}

fn any_generator() -> impl Strategy<Value = String> {
    prop_oneof![
        generator(),
        prop::string::string_regex("[a-zA-Z][a-zA-Z0-9]{0,15}").unwrap(),
    ]
}

/// Unique bone names without underscores.
fn bone_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,7}", 1..8).prop_map(|set| set.into_iter().collect())
}

/// Names that can never collide with [`bone_names`].
fn missing_bones() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("ghost_[a-z]{1,6}", 1..4)
}

/// Small values that survive a JSON round trip exactly.
fn quarter() -> impl Strategy<Value = f64> {
    (0u32..40).prop_map(|q| f64::from(q) * 0.25)
}

/// A linear skeleton: every bone parents the next.
fn skeleton(names: &[String]) -> Value {
    let bones: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let parent = if i == 0 { "" } else { names[i - 1].as_str() };
            json!({"name": name, "parent": parent, "position": [0, i, 0]})
        })
        .collect();
    json!({ "bones": bones })
}

fn document(bones: &[String], chains: Value, parts: Value) -> Value {
    json!({
        "meta": {"name": "Specimen"},
        "bodyPlan": {"type": "quadruped"},
        "skeleton": skeleton(bones),
        "chainsV2": chains,
        "bodyPartsV2": parts,
    })
}

proptest! {
    /// Valid blueprints survive serialization and re-validation unchanged.
    #[test]
    fn valid_blueprints_round_trip(
        bones in bone_names(),
        generator in generator(),
        sides in 3i64..64,
        radius in quarter(),
        has_trunk in any::<bool>(),
    ) {
        let doc = json!({
            "meta": {"name": "Specimen"},
            "bodyPlan": {"type": "quadruped", "hasTrunk": has_trunk},
            "skeleton": skeleton(&bones),
            "chainsV2": [{"name": "spine", "bones": bones}],
            "bodyPartsV2": [{
                "name": "part",
                "generator": generator,
                "chain": "spine",
                "options": {"sides": sides, "radius": radius}
            }],
            "materials": {"surface": {"color": "#808080", "roughness": radius.min(1.0)}},
        });

        let first = validate(&doc).expect("generated blueprint is valid");
        let second = validate_blueprint(first.blueprint()).expect("re-validation succeeds");
        prop_assert_eq!(first.blueprint(), second.blueprint());

        let reparsed = validate(&first.blueprint().to_value().unwrap()).unwrap();
        prop_assert_eq!(first.blueprint(), reparsed.blueprint());
    }

    /// Every missing bone of a chain is named in one error for that chain.
    #[test]
    fn chain_errors_name_every_missing_bone(
        bones in bone_names(),
        missing in missing_bones(),
        generator in generator(),
    ) {
        let mut chain_bones: Vec<String> = bones.clone();
        chain_bones.extend(missing.iter().cloned());
        let doc = document(
            &bones,
            json!([{"name": "spine", "bones": chain_bones}]),
            json!([{"name": "part", "generator": generator, "chain": "spine"}]),
        );

        let failure = validate(&doc).unwrap_err();
        let chain_errors: Vec<_> = failure
            .graph_errors
            .iter()
            .filter(|e| e.code.code() == "G002")
            .collect();
        prop_assert_eq!(chain_errors.len(), 1);

        let error = chain_errors[0];
        prop_assert!(error.message.contains("'spine'"), "{}", error.message);
        for bone in &missing {
            prop_assert!(error.message.contains(bone.as_str()), "{} lacks {}", error.message, bone);
        }
        for bone in &bones {
            let listed = error
                .message
                .rsplit(": ")
                .next()
                .unwrap_or_default()
                .split(", ")
                .any(|name| name == bone);
            prop_assert!(!listed, "{} wrongly lists {}", error.message, bone);
        }
        prop_assert_eq!(error.path.as_deref(), Some("chainsV2[0].bones"));
    }

    /// A part bound to an absent chain fails whatever its generator.
    #[test]
    fn unknown_chain_fails_for_any_generator(
        bones in bone_names(),
        generator in any_generator(),
        chain in "[a-z]{1,10}",
    ) {
        prop_assume!(chain != "spine");
        let doc = document(
            &bones,
            json!([{"name": "spine", "bones": bones}]),
            json!([{"name": "part", "generator": generator, "chain": chain}]),
        );

        let failure = validate(&doc).unwrap_err();
        let unknown = failure
            .graph_errors
            .iter()
            .find(|e| e.code.code() == "G003")
            .expect("unknown chain error");
        prop_assert_eq!(unknown.path.as_deref(), Some("bodyPartsV2[0].chain"));
        prop_assert!(unknown.message.contains("Known chains: spine"), "{}", unknown.message);
    }

    /// Parts without any chains never validate.
    #[test]
    fn parts_without_chains_always_fail(
        bones in bone_names(),
        parts in prop::collection::vec((generator(), 0i64..12), 1..5),
    ) {
        let parts: Vec<Value> = parts
            .iter()
            .enumerate()
            .map(|(i, (generator, sides))| json!({
                "name": format!("part{i}"),
                "generator": generator,
                "chain": "spine",
                "options": {"sides": sides}
            }))
            .collect();
        let doc = document(&bones, json!([]), json!(parts));

        let failure = validate(&doc).unwrap_err();
        if failure.field_errors.is_empty() {
            prop_assert_eq!(failure.graph_errors[0].code.code(), "G001");
        }
    }

    /// Trunked species always get the node workflow on their surface slot.
    #[test]
    fn trunk_forces_node_surface(
        name in "[A-Za-z ]{1,20}",
        color in "#[0-9a-f]{6}",
    ) {
        let mut blueprint = Blueprint::new(name, "quadruped");
        blueprint.body_plan.has_trunk = true;
        blueprint.materials.surface = Some(MaterialDefinition::with_color(color.clone()));

        let slots = resolve_material_slots(&blueprint);
        let surface = &slots[0];
        prop_assert_eq!(surface.slot.as_str(), "surface");
        prop_assert_eq!(surface.workflow, Workflow::NodeTsl);
        let graph = surface.node_graph.as_ref().expect("node graph");
        prop_assert_eq!(&graph.parameters.albedo_tint, &color);
    }

    /// Without a trunk or an "elephant" name the surface stays PBR.
    #[test]
    fn plain_species_keep_pbr_surface(name in "[A-Za-z ]{1,20}") {
        prop_assume!(!name.to_lowercase().contains("elephant"));
        let mut blueprint = Blueprint::new(name, "quadruped");
        blueprint.materials.surface = Some(MaterialDefinition::with_color("#aabbcc"));

        let slots = resolve_material_slots(&blueprint);
        prop_assert_eq!(slots[0].workflow, Workflow::Pbr);
        prop_assert!(slots[0].node_graph.is_none());

        let rendered = serde_json::to_value(&slots[0]).unwrap();
        prop_assert!(rendered.get("nodeGraph").is_none());
        prop_assert_eq!(&rendered["workflow"], "pbr");
    }
}
