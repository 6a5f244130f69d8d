//! Bundle payload documents.
//!
//! Every payload carries the same version stamps. Payloads are rendered
//! through `serde_json::Value` so object keys come out sorted.

use std::collections::BTreeMap;

use creature_spec::{Blueprint, BodyPartOptions, LegacyChains};
use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::materials::{resolve_material_slots, MaterialSlot};

/// Version of the bundle layout contract.
pub const CONTRACT_VERSION: &str = "1.0.0";

/// Oldest renderer version that can load these bundles.
pub const MIN_ZOO_VERSION: &str = "0.1.0";

/// Version stamps shared by every payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamps {
    pub contract_version: String,
    pub schema_version: String,
    pub min_zoo_version: String,
}

impl Stamps {
    pub fn for_blueprint(blueprint: &Blueprint) -> Self {
        Self {
            contract_version: CONTRACT_VERSION.to_string(),
            schema_version: blueprint.meta.schema_version.clone(),
            min_zoo_version: MIN_ZOO_VERSION.to_string(),
        }
    }
}

/// Rest pose of an exported bone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestTransform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonEntry {
    pub name: String,
    /// `null` for root bones.
    pub parent: Option<String>,
    pub rest_transform: RestTransform,
}

/// Flattened body part, from either anatomy representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartEntry {
    pub name: String,
    pub generator: String,
    pub chain: String,
    pub options: BodyPartOptions,
}

/// `AnimalDefinition.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDefinition {
    #[serde(flatten)]
    pub stamps: Stamps,
    pub species_key: String,
    pub display_name: String,
    pub skeleton: Vec<SkeletonEntry>,
    pub parts: Vec<PartEntry>,
    pub materials: Vec<MaterialSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chains: Option<LegacyChains>,
}

impl AnimalDefinition {
    pub fn build(blueprint: &Blueprint, species_key: &str) -> Self {
        let skeleton = blueprint
            .skeleton
            .bones
            .iter()
            .map(|bone| SkeletonEntry {
                name: bone.name.clone(),
                parent: bone.parent_name().map(str::to_string),
                rest_transform: RestTransform {
                    position: bone.position,
                    rotation: [0.0, 0.0, 0.0],
                    scale: [1.0, 1.0, 1.0],
                },
            })
            .collect();

        Self {
            stamps: Stamps::for_blueprint(blueprint),
            species_key: species_key.to_string(),
            display_name: blueprint.meta.name.clone(),
            skeleton,
            parts: flatten_parts(blueprint),
            materials: resolve_material_slots(blueprint),
            chains: blueprint.chains.clone(),
        }
    }
}

/// V2 body parts win; the legacy map is the fallback.
fn flatten_parts(blueprint: &Blueprint) -> Vec<PartEntry> {
    if !blueprint.body_parts_v2.is_empty() {
        return blueprint
            .body_parts_v2
            .iter()
            .map(|part| PartEntry {
                name: part.name.clone(),
                generator: part.generator.clone(),
                chain: part.chain.clone(),
                options: part.options.clone(),
            })
            .collect();
    }

    match &blueprint.body_parts {
        Some(legacy) => legacy
            .iter()
            .map(|(name, part)| PartEntry {
                name: name.to_string(),
                generator: part.generator.clone(),
                chain: part.chain.clone(),
                options: part.options.clone(),
            })
            .collect(),
        None => Vec::new(),
    }
}

/// `materials.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialsPayload {
    #[serde(flatten)]
    pub stamps: Stamps,
    pub slots: Vec<MaterialSlot>,
    /// Reserved; always empty for now.
    pub textures: BTreeMap<String, String>,
}

impl MaterialsPayload {
    pub fn build(blueprint: &Blueprint) -> Self {
        Self {
            stamps: Stamps::for_blueprint(blueprint),
            slots: resolve_material_slots(blueprint),
            textures: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Locomotion {
    pub gait: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub idle_behaviors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub special_interactions: Vec<String>,
}

/// `runtime.json`. Sections without data are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimePayload {
    #[serde(flatten)]
    pub stamps: Stamps,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locomotion: Option<Locomotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
}

impl RuntimePayload {
    pub fn build(blueprint: &Blueprint) -> Self {
        let presets = &blueprint.behavior_presets;
        let locomotion = presets
            .gait
            .as_ref()
            .filter(|gait| !gait.is_empty())
            .map(|gait| Locomotion { gait: gait.clone() });
        let behavior = (!presets.idle_behaviors.is_empty()
            || !presets.special_interactions.is_empty())
        .then(|| Behavior {
            idle_behaviors: presets.idle_behaviors.clone(),
            special_interactions: presets.special_interactions.clone(),
        });

        Self {
            stamps: Stamps::for_blueprint(blueprint),
            locomotion,
            behavior,
        }
    }

    /// Returns true if either section is present.
    pub fn has_content(&self) -> bool {
        self.locomotion.is_some() || self.behavior.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooling {
    pub app: String,
    pub version: String,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalIdentity {
    pub species_key: String,
    pub display_name: String,
}

/// `manifest.json`. Written last; never lists itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub stamps: Stamps,
    pub tooling: Tooling,
    pub animal: AnimalIdentity,
    /// Checksum per bundle-relative file path.
    pub payloads: BTreeMap<String, String>,
}

/// Renders a payload as pretty JSON with sorted keys.
pub fn render_json<T: Serialize>(payload: &T, name: &str) -> ExportResult<String> {
    let wrap = |source| ExportError::Serialize {
        payload: name.to_string(),
        source,
    };
    let value = serde_json::to_value(payload).map_err(wrap)?;
    serde_json::to_string_pretty(&value).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_spec::{BodyPart, Bone, LegacyBodyPart, LegacyBodyParts, Skeleton};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn blueprint() -> Blueprint {
        let mut bp = Blueprint::new("Testodon", "quadruped");
        bp.skeleton = Skeleton::new(vec![
            Bone::new("root", "", [0.0, 1.0, 0.0]),
            Bone::new("spine1", "root", [0.0, 1.2, 0.1]),
        ]);
        bp
    }

    #[test]
    fn test_skeleton_entries() {
        let def = AnimalDefinition::build(&blueprint(), "Testodon");
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(
            value["skeleton"][0],
            json!({
                "name": "root",
                "parent": null,
                "restTransform": {
                    "position": [0.0, 1.0, 0.0],
                    "rotation": [0.0, 0.0, 0.0],
                    "scale": [1.0, 1.0, 1.0]
                }
            })
        );
        assert_eq!(value["skeleton"][1]["parent"], "root");
        assert_eq!(value["contractVersion"], "1.0.0");
        assert_eq!(value["minZooVersion"], "0.1.0");
        assert!(value.get("chains").is_none());
    }

    #[test]
    fn test_v2_parts_take_precedence() {
        let mut bp = blueprint();
        bp.body_parts = Some(LegacyBodyParts {
            torso: Some(LegacyBodyPart {
                generator: "torso".to_string(),
                chain: "spine".to_string(),
                options: BodyPartOptions::default(),
            }),
            ..LegacyBodyParts::default()
        });
        assert_eq!(flatten_parts(&bp)[0].name, "torso");

        bp.body_parts_v2 = vec![BodyPart::new("body", "torsoGenerator", "spine")];
        let parts = flatten_parts(&bp);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "body");
    }

    #[test]
    fn test_runtime_sections_omitted_when_empty() {
        let mut bp = blueprint();
        let runtime = RuntimePayload::build(&bp);
        assert!(!runtime.has_content());
        let value = serde_json::to_value(&runtime).unwrap();
        assert!(value.get("locomotion").is_none());
        assert!(value.get("behavior").is_none());

        bp.behavior_presets.gait = Some("amble".to_string());
        bp.behavior_presets.idle_behaviors = vec!["ear_flap".to_string()];
        let value = serde_json::to_value(RuntimePayload::build(&bp)).unwrap();
        assert_eq!(value["locomotion"], json!({"gait": "amble"}));
        assert_eq!(value["behavior"], json!({"idleBehaviors": ["ear_flap"]}));
    }

    #[test]
    fn test_rendered_keys_sorted() {
        let rendered = render_json(&MaterialsPayload::build(&blueprint()), "materials.json").unwrap();
        let contract = rendered.find("contractVersion").unwrap();
        let slots = rendered.find("slots").unwrap();
        let textures = rendered.find("textures").unwrap();
        assert!(contract < slots && slots < textures);
    }
}
