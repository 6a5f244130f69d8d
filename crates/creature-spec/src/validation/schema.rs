//! Entity-by-entity parsing of a raw blueprint document.
//!
//! Each entity deserializes on its own, so one malformed bone does not hide a
//! malformed material further down. Range checks run on every entity that
//! parsed.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::fields;
use crate::blueprint::{BehaviorPresets, Blueprint, Sizes};
use crate::body_parts::{BodyPart, LegacyBodyParts};
use crate::chains::{Chain, LegacyChains};
use crate::error::{ErrorCode, ValidationError};
use crate::material::{MaterialDefinition, MaterialsConfig};
use crate::skeleton::{Bone, Skeleton};

/// Skeleton fields other than the bone list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkeletonHeader {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    coordinate_system: Option<String>,
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn malformed(&mut self, message: impl Into<String>, path: &str) {
        self.errors.push(ValidationError::with_path(
            ErrorCode::MalformedDocument,
            message,
            path,
        ));
    }

    fn entity<T: DeserializeOwned>(&mut self, value: &Value, path: &str) -> Option<T> {
        match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.malformed(e.to_string(), path);
                None
            }
        }
    }

    fn required<T: DeserializeOwned>(&mut self, root: &Map<String, Value>, key: &str) -> Option<T> {
        match root.get(key) {
            Some(value) => self.entity(value, key),
            None => {
                self.malformed(format!("missing field `{key}`"), key);
                None
            }
        }
    }

    /// Absent keys take the type's default.
    fn optional<T: DeserializeOwned + Default>(
        &mut self,
        root: &Map<String, Value>,
        key: &str,
    ) -> Option<T> {
        match root.get(key) {
            Some(value) => self.entity(value, key),
            None => Some(T::default()),
        }
    }

    /// Parses every item of a list, pairing each parsed item with its path.
    fn list<T: DeserializeOwned>(&mut self, value: Option<&Value>, path: &str) -> Vec<(String, T)> {
        let items = match value {
            None => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.malformed(format!("expected a list, got {}", kind(other)), path);
                return Vec::new();
            }
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let item_path = format!("{path}[{i}]");
                self.entity(item, &item_path).map(|parsed| (item_path, parsed))
            })
            .collect()
    }

    fn skeleton(&mut self, root: &Map<String, Value>) -> Option<Skeleton> {
        let Some(value) = root.get("skeleton") else {
            self.malformed("missing field `skeleton`", "skeleton");
            return None;
        };
        let Some(object) = value.as_object() else {
            self.malformed(format!("expected an object, got {}", kind(value)), "skeleton");
            return None;
        };
        let header: Option<SkeletonHeader> = self.entity(value, "skeleton");
        if !object.contains_key("bones") {
            self.malformed("missing field `bones`", "skeleton.bones");
            return None;
        }
        let expected = object.get("bones").and_then(Value::as_array).map_or(0, Vec::len);
        let bones: Vec<Bone> = self
            .list(object.get("bones"), "skeleton.bones")
            .into_iter()
            .map(|(_, bone)| bone)
            .collect();

        let header = header?;
        (bones.len() == expected).then(|| Skeleton {
            root: header.root,
            coordinate_system: header.coordinate_system,
            bones,
        })
    }

    fn materials(&mut self, root: &Map<String, Value>) -> MaterialsConfig {
        let mut config = MaterialsConfig::default();
        let Some(value) = root.get("materials") else {
            return config;
        };
        let Some(object) = value.as_object() else {
            self.malformed(format!("expected an object, got {}", kind(value)), "materials");
            return config;
        };

        for (slot, target) in [
            ("surface", &mut config.surface),
            ("eye", &mut config.eye),
            ("tusk", &mut config.tusk),
            ("nail", &mut config.nail),
        ] {
            if let Some(value) = object.get(slot) {
                let path = format!("materials.{slot}");
                *target = self.entity::<Option<MaterialDefinition>>(value, &path).flatten();
                if let Some(material) = target {
                    fields::check_material(material, &path, &mut self.errors);
                }
            }
        }

        match object.get("extraMaterials") {
            None => {}
            Some(Value::Object(extras)) => {
                for (name, value) in extras {
                    let path = format!("materials.extraMaterials.{name}");
                    if let Some(material) = self.entity::<MaterialDefinition>(value, &path) {
                        fields::check_material(&material, &path, &mut self.errors);
                        config.extra_materials.insert(name.clone(), material);
                    }
                }
            }
            Some(other) => self.malformed(
                format!("expected an object, got {}", kind(other)),
                "materials.extraMaterials",
            ),
        }
        config
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Parses a document into a blueprint, or returns every field-level error.
pub(crate) fn parse(document: &Value) -> Result<Blueprint, Vec<ValidationError>> {
    let Some(root) = document.as_object() else {
        return Err(vec![ValidationError::new(
            ErrorCode::MalformedDocument,
            format!("blueprint must be an object, got {}", kind(document)),
        )]);
    };
    let mut c = Collector::default();

    let meta = c.required(root, "meta");
    let body_plan = c.required(root, "bodyPlan");
    let skeleton = c.skeleton(root);
    let chains: Option<Option<LegacyChains>> = c.optional(root, "chains");

    let chains_v2: Vec<Chain> = c
        .list(root.get("chainsV2"), "chainsV2")
        .into_iter()
        .map(|(path, chain)| {
            fields::check_chain(&chain, &path, &mut c.errors);
            chain
        })
        .collect();
    let body_parts_v2: Vec<BodyPart> = c
        .list(root.get("bodyPartsV2"), "bodyPartsV2")
        .into_iter()
        .map(|(path, part)| {
            fields::check_body_part(&part, &path, &mut c.errors);
            part
        })
        .collect();

    let body_parts: Option<Option<LegacyBodyParts>> = c.optional(root, "bodyParts");
    if let Some(Some(legacy)) = &body_parts {
        fields::check_legacy_parts(legacy, &mut c.errors);
    }
    let sizes: Option<Sizes> = c.optional(root, "sizes");
    if let Some(sizes) = &sizes {
        fields::check_sizes(sizes, &mut c.errors);
    }
    let materials = c.materials(root);
    let behavior_presets: Option<BehaviorPresets> = c.optional(root, "behaviorPresets");

    if !c.errors.is_empty() {
        return Err(c.errors);
    }
    match (meta, body_plan, skeleton, chains, body_parts, sizes, behavior_presets) {
        (
            Some(meta),
            Some(body_plan),
            Some(skeleton),
            Some(chains),
            Some(body_parts),
            Some(sizes),
            Some(behavior_presets),
        ) => Ok(Blueprint {
            meta,
            body_plan,
            skeleton,
            chains,
            body_parts,
            chains_v2,
            body_parts_v2,
            sizes,
            materials,
            behavior_presets,
        }),
        // Every `None` above recorded an error.
        _ => Err(c.errors),
    }
}
