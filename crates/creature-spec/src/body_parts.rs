//! Body-part bindings: the generalized V2 list and the legacy slot map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::BodyPartOptions;

/// A generator bound to a V2 chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BodyPartDocument")]
pub struct BodyPart {
    /// Unique body-part name within the blueprint.
    pub name: String,
    /// Generator identifier resolved by the renderer.
    pub generator: String,
    /// Name of the `chainsV2` entry the generator follows.
    pub chain: String,
    /// Generator options.
    pub options: BodyPartOptions,
}

impl BodyPart {
    /// Creates a body part with empty options.
    pub fn new(
        name: impl Into<String>,
        generator: impl Into<String>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            generator: generator.into(),
            chain: chain.into(),
            options: BodyPartOptions::default(),
        }
    }
}

/// Wire form of a body part; options resolve against the generator family.
#[derive(Deserialize)]
struct BodyPartDocument {
    name: String,
    generator: String,
    chain: String,
    #[serde(default)]
    options: Map<String, Value>,
}

impl From<BodyPartDocument> for BodyPart {
    fn from(doc: BodyPartDocument) -> Self {
        let options = BodyPartOptions::resolve(Some(&doc.generator), doc.options);
        Self {
            name: doc.name,
            generator: doc.generator,
            chain: doc.chain,
            options,
        }
    }
}

/// A generator bound to a legacy chain slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LegacyPartDocument")]
pub struct LegacyBodyPart {
    pub generator: String,
    /// Legacy chain name (`spine`, `frontLegL`, or an `extraChains` key).
    pub chain: String,
    pub options: BodyPartOptions,
}

#[derive(Deserialize)]
struct LegacyPartDocument {
    generator: String,
    chain: String,
    #[serde(default)]
    options: Map<String, Value>,
}

impl From<LegacyPartDocument> for LegacyBodyPart {
    fn from(doc: LegacyPartDocument) -> Self {
        let options = BodyPartOptions::resolve(Some(&doc.generator), doc.options);
        Self {
            generator: doc.generator,
            chain: doc.chain,
            options,
        }
    }
}

/// Legacy fixed-slot body-part map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBodyParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torso: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ear_left: Option<LegacyBodyPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ear_right: Option<LegacyBodyPart>,
    #[serde(default, rename = "frontLegL", skip_serializing_if = "Option::is_none")]
    pub front_leg_l: Option<LegacyBodyPart>,
    #[serde(default, rename = "frontLegR", skip_serializing_if = "Option::is_none")]
    pub front_leg_r: Option<LegacyBodyPart>,
    #[serde(default, rename = "backLegL", skip_serializing_if = "Option::is_none")]
    pub back_leg_l: Option<LegacyBodyPart>,
    #[serde(default, rename = "backLegR", skip_serializing_if = "Option::is_none")]
    pub back_leg_r: Option<LegacyBodyPart>,
    /// Additional parts keyed by name.
    #[serde(default)]
    pub extra_parts: BTreeMap<String, LegacyBodyPart>,
}

impl LegacyBodyParts {
    /// Populated parts in slot order, then `extraParts` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LegacyBodyPart)> {
        let slots = [
            ("torso", self.torso.as_ref()),
            ("neck", self.neck.as_ref()),
            ("head", self.head.as_ref()),
            ("trunk", self.trunk.as_ref()),
            ("tail", self.tail.as_ref()),
            ("earLeft", self.ear_left.as_ref()),
            ("earRight", self.ear_right.as_ref()),
            ("frontLegL", self.front_leg_l.as_ref()),
            ("frontLegR", self.front_leg_r.as_ref()),
            ("backLegL", self.back_leg_l.as_ref()),
            ("backLegR", self.back_leg_r.as_ref()),
        ];
        slots
            .into_iter()
            .filter_map(|(name, part)| part.map(|p| (name, p)))
            .chain(self.extra_parts.iter().map(|(name, part)| (name.as_str(), part)))
    }

    /// Returns true if no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
