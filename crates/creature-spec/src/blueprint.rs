//! The species blueprint aggregate and its metadata types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::body_parts::{BodyPart, LegacyBodyParts};
use crate::chains::{Chain, LegacyChains};
use crate::error::SpecError;
use crate::material::MaterialsConfig;
use crate::skeleton::Skeleton;

/// Current blueprint schema version.
pub const SCHEMA_VERSION: &str = "4.2.0";

/// Metadata about a species blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintMeta {
    /// Display name of the species (e.g. "Elephant").
    pub name: String,
    /// Blueprint content version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Blueprint schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Forces legacy body-part builders when V2 anatomy is incomplete.
    #[serde(default)]
    pub force_legacy_build: bool,
}

impl BlueprintMeta {
    /// Creates metadata with default versions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            schema_version: default_schema_version(),
            author: None,
            source: None,
            notes: None,
            force_legacy_build: false,
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// High-level body plan classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPlan {
    /// Plan label such as "quadruped", "biped", "winged" or "nopeds".
    #[serde(rename = "type")]
    pub plan_type: String,
    #[serde(default = "default_true")]
    pub has_tail: bool,
    #[serde(default)]
    pub has_trunk: bool,
    #[serde(default)]
    pub has_wings: bool,
    #[serde(default = "default_true")]
    pub has_ears: bool,
    /// Serialized even when unset so an explicit `null` survives a round trip.
    #[serde(default = "default_symmetry")]
    pub symmetry_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BodyPlan {
    /// Creates a body plan of the given type with default flags.
    pub fn new(plan_type: impl Into<String>) -> Self {
        Self {
            plan_type: plan_type.into(),
            has_tail: true,
            has_trunk: false,
            has_wings: false,
            has_ears: true,
            symmetry_mode: default_symmetry(),
            notes: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_symmetry() -> Option<String> {
    Some("bilateral".to_string())
}

/// Size or radius profile for a bone or chain. All values are non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_scale: Option<f64>,
}

impl SizeProfile {
    /// Every set value paired with its field name.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("radius", self.radius),
            ("radiusTop", self.radius_top),
            ("radiusBottom", self.radius_bottom),
            ("lengthScale", self.length_scale),
            ("widthScale", self.width_scale),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Lookup tables for radii and scale factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_radius: Option<f64>,
    #[serde(default)]
    pub by_bone: BTreeMap<String, SizeProfile>,
    #[serde(default)]
    pub by_chain: BTreeMap<String, SizeProfile>,
}

/// High-level behavior presets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorPresets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gait: Option<String>,
    #[serde(default)]
    pub idle_behaviors: Vec<String>,
    #[serde(default)]
    pub special_interactions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Top-level species blueprint.
///
/// A blueprint is never mutated after parsing; edits such as
/// [`Blueprint::with_name`] return a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub meta: BlueprintMeta,
    pub body_plan: BodyPlan,
    pub skeleton: Skeleton,
    /// Legacy chain map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<LegacyChains>,
    /// Legacy body-part map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_parts: Option<LegacyBodyParts>,
    /// Generalized chains for the V2 anatomy pipeline.
    #[serde(default, rename = "chainsV2")]
    pub chains_v2: Vec<Chain>,
    /// Generalized body parts for the V2 anatomy pipeline.
    #[serde(default, rename = "bodyPartsV2")]
    pub body_parts_v2: Vec<BodyPart>,
    #[serde(default)]
    pub sizes: Sizes,
    #[serde(default)]
    pub materials: MaterialsConfig,
    #[serde(default)]
    pub behavior_presets: BehaviorPresets,
}

impl Blueprint {
    /// Creates a minimal blueprint with an empty skeleton.
    pub fn new(name: impl Into<String>, plan_type: impl Into<String>) -> Self {
        Self {
            meta: BlueprintMeta::new(name),
            body_plan: BodyPlan::new(plan_type),
            skeleton: Skeleton::new(Vec::new()),
            chains: None,
            body_parts: None,
            chains_v2: Vec::new(),
            body_parts_v2: Vec::new(),
            sizes: Sizes::default(),
            materials: MaterialsConfig::default(),
            behavior_presets: BehaviorPresets::default(),
        }
    }

    /// Parses a blueprint from a JSON string without graph validation.
    ///
    /// Use [`crate::validate`] to obtain a checked blueprint.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the blueprint to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, SpecError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes the blueprint to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Returns a copy with `meta.name` replaced.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let mut renamed = self.clone();
        renamed.meta.name = name.into();
        renamed
    }

    /// Returns true if the document opts into the V2 anatomy pipeline.
    pub fn uses_v2_anatomy(&self) -> bool {
        !self.chains_v2.is_empty() || !self.body_parts_v2.is_empty()
    }

    /// Looks up a V2 chain by name.
    pub fn chain(&self, name: &str) -> Option<&Chain> {
        self.chains_v2.iter().find(|c| c.name == name)
    }
}
