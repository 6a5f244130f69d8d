//! Anatomical chain types: the generalized V2 list and the legacy slot map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Generalized chain definition used by the anatomy V2 pipeline.
///
/// A chain is an ordered path of skeleton bones that procedural generators
/// use as a parametric axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// Unique chain name within the blueprint.
    pub name: String,
    /// Ordered bone names.
    pub bones: Vec<String>,
    /// Optional per-bone radius samples (one per bone, or one more).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Optional named radius profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Optional rump/membrane extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_to: Option<ChainExtension>,
}

impl Chain {
    /// Creates a chain over the given bones.
    pub fn new<S: Into<String>>(name: impl Into<String>, bones: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            bones: bones.into_iter().map(Into::into).collect(),
            radii: None,
            profile: None,
            extend_to: None,
        }
    }
}

/// `extendTo` is either a plain switch or a detailed extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainExtension {
    /// `true` enables the renderer's default extension.
    Toggle(bool),
    /// Explicit bones, margin, and per-bone radii.
    Detailed(RumpExtension),
}

impl ChainExtension {
    /// Bones named by a detailed extension.
    pub fn bones(&self) -> &[String] {
        match self {
            ChainExtension::Toggle(_) => &[],
            ChainExtension::Detailed(ext) => &ext.bones,
        }
    }
}

/// Rump expansion that lets a torso overlap neighbouring limbs.
///
/// Keys outside the known three are kept in `extra` so documents written by
/// newer tools survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RumpExtension {
    /// Bones the extension should reach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bones: Vec<String>,
    /// Extra margin in meters; must be non-negative.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_margin: f64,
    /// Radius override per bone.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bone_radii: BTreeMap<String, f64>,
    /// Unrecognized keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// Legacy fixed-slot chain map.
///
/// Kept for blueprints authored before the V2 anatomy pipeline. Slots are
/// serialized even when empty so consumers see the full legacy shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyChains {
    #[serde(default)]
    pub spine: Vec<String>,
    #[serde(default)]
    pub neck: Vec<String>,
    #[serde(default)]
    pub head: Vec<String>,
    #[serde(default)]
    pub trunk: Vec<String>,
    #[serde(default)]
    pub tail: Vec<String>,
    #[serde(default)]
    pub ear_left: Vec<String>,
    #[serde(default)]
    pub ear_right: Vec<String>,
    #[serde(default, rename = "frontLegL")]
    pub front_leg_l: Vec<String>,
    #[serde(default, rename = "frontLegR")]
    pub front_leg_r: Vec<String>,
    #[serde(default, rename = "backLegL")]
    pub back_leg_l: Vec<String>,
    #[serde(default, rename = "backLegR")]
    pub back_leg_r: Vec<String>,
    /// Additional chains keyed by name.
    #[serde(default)]
    pub extra_chains: BTreeMap<String, Vec<String>>,
}

impl LegacyChains {
    /// Fixed slots in declaration order, paired with their wire names.
    pub fn slots(&self) -> [(&'static str, &[String]); 11] {
        [
            ("spine", self.spine.as_slice()),
            ("neck", self.neck.as_slice()),
            ("head", self.head.as_slice()),
            ("trunk", self.trunk.as_slice()),
            ("tail", self.tail.as_slice()),
            ("earLeft", self.ear_left.as_slice()),
            ("earRight", self.ear_right.as_slice()),
            ("frontLegL", self.front_leg_l.as_slice()),
            ("frontLegR", self.front_leg_r.as_slice()),
            ("backLegL", self.back_leg_l.as_slice()),
            ("backLegR", self.back_leg_r.as_slice()),
        ]
    }

    /// Every chain (fixed slots, then extras) by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots().into_iter().chain(
            self.extra_chains
                .iter()
                .map(|(name, bones)| (name.as_str(), bones.as_slice())),
        )
    }

    /// Returns the bones of a named chain, if that chain is populated.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.iter()
            .find(|(chain, bones)| *chain == name && !bones.is_empty())
            .map(|(_, bones)| bones)
    }

    /// Returns true if no slot holds any bone.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, bones)| bones.is_empty())
    }
}
