//! Generator-specific body-part options.
//!
//! Options are a closed set of typed shapes, one per generator family, plus
//! an open `Raw` record for option sets no shape recognizes. Typed shapes only
//! store keys that were present in the document, so every shape serializes
//! back to exactly the keys it was parsed from.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::chains::RumpExtension;

/// Generator families with a dedicated option shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorFamily {
    Torso,
    Neck,
    Head,
    /// Noses, trunks, and tusks share one tapered shape.
    Nose,
    Tail,
    Ear,
    Limb,
}

impl GeneratorFamily {
    /// Fixed priority order used when no generator hint applies.
    pub const PRIORITY: [GeneratorFamily; 7] = [
        GeneratorFamily::Torso,
        GeneratorFamily::Neck,
        GeneratorFamily::Head,
        GeneratorFamily::Nose,
        GeneratorFamily::Tail,
        GeneratorFamily::Ear,
        GeneratorFamily::Limb,
    ];

    /// Maps a generator identifier (`"torso"`, `"torsoGenerator"`, ...) to its family.
    pub fn from_generator(generator: &str) -> Option<Self> {
        let key = generator.trim().to_ascii_lowercase();
        let key = key.strip_suffix("generator").unwrap_or(&key);
        match key {
            "torso" => Some(GeneratorFamily::Torso),
            "neck" => Some(GeneratorFamily::Neck),
            "head" => Some(GeneratorFamily::Head),
            "nose" | "trunk" | "tusk" => Some(GeneratorFamily::Nose),
            "tail" => Some(GeneratorFamily::Tail),
            "ear" => Some(GeneratorFamily::Ear),
            "limb" | "leg" => Some(GeneratorFamily::Limb),
            _ => None,
        }
    }

    /// Returns the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorFamily::Torso => "torso",
            GeneratorFamily::Neck => "neck",
            GeneratorFamily::Head => "head",
            GeneratorFamily::Nose => "nose",
            GeneratorFamily::Tail => "tail",
            GeneratorFamily::Ear => "ear",
            GeneratorFamily::Limb => "limb",
        }
    }
}

impl std::fmt::Display for GeneratorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// General limb options (legs, tusk bases, ear bases).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LimbOptions {
    /// Radius samples along the limb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radial segment count (default 16).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_end: Option<bool>,
}

/// Neck segment between torso and head.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NeckOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radial segment count (default 18).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    /// Vertical offset applied to every neck point; may be negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_base: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_end: Option<bool>,
}

/// Spherical or ellipsoid head.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeadOptions {
    /// Bone the head is centred on (default "head").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_bone: Option<String>,
    /// Head radius (default 0.6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Radial segment count (default 22).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    /// Stretch along the facing axis (default 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elongation: Option<f64>,
}

/// Torso with optional rump bulge and rear-leg overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TorsoOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radial segment count (default 28).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    /// Named radius profile (e.g. "elephant_heavy").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_profile: Option<String>,
    /// Rump bulge depth in meters; 0 disables the bulge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rump_bulge_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend_rump_to_rear_legs: Option<RumpExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_poly: Option<bool>,
    /// Segment count in low-poly mode (default 9).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_poly_segments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_poly_weld_tolerance: Option<f64>,
}

/// Nose, trunk, or tusk: a tapered tube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NoseOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radius at the root (default 0.2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_radius: Option<f64>,
    /// Radius at the tip (default 0.1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_radius: Option<f64>,
    /// Radial segment count (default 16).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_bone: Option<String>,
}

/// Tapered tail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TailOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radius at the root (default 0.12).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_radius: Option<f64>,
    /// Radius at the tip (default 0.05).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_radius: Option<f64>,
    /// Radial segment count (default 14).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_end: Option<bool>,
}

/// Ear flap: limb geometry flattened and tilted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EarOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radii: Option<Vec<f64>>,
    /// Radial segment count (default 16).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<i64>,
    /// Flattening factor (default 0.2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten: Option<f64>,
    /// Tilt about Z in radians; may be negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<f64>,
}

impl HeadOptions {
    pub fn parent_bone(&self) -> &str {
        self.parent_bone.as_deref().unwrap_or("head")
    }

    pub fn radius(&self) -> f64 {
        self.radius.unwrap_or(0.6)
    }

    pub fn elongation(&self) -> f64 {
        self.elongation.unwrap_or(1.0)
    }
}

impl TorsoOptions {
    pub fn low_poly_segments(&self) -> i64 {
        self.low_poly_segments.unwrap_or(9)
    }
}

impl NoseOptions {
    pub fn base_radius(&self) -> f64 {
        self.base_radius.unwrap_or(0.2)
    }

    pub fn tip_radius(&self) -> f64 {
        self.tip_radius.unwrap_or(0.1)
    }

    pub fn length_scale(&self) -> f64 {
        self.length_scale.unwrap_or(1.0)
    }
}

impl TailOptions {
    pub fn base_radius(&self) -> f64 {
        self.base_radius.unwrap_or(0.12)
    }

    pub fn tip_radius(&self) -> f64 {
        self.tip_radius.unwrap_or(0.05)
    }
}

impl EarOptions {
    pub fn flatten(&self) -> f64 {
        self.flatten.unwrap_or(0.2)
    }
}

/// Options attached to a body part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BodyPartOptions {
    Torso(TorsoOptions),
    Neck(NeckOptions),
    Head(HeadOptions),
    Nose(NoseOptions),
    Tail(TailOptions),
    Ear(EarOptions),
    Limb(LimbOptions),
    /// Options no typed shape accepts, kept verbatim.
    Raw(Map<String, Value>),
}

impl Default for BodyPartOptions {
    fn default() -> Self {
        BodyPartOptions::Raw(Map::new())
    }
}

impl BodyPartOptions {
    /// Resolves an options record using the fixed family priority order.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self::resolve(None, map)
    }

    /// Resolves an options record, trying the generator's own family first.
    ///
    /// An empty record stays `Raw` so no shape is claimed without evidence.
    pub fn resolve(generator: Option<&str>, map: Map<String, Value>) -> Self {
        if map.is_empty() {
            return BodyPartOptions::Raw(map);
        }

        let hint = generator.and_then(GeneratorFamily::from_generator);
        let order = hint
            .into_iter()
            .chain(GeneratorFamily::PRIORITY.into_iter().filter(|f| Some(*f) != hint));

        for family in order {
            if let Some(options) = Self::try_family(family, &map) {
                return options;
            }
        }
        BodyPartOptions::Raw(map)
    }

    fn try_family(family: GeneratorFamily, map: &Map<String, Value>) -> Option<Self> {
        let value = Value::Object(map.clone());
        let parsed = match family {
            GeneratorFamily::Torso => serde_json::from_value(value).map(BodyPartOptions::Torso),
            GeneratorFamily::Neck => serde_json::from_value(value).map(BodyPartOptions::Neck),
            GeneratorFamily::Head => serde_json::from_value(value).map(BodyPartOptions::Head),
            GeneratorFamily::Nose => serde_json::from_value(value).map(BodyPartOptions::Nose),
            GeneratorFamily::Tail => serde_json::from_value(value).map(BodyPartOptions::Tail),
            GeneratorFamily::Ear => serde_json::from_value(value).map(BodyPartOptions::Ear),
            GeneratorFamily::Limb => serde_json::from_value(value).map(BodyPartOptions::Limb),
        };
        parsed.ok()
    }

    /// The family of the typed shape, or `None` for raw options.
    pub fn family(&self) -> Option<GeneratorFamily> {
        match self {
            BodyPartOptions::Torso(_) => Some(GeneratorFamily::Torso),
            BodyPartOptions::Neck(_) => Some(GeneratorFamily::Neck),
            BodyPartOptions::Head(_) => Some(GeneratorFamily::Head),
            BodyPartOptions::Nose(_) => Some(GeneratorFamily::Nose),
            BodyPartOptions::Tail(_) => Some(GeneratorFamily::Tail),
            BodyPartOptions::Ear(_) => Some(GeneratorFamily::Ear),
            BodyPartOptions::Limb(_) => Some(GeneratorFamily::Limb),
            BodyPartOptions::Raw(_) => None,
        }
    }

    /// Radial segment count, falling back to the shape's default.
    pub fn sides(&self) -> Option<i64> {
        match self {
            BodyPartOptions::Torso(o) => Some(o.sides.unwrap_or(28)),
            BodyPartOptions::Neck(o) => Some(o.sides.unwrap_or(18)),
            BodyPartOptions::Head(o) => Some(o.sides.unwrap_or(22)),
            BodyPartOptions::Nose(o) => Some(o.sides.unwrap_or(16)),
            BodyPartOptions::Tail(o) => Some(o.sides.unwrap_or(14)),
            BodyPartOptions::Ear(o) => Some(o.sides.unwrap_or(16)),
            BodyPartOptions::Limb(o) => Some(o.sides.unwrap_or(16)),
            BodyPartOptions::Raw(map) => map.get("sides").and_then(Value::as_i64),
        }
    }

    /// Chain names listed under `additionalChains`.
    ///
    /// Only raw records carry this key; non-string entries are skipped here
    /// and reported by field validation.
    pub fn additional_chains(&self) -> Vec<&str> {
        match self {
            BodyPartOptions::Raw(map) => map
                .get("additionalChains")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Returns the options as a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Returns true if no option key is set.
    pub fn is_empty(&self) -> bool {
        self.to_map().is_empty()
    }
}

impl<'de> Deserialize<'de> for BodyPartOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(BodyPartOptions::from_map(map))
    }
}
