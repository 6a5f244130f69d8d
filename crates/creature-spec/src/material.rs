//! Material configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Simple PBR material definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDefinition {
    /// Base color, typically a hex string like "#7a6f63".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Roughness in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    /// Metallic factor in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metallic: Option<f64>,
    /// Specular factor in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specular: Option<f64>,
    /// Emissive color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<String>,
}

impl MaterialDefinition {
    /// Creates a material with only a base color.
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Unit-interval factors paired with their field names.
    pub fn unit_factors(&self) -> [(&'static str, Option<f64>); 3] {
        [
            ("roughness", self.roughness),
            ("metallic", self.metallic),
            ("specular", self.specular),
        ]
    }
}

/// Material configuration for an animal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<MaterialDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<MaterialDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tusk: Option<MaterialDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nail: Option<MaterialDefinition>,
    /// Additional named materials, iterated in key order.
    #[serde(default)]
    pub extra_materials: BTreeMap<String, MaterialDefinition>,
}

impl MaterialsConfig {
    /// Named slots in their fixed order.
    pub fn named_slots(&self) -> [(&'static str, Option<&MaterialDefinition>); 4] {
        [
            ("surface", self.surface.as_ref()),
            ("eye", self.eye.as_ref()),
            ("tusk", self.tusk.as_ref()),
            ("nail", self.nail.as_ref()),
        ]
    }
}
