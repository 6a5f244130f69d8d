//! Material slot resolution.
//!
//! Turns a blueprint's material configuration into the ordered slot list the
//! renderer consumes. Slot order is fixed (surface, eye, tusk, nail, then
//! `extraMaterials` in key order) so payload checksums are reproducible.

use creature_spec::{Blueprint, MaterialDefinition};
use serde::Serialize;

/// Identifier of the node graph attached to node-workflow slots.
pub const NODE_GRAPH_ID: &str = "elephantSkinTSL";

/// Albedo tint used when the slot has no color.
pub const FALLBACK_ALBEDO: &str = "#7a6f63";

/// Roughness used when the slot has none.
pub const FALLBACK_ROUGHNESS: f64 = 0.78;

/// Displacement applied by the node graph.
pub const DISPLACEMENT: f64 = 0.02;

/// Rendering technique of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Workflow {
    #[serde(rename = "pbr")]
    Pbr,
    #[serde(rename = "node/tsl")]
    NodeTsl,
}

/// Material parameters copied from the definition; unset values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specular: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive: Option<String>,
}

impl SlotParameters {
    fn from_definition(definition: &MaterialDefinition) -> Self {
        Self {
            color: non_empty(&definition.color),
            roughness: definition.roughness,
            metallic: definition.metallic,
            specular: definition.specular,
            emissive: non_empty(&definition.emissive),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Node graph descriptor for node-workflow slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeGraph {
    pub graph: String,
    pub parameters: NodeGraphParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeGraphParameters {
    pub albedo_tint: String,
    pub roughness: f64,
    pub displacement: f64,
}

/// One normalized render-material slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSlot {
    pub slot: String,
    #[serde(rename = "type")]
    pub slot_type: String,
    pub workflow: Workflow,
    pub parameters: SlotParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_graph: Option<NodeGraph>,
    #[serde(rename = "useTSLSkin", skip_serializing_if = "is_false")]
    pub use_tsl_skin: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MaterialSlot {
    fn from_definition(name: &str, definition: &MaterialDefinition, node_workflow: bool) -> Self {
        let parameters = SlotParameters::from_definition(definition);
        let node_graph = node_workflow.then(|| NodeGraph {
            graph: NODE_GRAPH_ID.to_string(),
            parameters: NodeGraphParameters {
                albedo_tint: parameters
                    .color
                    .clone()
                    .unwrap_or_else(|| FALLBACK_ALBEDO.to_string()),
                roughness: parameters.roughness.unwrap_or(FALLBACK_ROUGHNESS),
                displacement: DISPLACEMENT,
            },
        });

        Self {
            slot: name.to_string(),
            slot_type: name.to_string(),
            workflow: if node_workflow {
                Workflow::NodeTsl
            } else {
                Workflow::Pbr
            },
            parameters,
            node_graph,
            use_tsl_skin: node_workflow,
        }
    }
}

/// Returns true if skin-like slots should use the node workflow.
///
/// The rule: the body plan declares a trunk, or the display name contains
/// "elephant" in any case.
pub fn needs_node_workflow(blueprint: &Blueprint) -> bool {
    blueprint.body_plan.has_trunk || blueprint.meta.name.to_lowercase().contains("elephant")
}

/// Resolves the blueprint's materials into ordered slots.
///
/// Eye, tusk and nail slots always stay on the PBR workflow.
pub fn resolve_material_slots(blueprint: &Blueprint) -> Vec<MaterialSlot> {
    let node = needs_node_workflow(blueprint);
    let materials = &blueprint.materials;

    let named = materials
        .named_slots()
        .into_iter()
        .filter_map(|(name, definition)| {
            definition.map(|d| MaterialSlot::from_definition(name, d, node && name == "surface"))
        });
    let extra = materials
        .extra_materials
        .iter()
        .map(|(name, definition)| MaterialSlot::from_definition(name, definition, node));

    named.chain(extra).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn blueprint(name: &str, has_trunk: bool) -> Blueprint {
        let mut bp = Blueprint::new(name, "quadruped");
        bp.body_plan.has_trunk = has_trunk;
        bp.materials.surface = Some(MaterialDefinition::with_color("#7a6f63"));
        bp.materials.eye = Some(MaterialDefinition::with_color("#111111"));
        bp.materials
            .extra_materials
            .insert("wrinkle".to_string(), MaterialDefinition::default());
        bp.materials
            .extra_materials
            .insert("hide".to_string(), MaterialDefinition::default());
        bp
    }

    #[test]
    fn test_node_workflow_predicate() {
        assert!(needs_node_workflow(&blueprint("Mammoth", true)));
        assert!(needs_node_workflow(&blueprint("Pygmy ELEPHANT", false)));
        assert!(!needs_node_workflow(&blueprint("Giraffe", false)));
    }

    #[test]
    fn test_slot_order_is_fixed() {
        let slots = resolve_material_slots(&blueprint("Giraffe", false));
        let names: Vec<&str> = slots.iter().map(|s| s.slot.as_str()).collect();
        assert_eq!(names, vec!["surface", "eye", "hide", "wrinkle"]);
    }

    #[test]
    fn test_trunk_upgrades_surface_and_extras_only() {
        let slots = resolve_material_slots(&blueprint("Mammoth", true));
        let workflows: Vec<Workflow> = slots.iter().map(|s| s.workflow).collect();
        assert_eq!(
            workflows,
            vec![Workflow::NodeTsl, Workflow::Pbr, Workflow::NodeTsl, Workflow::NodeTsl]
        );
        assert!(slots[1].node_graph.is_none());
        assert!(!slots[1].use_tsl_skin);

        // Extras without color or roughness fall back.
        let graph = slots[2].node_graph.as_ref().unwrap();
        assert_eq!(graph.parameters.albedo_tint, FALLBACK_ALBEDO);
        assert_eq!(graph.parameters.roughness, FALLBACK_ROUGHNESS);
    }

    #[test]
    fn test_slot_serialization() {
        let mut bp = blueprint("Elephant", false);
        bp.materials.surface = Some(MaterialDefinition {
            color: Some("#6b625a".to_string()),
            roughness: Some(0.9),
            emissive: Some(String::new()),
            ..MaterialDefinition::default()
        });
        let slots = resolve_material_slots(&bp);
        assert_eq!(
            serde_json::to_value(&slots[0]).unwrap(),
            json!({
                "slot": "surface",
                "type": "surface",
                "workflow": "node/tsl",
                "parameters": {"color": "#6b625a", "roughness": 0.9},
                "nodeGraph": {
                    "graph": "elephantSkinTSL",
                    "parameters": {"albedoTint": "#6b625a", "roughness": 0.9, "displacement": 0.02}
                },
                "useTSLSkin": true
            })
        );
        assert_eq!(
            serde_json::to_value(&slots[1]).unwrap(),
            json!({
                "slot": "eye",
                "type": "eye",
                "workflow": "pbr",
                "parameters": {"color": "#111111"}
            })
        );
    }
}
