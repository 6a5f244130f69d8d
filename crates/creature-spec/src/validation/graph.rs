//! Cross-entity checks binding skeleton bones, chains and body parts.

use std::collections::BTreeSet;

use crate::blueprint::Blueprint;
use crate::error::{ErrorCode, ValidationError, ValidationWarning, WarningCode};
use crate::options::BodyPartOptions;
use crate::skeleton::duplicates;

/// Errors and warnings from the graph pass.
#[derive(Debug, Default)]
pub(crate) struct GraphReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// Runs the graph checks appropriate for the document.
///
/// Skeleton warnings apply to every document. V2 documents get the full
/// referential checks; legacy documents only get legacy-map warnings.
pub(crate) fn check_graph(blueprint: &Blueprint) -> GraphReport {
    let mut report = GraphReport::default();
    let bones = blueprint.skeleton.bone_names();

    check_skeleton_links(blueprint, &bones, &mut report);

    if blueprint.uses_v2_anatomy() {
        check_v2(blueprint, &bones, &mut report);
    } else {
        check_legacy(blueprint, &bones, &mut report);
    }
    report
}

fn check_skeleton_links(blueprint: &Blueprint, bones: &BTreeSet<&str>, report: &mut GraphReport) {
    for (i, bone) in blueprint.skeleton.bones.iter().enumerate() {
        if let Some(parent) = bone.parent_name() {
            if !bones.contains(parent) {
                report.warnings.push(ValidationWarning::with_path(
                    WarningCode::UnknownParent,
                    format!("Bone '{}' names unknown parent '{}'", bone.name, parent),
                    format!("skeleton.bones[{i}].parent"),
                ));
            }
        }
    }
    if let Some(root) = &blueprint.skeleton.root {
        if !bones.contains(root.as_str()) {
            report.warnings.push(ValidationWarning::with_path(
                WarningCode::UnknownRoot,
                format!("Skeleton root '{root}' is not a bone"),
                "skeleton.root",
            ));
        }
    }
}

fn check_v2(blueprint: &Blueprint, bones: &BTreeSet<&str>, report: &mut GraphReport) {
    let chain_names: BTreeSet<&str> = blueprint.chains_v2.iter().map(|c| c.name.as_str()).collect();

    if !blueprint.body_parts_v2.is_empty() && chain_names.is_empty() {
        report.errors.push(ValidationError::with_path(
            ErrorCode::MissingChains,
            "chainsV2 must be provided when bodyPartsV2 are defined",
            "chainsV2",
        ));
    }

    // Uniqueness
    let skeleton = &blueprint.skeleton;
    for name in skeleton.duplicate_bone_names() {
        report.errors.push(duplicate("bone", name, "skeleton.bones"));
    }
    for name in duplicates(blueprint.chains_v2.iter().map(|c| c.name.as_str())) {
        report.errors.push(duplicate("chain", name, "chainsV2"));
    }
    for name in duplicates(blueprint.body_parts_v2.iter().map(|p| p.name.as_str())) {
        report.errors.push(duplicate("body part", name, "bodyPartsV2"));
    }

    for cycle in skeleton.parent_cycles() {
        let mut trail = cycle.clone();
        if let Some(first) = cycle.first() {
            trail.push(first.clone());
        }
        report.errors.push(ValidationError::with_path(
            ErrorCode::ParentCycle,
            format!("Bone parent links form a cycle: {}", trail.join(" -> ")),
            "skeleton.bones",
        ));
    }

    // Chain -> bone
    for (i, chain) in blueprint.chains_v2.iter().enumerate() {
        let mut seen = BTreeSet::new();
        let missing: Vec<&str> = chain
            .bones
            .iter()
            .map(String::as_str)
            .filter(|bone| !bones.contains(bone) && seen.insert(*bone))
            .collect();
        if !missing.is_empty() {
            report.errors.push(ValidationError::with_path(
                ErrorCode::ChainMissingBones,
                format!(
                    "Chain '{}' references missing bones: {}",
                    chain.name,
                    missing.join(", ")
                ),
                format!("chainsV2[{i}].bones"),
            ));
        }

        if let Some(ext) = &chain.extend_to {
            for bone in ext.bones() {
                if !bones.contains(bone.as_str()) {
                    report.warnings.push(ValidationWarning::with_path(
                        WarningCode::UnknownExtensionBone,
                        format!("Chain '{}' extends to unknown bone '{}'", chain.name, bone),
                        format!("chainsV2[{i}].extendTo.bones"),
                    ));
                }
            }
        }
    }

    // Body part -> chain
    let known = if chain_names.is_empty() {
        "none".to_string()
    } else {
        chain_names.iter().copied().collect::<Vec<_>>().join(", ")
    };
    for (i, part) in blueprint.body_parts_v2.iter().enumerate() {
        if !chain_names.contains(part.chain.as_str()) {
            report.errors.push(ValidationError::with_path(
                ErrorCode::UnknownChain,
                format!(
                    "Body part '{}' targets unknown chain '{}'. Known chains: {}",
                    part.name, part.chain, known
                ),
                format!("bodyPartsV2[{i}].chain"),
            ));
        }

        for (j, extra) in part.options.additional_chains().into_iter().enumerate() {
            if !chain_names.contains(extra) {
                report.errors.push(ValidationError::with_path(
                    ErrorCode::UnknownAdditionalChains,
                    format!(
                        "Body part '{}' references unknown additional chain '{}'",
                        part.name, extra
                    ),
                    format!("bodyPartsV2[{i}].options.additionalChains[{j}]"),
                ));
            }
        }

        if let BodyPartOptions::Torso(torso) = &part.options {
            if let Some(rump) = &torso.extend_rump_to_rear_legs {
                for bone in rump.bones.iter().filter(|b| !bones.contains(b.as_str())) {
                    report.warnings.push(ValidationWarning::with_path(
                        WarningCode::UnknownExtensionBone,
                        format!("Body part '{}' extends to unknown bone '{}'", part.name, bone),
                        format!("bodyPartsV2[{i}].options.extendRumpToRearLegs.bones"),
                    ));
                }
            }
        }
    }
}

fn check_legacy(blueprint: &Blueprint, bones: &BTreeSet<&str>, report: &mut GraphReport) {
    if let Some(chains) = &blueprint.chains {
        for (name, chain_bones) in chains.iter() {
            for bone in chain_bones.iter().filter(|b| !bones.contains(b.as_str())) {
                report.warnings.push(ValidationWarning::with_path(
                    WarningCode::LegacyChainMissingBone,
                    format!("Legacy chain '{name}' names unknown bone '{bone}'"),
                    format!("chains.{name}"),
                ));
            }
        }
    }

    if let Some(parts) = &blueprint.body_parts {
        for (name, part) in parts.iter() {
            let resolved = blueprint
                .chains
                .as_ref()
                .and_then(|chains| chains.get(&part.chain))
                .is_some();
            if !resolved {
                report.warnings.push(ValidationWarning::with_path(
                    WarningCode::LegacyUnknownChain,
                    format!(
                        "Legacy body part '{}' targets empty or unknown chain '{}'",
                        name, part.chain
                    ),
                    format!("bodyParts.{name}.chain"),
                ));
            }
        }
    }
}

fn duplicate(kind: &str, name: &str, path: &str) -> ValidationError {
    ValidationError::with_path(
        ErrorCode::DuplicateName,
        format!("Duplicate {kind} name '{name}'"),
        path,
    )
}
