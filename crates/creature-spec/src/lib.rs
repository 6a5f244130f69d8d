//! CreatureStudio Species Blueprint Library
//!
//! This crate provides types, validation, and hashing for species blueprints.
//! A blueprint is a JSON document describing a creature's control skeleton,
//! the anatomical chains that run through it, the procedural body-part
//! generators bound to those chains, materials, and behavior presets.
//!
//! # Overview
//!
//! Validation runs in two stages:
//!
//! - **Schema**: the document is parsed into a typed [`Blueprint`] and every
//!   numeric range violation is collected (`F0xx` codes).
//! - **Graph**: for documents using the V2 anatomy pipeline (`chainsV2` /
//!   `bodyPartsV2`), every chain bone must exist in the skeleton and every
//!   body part must target an existing chain (`G0xx` codes). Non-fatal
//!   findings are returned as warnings (`W0xx` codes).
//!
//! # Example
//!
//! ```
//! use creature_spec::{validate, ErrorCode};
//! use serde_json::json;
//!
//! let document = json!({
//!     "meta": {"name": "Testodon"},
//!     "bodyPlan": {"type": "quadruped"},
//!     "skeleton": {"bones": [
//!         {"name": "root", "parent": "", "position": [0, 1, 0]},
//!         {"name": "spine1", "parent": "root", "position": [0, 1.2, 0]},
//!         {"name": "head", "parent": "spine1", "position": [0, 1.5, 0.4]}
//!     ]},
//!     "chainsV2": [{"name": "spine", "bones": ["spine1", "headX"]}],
//!     "bodyPartsV2": [{"name": "head", "generator": "headGenerator", "chain": "spine"}]
//! });
//!
//! let failure = validate(&document).unwrap_err();
//! assert_eq!(failure.graph_errors[0].code, ErrorCode::ChainMissingBones);
//! assert!(failure.graph_errors[0].message.contains("headX"));
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`skeleton`]: Bones and the control skeleton
//! - [`chains`]: V2 chains and the legacy chain map
//! - [`body_parts`]: V2 body parts and the legacy body-part map
//! - [`options`]: Generator-specific body-part options
//! - [`material`]: Material definitions
//! - [`blueprint`]: The blueprint aggregate
//! - [`validation`]: Schema and graph validation
//! - [`hash`]: Canonical content hashing

pub mod blueprint;
pub mod body_parts;
pub mod chains;
pub mod error;
pub mod hash;
pub mod material;
pub mod options;
pub mod skeleton;
pub mod validation;

pub use blueprint::{
    BehaviorPresets, Blueprint, BlueprintMeta, BodyPlan, SizeProfile, Sizes, SCHEMA_VERSION,
};
pub use body_parts::{BodyPart, LegacyBodyPart, LegacyBodyParts};
pub use chains::{Chain, ChainExtension, LegacyChains, RumpExtension};
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationFailure, ValidationWarning, WarningCode,
};
pub use hash::{canonical_blueprint_hash, canonical_value_hash};
pub use material::{MaterialDefinition, MaterialsConfig};
pub use options::{
    BodyPartOptions, EarOptions, GeneratorFamily, HeadOptions, LimbOptions, NeckOptions,
    NoseOptions, TailOptions, TorsoOptions,
};
pub use skeleton::{Bone, Skeleton};
pub use validation::{validate, validate_blueprint, validate_str, ValidatedBlueprint};
