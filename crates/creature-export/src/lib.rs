//! CreatureStudio bundle export.
//!
//! This crate turns a [`ValidatedBlueprint`](creature_spec::ValidatedBlueprint)
//! into a versioned export bundle for the renderer:
//!
//! ```text
//! {exports}/{SpeciesKey}V{version}/
//!     manifest.json             checksums of every other file
//!     AnimalDefinition.json     skeleton, parts, material slots
//!     materials.json            material slots and texture table
//!     runtime.json              only with locomotion/behavior data
//!     blueprint.json            source document
//!     {SpeciesKey}Blueprint.json
//!     assets/...                optional passthrough
//! {exports}/{SpeciesKey}V{version}.zip
//! ```
//!
//! Payload bodies have sorted keys and stable slot order, so exporting the
//! same blueprint twice yields identical payload checksums.
//!
//! # Example
//!
//! ```no_run
//! use creature_export::{BundleExporter, ExportConfig};
//! use creature_spec::validate_str;
//!
//! let json = std::fs::read_to_string("ElephantBlueprint.json").unwrap();
//! let validated = validate_str(&json).unwrap();
//! let exporter = BundleExporter::new(ExportConfig::new("exports"));
//! let outcome = exporter.export(&validated, "1.0.0").unwrap();
//! println!("wrote {}", outcome.archive_path.display());
//! ```

pub mod archive;
pub mod checksum;
pub mod error;
pub mod exporter;
pub mod materials;
pub mod payload;
pub mod staging;

pub use error::{ExportError, ExportResult};
pub use exporter::{species_key, BundleExporter, ExportConfig, ExportOutcome, DEFAULT_APP_NAME};
pub use materials::{needs_node_workflow, resolve_material_slots, MaterialSlot, Workflow};
pub use payload::{CONTRACT_VERSION, MIN_ZOO_VERSION};
