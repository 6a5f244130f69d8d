//! CreatureStudio End-to-End Test Infrastructure
//!
//! This crate provides integration tests over the public APIs:
//!
//! - Validation: field and graph diagnostics for fixture and generated blueprints
//! - Export: bundle layout, checksums, determinism and idempotent replacement
//! - Store: name resolution, protected names, imports and templates
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p creature-tests
//! cargo test -p creature-tests --test proptest_validation
//! ```

pub mod fixtures;
pub mod harness;

pub use fixtures::{elephant, headx_scenario, legacy_quadruped, load_fixture, StudioFixture};
pub use harness::{archive_entries, bundle_files, fixed_timestamp, read_json};
