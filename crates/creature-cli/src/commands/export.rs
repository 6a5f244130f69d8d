//! Export command implementation
//!
//! Validates a blueprint (from the store or a file) and writes its versioned
//! bundle and archive under the exports directory.

use anyhow::{Context, Result};
use colored::Colorize;
use creature_export::{species_key, BundleExporter, ExportOutcome};
use creature_spec::{validate_str, ValidatedBlueprint, ValidationFailure};
use std::fs;
use std::process::ExitCode;

use super::json_output::{
    error_codes, export_error_to_json, store_error_to_json, validation_failure_to_json,
    validation_warning_to_json, CommandOutput, ExportResult, JsonError,
};
use super::reporting::print_diagnostics;
use crate::config::StudioConfig;
use crate::error::StoreError;
use crate::store::BlueprintStore;

/// Where the blueprint to export comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSource {
    /// A name resolved through the blueprint store.
    Name(String),
    /// A blueprint file path.
    File(String),
}

impl ExportSource {
    fn describe(&self) -> &str {
        match self {
            ExportSource::Name(name) | ExportSource::File(name) => name,
        }
    }
}

enum LoadFailure {
    Store(StoreError),
    Read(String),
    Invalid(ValidationFailure),
}

fn load(config: &StudioConfig, source: &ExportSource) -> Result<ValidatedBlueprint, LoadFailure> {
    match source {
        ExportSource::Name(name) => {
            BlueprintStore::new(&config.blueprints_dir)
                .load(name)
                .map_err(|e| match e {
                    StoreError::Invalid { failure, .. } => LoadFailure::Invalid(failure),
                    other => LoadFailure::Store(other),
                })
        }
        ExportSource::File(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| LoadFailure::Read(format!("Failed to read blueprint file {}: {}", path, e)))?;
            validate_str(&text).map_err(LoadFailure::Invalid)
        }
    }
}

/// Run the export command
///
/// # Arguments
/// * `config` - Studio directories
/// * `source` - Blueprint name or file to export
/// * `version` - Bundle version label (single path segment)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if the bundle was written, 1 otherwise
pub fn run(
    config: &StudioConfig,
    source: &ExportSource,
    version: &str,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(config, source, version)
    } else {
        run_human(config, source, version)
    }
}

fn run_human(config: &StudioConfig, source: &ExportSource, version: &str) -> Result<ExitCode> {
    println!("{} {}", "Exporting:".cyan().bold(), source.describe());

    let validated = match load(config, source) {
        Ok(validated) => validated,
        Err(LoadFailure::Invalid(failure)) => {
            print_diagnostics(&failure.iter().collect::<Vec<_>>(), &[]);
            println!(
                "\n{} Blueprint has {} error(s); nothing was exported",
                "FAILED".red().bold(),
                failure.len()
            );
            return Ok(ExitCode::from(1));
        }
        Err(LoadFailure::Store(e)) => return Err(e.into()),
        Err(LoadFailure::Read(message)) => anyhow::bail!(message),
    };

    println!("{} {}", "Species key:".dimmed(), species_key(validated.name()));
    println!("{} {}", "Version:".dimmed(), version.trim());
    print_diagnostics(&[], validated.warnings());

    let exporter = BundleExporter::new(config.export_config()?);
    let outcome = exporter
        .export(&validated, version)
        .with_context(|| format!("Failed to export '{}'", validated.name()))?;

    print_outcome(&outcome);
    println!(
        "\n{} Wrote {}",
        "SUCCESS".green().bold(),
        outcome.archive_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn print_outcome(outcome: &ExportOutcome) {
    println!("\n{} {}", "Bundle:".dimmed(), outcome.staging_dir.display());
    for (file, checksum) in &outcome.checksums {
        println!("  {} {} {}", "+".green(), file, checksum[..16].dimmed());
    }
}

fn run_json(config: &StudioConfig, source: &ExportSource, version: &str) -> Result<ExitCode> {
    let output = match load(config, source) {
        Err(LoadFailure::Invalid(failure)) => {
            CommandOutput::failure(validation_failure_to_json(&failure), vec![])
        }
        Err(LoadFailure::Store(e)) => CommandOutput::failure(store_error_to_json(&e), vec![]),
        Err(LoadFailure::Read(message)) => CommandOutput::failure(
            vec![JsonError::new(error_codes::FILE_READ, message).with_file(source.describe())],
            vec![],
        ),
        Ok(validated) => {
            let warnings = validated
                .warnings()
                .iter()
                .map(validation_warning_to_json)
                .collect();
            let exporter = BundleExporter::new(config.export_config()?);
            match exporter.export(&validated, version) {
                Ok(outcome) => CommandOutput::success(
                    ExportResult {
                        species_key: species_key(validated.name()),
                        version: version.trim().to_string(),
                        archive_path: outcome.archive_path.display().to_string(),
                        staging_dir: outcome.staging_dir.display().to_string(),
                        checksums: outcome.checksums,
                    },
                    warnings,
                ),
                Err(e) => CommandOutput::failure(vec![export_error_to_json(&e)], warnings),
            }
        }
    };

    output.print()?;
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const MOLE: &str = r#"{
        "meta": {"name": "Star Mole"},
        "bodyPlan": {"type": "quadruped"},
        "skeleton": {"bones": [
            {"name": "spine_base", "parent": "", "position": [0, 0.3, 0]},
            {"name": "head", "parent": "spine_base", "position": [0, 0.3, 0.4]}
        ]},
        "chainsV2": [{"name": "spine", "bones": ["spine_base", "head"]}],
        "bodyPartsV2": [{"name": "torso", "generator": "torsoGenerator", "chain": "spine"}]
    }"#;

    fn config(root: &Path) -> StudioConfig {
        StudioConfig::rooted_at(root)
    }

    #[test]
    fn test_export_by_name_writes_archive() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        fs::create_dir_all(&config.blueprints_dir).unwrap();
        fs::write(config.blueprints_dir.join("StarMoleBlueprint.json"), MOLE).unwrap();

        let code = run(&config, &ExportSource::Name("Star Mole".into()), "1.0.0", true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(config.exports_dir.join("StarMoleV1.0.0.zip").is_file());
        assert!(config.exports_dir.join("StarMoleV1.0.0/manifest.json").is_file());
    }

    #[test]
    fn test_export_from_file_rejects_bad_version() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let path = tmp.path().join("mole.json");
        fs::write(&path, MOLE).unwrap();

        let source = ExportSource::File(path.display().to_string());
        assert_eq!(run(&config, &source, "../1", true).unwrap(), ExitCode::from(1));
        assert!(!config.exports_dir.exists());
    }

    #[test]
    fn test_unknown_name_fails() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path());
        let source = ExportSource::Name("Nobody".into());
        assert_eq!(run(&config, &source, "1.0.0", true).unwrap(), ExitCode::from(1));
        assert!(run(&config, &source, "1.0.0", false).is_err());
    }
}
