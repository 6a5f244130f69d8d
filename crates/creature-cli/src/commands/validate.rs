//! Validate command implementation
//!
//! Validates a blueprint file and prints every field and graph error.

use anyhow::{Context, Result};
use colored::Colorize;
use creature_spec::{canonical_value_hash, validate_str, ValidatedBlueprint, ValidationFailure};
use std::fs;
use std::process::ExitCode;

use super::json_output::{
    error_codes, validation_failure_to_json, validation_warning_to_json, CommandOutput, JsonError,
    ValidateResult,
};
use super::reporting::print_diagnostics;

/// Run the validate command
///
/// # Arguments
/// * `blueprint_path` - Path to the blueprint JSON file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(blueprint_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(blueprint_path)
    } else {
        run_human(blueprint_path)
    }
}

/// Validates a file's contents; the outer error is a read failure.
fn check_file(blueprint_path: &str) -> std::io::Result<Result<ValidatedBlueprint, ValidationFailure>> {
    let text = fs::read_to_string(blueprint_path)?;
    Ok(validate_str(&text))
}

fn run_human(blueprint_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), blueprint_path);

    let outcome = check_file(blueprint_path)
        .with_context(|| format!("Failed to read blueprint file: {}", blueprint_path))?;

    match outcome {
        Ok(validated) => {
            let blueprint = validated.blueprint();
            println!("{} {}", "Name:".dimmed(), blueprint.name());
            println!(
                "{} {}",
                "Anatomy:".dimmed(),
                if blueprint.uses_v2_anatomy() { "v2" } else { "legacy" }
            );
            println!(
                "{} {}",
                "Hash:".dimmed(),
                &canonical_value_hash(validated.source())[..16]
            );
            print_diagnostics(&[], validated.warnings());
            println!("\n{} Blueprint is valid", "SUCCESS".green().bold());
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            print_diagnostics(&failure.iter().collect::<Vec<_>>(), &[]);
            println!(
                "\n{} Blueprint has {} field error(s) and {} graph error(s)",
                "FAILED".red().bold(),
                failure.field_errors.len(),
                failure.graph_errors.len()
            );
            Ok(ExitCode::from(1))
        }
    }
}

fn run_json(blueprint_path: &str) -> Result<ExitCode> {
    let output = match check_file(blueprint_path) {
        Err(e) => CommandOutput::<ValidateResult>::failure(
            vec![JsonError::new(
                error_codes::FILE_READ,
                format!("Failed to read blueprint file: {}", e),
            )
            .with_file(blueprint_path)],
            vec![],
        ),
        Ok(Err(failure)) => CommandOutput::failure(validation_failure_to_json(&failure), vec![]),
        Ok(Ok(validated)) => {
            let warnings = validated
                .warnings()
                .iter()
                .map(validation_warning_to_json)
                .collect();
            let blueprint = validated.blueprint();
            let result = ValidateResult {
                name: blueprint.name().to_string(),
                v2_anatomy: blueprint.uses_v2_anatomy(),
                blueprint_hash: canonical_value_hash(validated.source()),
            };
            CommandOutput::success(result, warnings)
        }
    };

    output.print()?;
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
