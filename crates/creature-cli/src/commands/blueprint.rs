//! Blueprint store command implementations.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

use super::json_output::{
    error_codes, store_error_to_json, validation_warning_to_json, CommandOutput, JsonError,
};
use super::reporting::print_diagnostics;
use crate::config::StudioConfig;
use crate::error::StoreError;
use crate::store::{blueprint_file_name, is_protected, BlueprintStore, BlueprintSummary};

#[derive(Debug, Serialize)]
struct SavedBlueprint {
    name: String,
    path: String,
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Prints a store failure; validation failures list every error.
fn report_failure(action: &str, error: &StoreError) -> ExitCode {
    if let Some(failure) = error.validation_failure() {
        print_diagnostics(&failure.iter().collect::<Vec<_>>(), &[]);
    }
    println!("\n{} {}: {}", "FAILED".red().bold(), action, error);
    ExitCode::from(1)
}

/// `blueprint list`
pub fn list(config: &StudioConfig, json_output: bool) -> Result<ExitCode> {
    let store = BlueprintStore::new(&config.blueprints_dir);
    let summaries = store
        .list()
        .with_context(|| format!("Failed to list {}", store.dir().display()))?;

    if json_output {
        CommandOutput::<Vec<BlueprintSummary>>::success(summaries, vec![]).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Blueprints:".cyan().bold(), store.dir().display());
    if summaries.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for summary in &summaries {
        let lock = if is_protected(&summary.meta.name) {
            " [protected]".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {}{} {}",
            "-".dimmed(),
            summary.meta.name.bold(),
            lock,
            format!("v{} ({})", summary.meta.version, summary.file).dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// `blueprint show <name>`: prints the stored document.
pub fn show(config: &StudioConfig, name: &str, json_output: bool) -> Result<ExitCode> {
    let store = BlueprintStore::new(&config.blueprints_dir);
    match store.load(name) {
        Ok(validated) => {
            if json_output {
                CommandOutput::success(
                    validated.source().clone(),
                    validated.warnings().iter().map(validation_warning_to_json).collect(),
                )
                .print()?;
            } else {
                println!("{}", serde_json::to_string_pretty(validated.source())?);
                print_diagnostics(&[], validated.warnings());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if json_output => {
            CommandOutput::<()>::failure(store_error_to_json(&e), vec![]).print()?;
            Ok(ExitCode::from(1))
        }
        Err(e) => Ok(report_failure(&format!("Could not load '{}'", name), &e)),
    }
}

/// `blueprint delete <name>`
pub fn delete(config: &StudioConfig, name: &str, json_output: bool) -> Result<ExitCode> {
    let store = BlueprintStore::new(&config.blueprints_dir);
    let result = store.delete(name);

    if json_output {
        let output = match result {
            Ok(path) => CommandOutput::success(
                SavedBlueprint {
                    name: name.to_string(),
                    path: path.display().to_string(),
                },
                vec![],
            ),
            Err(e) => CommandOutput::failure(store_error_to_json(&e), vec![]),
        };
        output.print()?;
        return Ok(exit_code(output.success));
    }

    match result {
        Ok(path) => {
            println!("{} {}", "Deleted:".cyan().bold(), path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&format!("Could not delete '{}'", name), &e)),
    }
}

/// `blueprint import <file>`: validates the file and saves it under its `meta.name`.
pub fn import(config: &StudioConfig, file: &str, json_output: bool) -> Result<ExitCode> {
    let store = BlueprintStore::new(&config.blueprints_dir);
    let bytes = match fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) if json_output => {
            let error = JsonError::new(
                error_codes::FILE_READ,
                format!("Failed to read import file: {}", e),
            )
            .with_file(file);
            CommandOutput::<()>::failure(vec![error], vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read import file: {}", file));
        }
    };

    let result = store.import_bytes(&bytes);
    if json_output {
        let output = match result {
            Ok(validated) => {
                let name = validated.name().to_string();
                let path = store.dir().join(blueprint_file_name(&name));
                CommandOutput::success(
                    SavedBlueprint {
                        name,
                        path: path.display().to_string(),
                    },
                    validated.warnings().iter().map(validation_warning_to_json).collect(),
                )
            }
            Err(e) => CommandOutput::failure(store_error_to_json(&e), vec![]),
        };
        output.print()?;
        return Ok(exit_code(output.success));
    }

    println!("{} {}", "Importing:".cyan().bold(), file);
    match result {
        Ok(validated) => {
            print_diagnostics(&[], validated.warnings());
            println!(
                "\n{} Imported '{}' into {}",
                "SUCCESS".green().bold(),
                validated.name(),
                store.dir().display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure("Import rejected", &e)),
    }
}
