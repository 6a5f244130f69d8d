//! Template command implementations.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::{store_error_to_json, validation_warning_to_json, CommandOutput};
use super::reporting::print_diagnostics;
use crate::config::StudioConfig;
use crate::store::{blueprint_file_name, BlueprintStore};
use crate::templates::{TemplateCatalog, TemplateEntry};

#[derive(Debug, Serialize)]
struct CreatedBlueprint {
    name: String,
    template: String,
    path: String,
}

/// `template list`
pub fn list(config: &StudioConfig, json_output: bool) -> Result<ExitCode> {
    let catalog = TemplateCatalog::new(&config.templates_dir);
    let entries = catalog.entries();

    if json_output {
        CommandOutput::<Vec<TemplateEntry>>::success(entries, vec![]).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Templates:".cyan().bold(), catalog.dir().display());
    for entry in &entries {
        let status = if entry.available {
            "ok".green()
        } else {
            "missing".red()
        };
        println!(
            "  {} {:<10} {} {}",
            "-".dimmed(),
            entry.kind.to_string().bold(),
            entry.file,
            format!("[{}] {}", status, entry.labels.join(", ")).dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// `template new --name <name> --template-type <label>`
pub fn new(config: &StudioConfig, name: &str, label: &str, json_output: bool) -> Result<ExitCode> {
    let catalog = TemplateCatalog::new(&config.templates_dir);
    let store = BlueprintStore::new(&config.blueprints_dir);
    let result = store.create_from_template(name, label, &catalog);

    if json_output {
        let output = match result {
            Ok(created) => CommandOutput::success(
                CreatedBlueprint {
                    name: created.name().to_string(),
                    template: label.trim().to_lowercase(),
                    path: store
                        .dir()
                        .join(blueprint_file_name(created.name()))
                        .display()
                        .to_string(),
                },
                created.warnings().iter().map(validation_warning_to_json).collect(),
            ),
            Err(e) => CommandOutput::failure(store_error_to_json(&e), vec![]),
        };
        output.print()?;
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    println!(
        "{} {} from {}",
        "Creating:".cyan().bold(),
        name.trim(),
        label.trim()
    );
    match result {
        Ok(created) => {
            print_diagnostics(&[], created.warnings());
            println!(
                "\n{} Wrote {}",
                "SUCCESS".green().bold(),
                store.dir().join(blueprint_file_name(created.name())).display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let Some(failure) = e.validation_failure() {
                print_diagnostics(&failure.iter().collect::<Vec<_>>(), &[]);
            }
            println!("\n{} {}", "FAILED".red().bold(), e);
            Ok(ExitCode::from(1))
        }
    }
}
