use colored::Colorize;
use creature_spec::{ValidationError, ValidationWarning};

/// Prints validation errors and warnings in the colored console format.
pub(crate) fn print_diagnostics(errors: &[&ValidationError], warnings: &[ValidationWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                location(error.path.as_deref()).dimmed(),
                error.message
            );
        }
    }

    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in warnings {
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                location(warning.path.as_deref()).dimmed(),
                warning.message
            );
        }
    }
}

fn location(path: Option<&str>) -> String {
    path.map(|p| format!(" at {}", p)).unwrap_or_default()
}
