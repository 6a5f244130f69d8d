//! CreatureStudio CLI - validate, manage and export species blueprints
//!
//! This binary wraps the blueprint store, the template catalog and the bundle
//! exporter behind one command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creature_cli::commands;
use creature_cli::commands::export::ExportSource;
use creature_cli::config::{ConfigOverrides, StudioConfig};

/// CreatureStudio - Species Blueprint Toolkit
#[derive(Parser)]
#[command(name = "creature")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Studio base directory (default: current directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Directory that receives export bundles
    #[arg(long, global = true)]
    exports_dir: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a blueprint file without writing anything
    Validate {
        /// Path to the blueprint JSON file
        #[arg(short, long)]
        blueprint: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Export a validated blueprint as a versioned bundle and archive
    ///
    /// Payload files are identical across exports of the same blueprint. The
    /// manifest records the export time, so manifest.json and the archive are
    /// byte-identical only when SOURCE_DATE_EPOCH pins that time.
    Export {
        /// Name of a blueprint in the store
        #[arg(short, long, conflicts_with = "blueprint", required_unless_present = "blueprint")]
        name: Option<String>,

        /// Path to a blueprint JSON file
        #[arg(short, long)]
        blueprint: Option<String>,

        // Top-level `--version` is not propagated to subcommands.
        /// Bundle version (e.g. 1.0.0)
        #[arg(long = "version", id = "bundle_version")]
        bundle_version: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Manage stored blueprints
    Blueprint {
        #[command(subcommand)]
        command: BlueprintCommands,
    },

    /// Work with starter templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

#[derive(Subcommand)]
enum BlueprintCommands {
    /// List valid blueprints in the store
    List {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print a stored blueprint
    Show {
        /// Blueprint name
        name: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored blueprint (protected names are refused)
    Delete {
        /// Blueprint name
        name: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a blueprint file and save it under its meta.name
    Import {
        /// Path to the blueprint JSON file
        file: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List template families and their labels
    List {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Create a new blueprint from a template
    New {
        /// Name of the new species
        #[arg(long)]
        name: String,

        /// Template label (quadruped, biped, winged, no-ped, ...)
        #[arg(long)]
        template_type: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        base_dir: cli.base_dir,
        exports_dir: cli.exports_dir,
    };

    let result = StudioConfig::from_env(&overrides).and_then(|config| match cli.command {
        Commands::Validate { blueprint, json } => commands::validate::run(&blueprint, json),
        Commands::Export {
            name,
            blueprint,
            bundle_version,
            json,
        } => {
            let source = match (name, blueprint) {
                (Some(name), _) => ExportSource::Name(name),
                (None, Some(path)) => ExportSource::File(path),
                (None, None) => {
                    return Err(anyhow::anyhow!("either --name or --blueprint is required"))
                }
            };
            commands::export::run(&config, &source, &bundle_version, json)
        }
        Commands::Blueprint { command } => match command {
            BlueprintCommands::List { json } => commands::blueprint::list(&config, json),
            BlueprintCommands::Show { name, json } => {
                commands::blueprint::show(&config, &name, json)
            }
            BlueprintCommands::Delete { name, json } => {
                commands::blueprint::delete(&config, &name, json)
            }
            BlueprintCommands::Import { file, json } => {
                commands::blueprint::import(&config, &file, json)
            }
        },
        Commands::Template { command } => match command {
            TemplateCommands::List { json } => commands::template::list(&config, json),
            TemplateCommands::New {
                name,
                template_type,
                json,
            } => commands::template::new(&config, &name, &template_type, json),
        },
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_export_help_explains_reproducible_manifests() {
        let cli = Cli::command();
        let export = cli.find_subcommand("export").expect("export subcommand");
        let help = export
            .get_long_about()
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(help.contains("SOURCE_DATE_EPOCH"), "{help}");
    }

    #[test]
    fn test_cli_parses_validate() {
        let cli =
            Cli::try_parse_from(["creature", "validate", "--blueprint", "Elephant.json"]).unwrap();
        match cli.command {
            Commands::Validate { blueprint, json } => {
                assert_eq!(blueprint, "Elephant.json");
                assert!(!json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_parses_export_by_name() {
        let cli = Cli::try_parse_from([
            "creature",
            "export",
            "--name",
            "Elephant",
            "--version",
            "1.0.0",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                name,
                blueprint,
                bundle_version,
                json,
            } => {
                assert_eq!(name.as_deref(), Some("Elephant"));
                assert_eq!(blueprint, None);
                assert_eq!(bundle_version, "1.0.0");
                assert!(json);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_cli_export_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["creature", "export", "--version", "1"]).is_err());
        assert!(Cli::try_parse_from([
            "creature",
            "export",
            "--name",
            "A",
            "--blueprint",
            "a.json",
            "--version",
            "1",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "creature",
            "blueprint",
            "list",
            "--base-dir",
            "/studio",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.base_dir, Some(PathBuf::from("/studio")));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Blueprint {
                command: BlueprintCommands::List { json: false }
            }
        ));
    }

    #[test]
    fn test_cli_parses_template_new() {
        let cli = Cli::try_parse_from([
            "creature",
            "template",
            "new",
            "--name",
            "Gull",
            "--template-type",
            "winged",
        ])
        .unwrap();
        match cli.command {
            Commands::Template {
                command:
                    TemplateCommands::New {
                        name,
                        template_type,
                        json,
                    },
            } => {
                assert_eq!(name, "Gull");
                assert_eq!(template_type, "winged");
                assert!(!json);
            }
            _ => panic!("expected template new command"),
        }
    }
}
