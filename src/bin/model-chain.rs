//! Model Chain CLI
//!
//! Command-line interface for resolving, describing and linting model catalogs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use model_chain::{
    flatten_columns, lint, load_catalog, Catalog, FileStatus, ModelClass, Registry, Severity,
};

#[derive(Parser)]
#[command(name = "model-chain")]
#[command(about = "Resolve chained model fields from a catalog")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the chained fields of a model
    Resolve {
        /// Catalog file (.json, .yaml or .yml)
        catalog: PathBuf,

        /// Model class name or identifier
        #[arg(long, short)]
        model: String,

        /// Output flattened columns instead of the field tree
        #[arg(long)]
        columns: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List registered models and their declared fields
    Describe {
        /// Catalog file (.json, .yaml or .yml)
        catalog: PathBuf,

        /// Only describe this model
        #[arg(long, short)]
        model: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Lint catalog files (syntax, dropped pointers, duplicates)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            catalog,
            model,
            columns,
            output,
            pretty,
        } => run_resolve(&catalog, &model, columns, output, pretty),

        Commands::Describe {
            catalog,
            model,
            pretty,
        } => run_describe(&catalog, model.as_deref(), pretty),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_catalog(path: &Path) -> Result<(Catalog, Registry), u8> {
    let catalog = load_catalog(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    let registry = catalog.to_registry();
    Ok((catalog, registry))
}

fn find_model(catalog: &Catalog, name: &str) -> Result<ModelClass, u8> {
    catalog.find_model(name).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_resolve(
    catalog_path: &Path,
    model: &str,
    columns: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let (catalog, registry) = open_catalog(catalog_path)?;
    let class = find_model(&catalog, model)?;

    let resolved = registry.resolve(&class);
    tracing::info!(model = %class, fields = resolved.len(), "resolved");

    let json_output = if columns {
        to_json(&flatten_columns(&resolved), pretty)?
    } else {
        to_json(&resolved, pretty)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_describe(catalog_path: &Path, model: Option<&str>, pretty: bool) -> Result<(), u8> {
    let (catalog, registry) = open_catalog(catalog_path)?;

    let classes = match model {
        Some(name) => vec![find_model(&catalog, name)?],
        None => registry.models().map(|m| m.class.clone()).collect(),
    };

    let described: Vec<_> = classes
        .iter()
        .filter_map(|class| {
            let descriptor = registry.model_descriptor(class)?;
            Some(json!({
                "model": descriptor,
                "fields": registry.field_descriptors(class),
            }))
        })
        .collect();

    println!("{}", to_json(&described, pretty)?);
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    if format == "json" {
        println!("{}", to_json(&result, true)?);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
