//! sbom-compose: compose and translate SBOM documents
//!
//! Merges, grafts and converts SPDX tag-value and `CycloneDX` XML documents.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_compose::{
    cli::{self, AttachCommand, CombineCommand, CreateCommand, InputFormat},
    compose::MissingEdgePolicy,
    config::{self, file::CONFIG_FILE_NAMES, AppConfig},
    model::{BomFormat, Creator},
    pipeline::{exit_code_for, OutputSettings, OutputTarget},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-compose")]
#[command(version)]
#[command(about = "Compose and translate SBOM documents", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    2  Result failed integrity validation (--strict)
    3  Error occurred

EXAMPLES:
    # BOM for a chart from pre-computed image scans
    sbom-compose create --chart ./redis --scan-dir scans/ -f cyclonedx -O redis.xml

    # Merge several BOMs into one
    sbom-compose combine --input a.xml --input b.xml --name platform -O platform.xml

    # Hang an image BOM beneath a chart BOM
    sbom-compose attach --input chart.xml --bom image.xml -O chart-with-image.xml")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SBOM_COMPOSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Output flags shared by every composing command
#[derive(clap::Args)]
struct OutputArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum)]
    output_format: Option<BomFormat>,

    /// Output file path (JSON dump to stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Fail with exit code 2 instead of warning on integrity findings
    #[arg(long)]
    strict: bool,

    /// Creation timestamp (RFC 3339) instead of the current time
    #[arg(long, value_parser = parse_timestamp)]
    created: Option<DateTime<Utc>>,
}

/// Arguments for the `create` subcommand
#[derive(Parser)]
struct CreateArgs {
    /// Chart directory (or its Chart.yaml)
    #[arg(long, alias = "path")]
    chart: PathBuf,

    /// Scan result for an image, as IMAGE=PATH (repeatable)
    #[arg(long = "scan", value_name = "IMAGE=PATH")]
    scans: Vec<String>,

    /// Directory of scan results named after the image
    #[arg(long)]
    scan_dir: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `combine` subcommand
#[derive(Parser)]
struct CombineArgs {
    /// Input documents (repeatable, or comma separated)
    #[arg(short, long = "input", alias = "input-files", value_delimiter = ',', required = true)]
    inputs: Vec<PathBuf>,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    format: InputFormat,

    /// Name of the merged document's root component
    #[arg(long)]
    name: Option<String>,

    /// Union input dependency graphs instead of dropping them
    #[arg(long)]
    union_dependencies: bool,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `attach` subcommand
#[derive(Parser)]
struct AttachArgs {
    /// Document whose root receives the new dependency
    #[arg(short, long)]
    input: PathBuf,

    /// Document to add as a dependency
    #[arg(long)]
    bom: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    format: InputFormat,

    /// What to do when the root has no dependency edge of its own
    #[arg(long, value_enum)]
    on_missing_edge: Option<MissingEdgePolicy>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a BOM for a chart from its images and CPEs
    Create(CreateArgs),

    /// Merge several BOMs into one, deduplicating by purl/CPE
    Combine(CombineArgs),

    /// Add a BOM as a dependency of another BOM's root component
    #[command(alias = "add-as-dependency")]
    Attach(AttachArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbom-compose.yaml in the current directory
    Init,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{value}': {e}"))
}

fn output_settings(args: &OutputArgs, default_format: BomFormat, config: &AppConfig) -> OutputSettings {
    OutputSettings {
        target: OutputTarget::from_option(args.output_file.clone()),
        format: args.output_format.unwrap_or(default_format),
        strict: args.strict,
        namespace_base: config.chart.namespace_base.clone(),
    }
}

fn creators(config: &AppConfig) -> Vec<Creator> {
    let mut creators = vec![Creator::tool(config.output.tool_name.clone())];
    if let Some(org) = &config.output.organization {
        creators.push(Creator::organization(org.clone()));
    }
    creators
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    if let Err(err) = run(cli) {
        tracing::error!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    let load_config = || -> Result<AppConfig> {
        let (config, loaded_from) = config::load_config(cli.config.as_deref())?;
        if let Some(path) = loaded_from {
            tracing::debug!("Using config file {}", path.display());
        }
        Ok(config)
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Create(args) => {
            let config = load_config()?;
            let output = output_settings(&args.output, config.output.default_format, &config);
            cli::run_create(
                CreateCommand {
                    chart: args.chart,
                    scans: args.scans,
                    scan_dir: args.scan_dir,
                    chart_config: config.chart.clone(),
                    output_config: config.output.clone(),
                    created: args.output.created,
                    output,
                },
                quiet,
            )
        }

        Commands::Combine(args) => {
            let config = load_config()?;
            let output = output_settings(&args.output, config.output.default_format, &config);
            cli::run_combine(
                CombineCommand {
                    inputs: args.inputs,
                    input_format: args.format.resolve(),
                    root_name: args.name.unwrap_or_else(|| config.merge.root_name.clone()),
                    union_dependencies: args.union_dependencies || config.merge.union_dependencies,
                    creators: creators(&config),
                    created: args.output.created,
                    output_format: args.output.output_format,
                    output,
                },
                quiet,
            )
        }

        Commands::Attach(args) => {
            let config = load_config()?;
            let output = output_settings(&args.output, config.output.default_format, &config);
            cli::run_attach(
                AttachCommand {
                    root: args.input,
                    leaf: args.bom,
                    input_format: args.format.resolve(),
                    on_missing_edge: args
                        .on_missing_edge
                        .unwrap_or(config.attach.on_missing_edge),
                    output_format: args.output.output_format,
                    output,
                },
                quiet,
            )
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-compose", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("sbom-compose").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order, git root after cwd):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".sbom-compose.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}
