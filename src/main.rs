//! composite-scorer: peer-relative composite scoring for company screening.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use composite_scorer::{
    catalog::Tier,
    cli::{self, ScoringOptions},
    config::{ConfigOverrides, ConfigPreset},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "composite-scorer")]
#[command(version)]
#[command(about = "Peer-relative composite scoring for company screening", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  At least one entity scored below --min-confidence
    3  Error occurred

EXAMPLES:
    # Score a universe with the balanced preset
    composite-scorer score universe.json --tier pro

    # Rank by value and export CSV
    composite-scorer score universe.json --preset value --rank-by value -o csv -O scores.csv

    # Show how one company's scores were computed
    composite-scorer explain universe.json 42")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration flags shared by `score` and `explain`
#[derive(clap::Args)]
struct ScoringArgs {
    /// Dataset JSON file
    dataset: PathBuf,

    /// Scoring preset (value, quality, balanced); replaces the file's scoring section
    #[arg(long)]
    preset: Option<String>,

    /// Subscription tier; metrics above it are dropped from the axes
    #[arg(long)]
    tier: Option<Tier>,

    /// Only score these axes (repeatable)
    #[arg(long = "axis")]
    axes: Vec<String>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Fill missing global ranges from the dataset (for global_min_max)
    #[arg(long)]
    global_ranges_from_dataset: bool,
}

impl ScoringArgs {
    fn into_options(self, config: Option<PathBuf>, quiet: bool) -> Result<ScoringOptions> {
        let preset = match self.preset.as_deref() {
            Some(name) => Some(parse_preset(name)?),
            None => None,
        };
        Ok(ScoringOptions {
            dataset: self.dataset,
            config_path: config,
            overrides: ConfigOverrides {
                tier: self.tier,
                preset,
                axes: self.axes,
                file: self.output_file,
                ..ConfigOverrides::default()
            },
            ranges_from_dataset: self.global_ranges_from_dataset,
            quiet,
        })
    }
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreArgs {
    #[command(flatten)]
    scoring: ScoringArgs,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Order rows by rank on this axis
    #[arg(long)]
    rank_by: Option<String>,

    /// Include per-metric traces in JSON output
    #[arg(long)]
    traces: bool,

    /// Exit with code 1 if any entity's confidence is below this (0-1)
    #[arg(long)]
    min_confidence: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every entity of a dataset
    Score(ScoreArgs),

    /// Print the full scoring trace of one entity
    Explain {
        #[command(flatten)]
        scoring: ScoringArgs,

        /// Entity id to explain
        entity_id: u64,
    },

    /// List the metric catalog
    Catalog {
        /// Only metrics available at this tier
        #[arg(long)]
        tier: Option<Tier>,

        /// Output format
        #[arg(short, long, default_value = "summary")]
        output: ReportFormat,

        /// Output file path (stdout if not specified)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

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
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .composite-scorer.yaml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Score(args) => {
            let result = args
                .scoring
                .into_options(cli.config, cli.quiet)
                .and_then(|mut options| {
                    options.overrides.format = args.output;
                    options.overrides.include_traces = args.traces;
                    options.overrides.min_confidence = args.min_confidence;
                    cli::run_score(&options, args.rank_by, cli.no_color)
                });
            exit_with(result)
        }

        Commands::Explain { scoring, entity_id } => exit_with(
            scoring
                .into_options(cli.config, cli.quiet)
                .and_then(|options| cli::run_explain(&options, entity_id)),
        ),

        Commands::Catalog {
            tier,
            output,
            output_file,
        } => cli::run_catalog(tier, output, output_file),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "composite-scorer", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = composite_scorer::config::generate_json_schema()
                .context("failed to generate config schema")?;
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
                let (config, loaded_from) =
                    composite_scorer::config::resolve_config(cli.config.as_deref())
                        .context("failed to load configuration")?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    composite_scorer::config::file::user_config_dir()
                        .map(|p| p.display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in composite_scorer::config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match composite_scorer::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) if !path.exists() => {
                        eprintln!("Config file does not exist: {}", path.display());
                    }
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".composite-scorer.yaml");
                if target.exists() {
                    bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = composite_scorer::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

/// Parse a preset name, listing the valid ones on failure.
fn parse_preset(name: &str) -> Result<ConfigPreset> {
    match ConfigPreset::from_name(name) {
        Some(preset) => Ok(preset),
        None => {
            let valid: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
            bail!("Unknown preset: {name}. Valid options: {}", valid.join(", "))
        }
    }
}

/// Exit with the handler's code; errors print and exit with `ERROR`.
fn exit_with(result: Result<i32>) -> Result<()> {
    match result {
        Ok(exit_codes::SUCCESS) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}
