//! preflight-tools: instance readiness checks from the command line
//!
//! Reads an analytics backend's preflight status and reports service checks,
//! instance options and derived flags, either once or in an interactive screen.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use preflight_tools::{
    cli::{self, OutputFormat, SourceOptions, exit_codes},
    config::{AppConfig, ConfigOverrides, Validatable},
    model::PreflightMode,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "preflight-tools")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Preflight status checks for an analytics backend", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  All service checks passed
    1  At least one service check failed
    3  Error occurred

EXAMPLES:
    # Check a local instance
    preflight-tools check

    # Check a remote instance in live mode and emit JSON
    preflight-tools check --base-url https://app.example.com --mode live -o json

    # Inspect a saved response
    preflight-tools check --from-file preflight.json

    # Interactive preflight screen
    preflight-tools tui --base-url https://app.example.com")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Connection and startup arguments shared by `check` and `tui`
#[derive(Args)]
struct ConnectionArgs {
    /// Backend base URL (status is read from `<base-url>/_preflight/`)
    #[arg(long, env = "PREFLIGHT_BASE_URL")]
    base_url: Option<String>,

    /// Origin the UI is served from, compared against the reported site URL
    #[arg(long)]
    origin: Option<String>,

    /// Select a mode before the first fetch (experimentation, live)
    #[arg(long)]
    mode: Option<PreflightMode>,

    /// Apply an incoming route such as `/preflight?mode=live`
    #[arg(long)]
    route: Option<String>,

    /// Read the status from a JSON file instead of the backend
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Do not register instance properties with the telemetry sink
    #[arg(long)]
    no_telemetry: bool,
}

impl ConnectionArgs {
    /// CLI values layered over the config file.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            origin: self.origin.clone(),
            timeout_secs: self.timeout,
            telemetry_enabled: self.no_telemetry.then_some(false),
            theme: None,
        }
    }

    fn source_options(&self) -> SourceOptions {
        SourceOptions {
            from_file: self.from_file.clone(),
            mode: self.mode,
            route: self.route.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the preflight status once and report checks
    Check {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Interactive preflight screen
    Tui {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Color theme (dark, light, high-contrast)
        #[arg(long)]
        theme: Option<String>,
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
    /// Print the discovered config file
    Path,
    /// Generate an example .preflight-tools.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(exit_code) => {
            if exit_code != exit_codes::SUCCESS {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check { connection, output } => {
            let config = load_config(cli.config.as_deref(), &connection.overrides())?;
            cli::run_check(&config, &connection.source_options(), output)
        }

        Commands::Tui { connection, theme } => {
            let overrides = ConfigOverrides {
                theme,
                ..connection.overrides()
            };
            let config = load_config(cli.config.as_deref(), &overrides)?;
            cli::run_tui_command(&config, &connection.source_options())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "preflight-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = preflight_tools::config::generate_json_schema()?;
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
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let (config, loaded_from) =
                        preflight_tools::config::load_or_default(cli.config.as_deref());
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Path => {
                    match preflight_tools::config::discover_config_file(cli.config.as_deref()) {
                        Some(path) => println!("{}", path.display()),
                        None => eprintln!("No config file found."),
                    }
                }
                ConfigAction::Init => {
                    let target = std::env::current_dir()
                        .context("cannot determine current directory")?
                        .join(".preflight-tools.yaml");
                    if target.exists() {
                        anyhow::bail!(
                            "{} already exists. Remove it first to re-initialize.",
                            target.display()
                        );
                    }
                    let content = preflight_tools::config::generate_example_config();
                    std::fs::write(&target, content)
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    eprintln!("Created {}", target.display());
                }
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Load the config file, layer CLI overrides on top and validate.
fn load_config(path: Option<&std::path::Path>, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let (config, loaded_from) = AppConfig::from_file_with_overrides(path, overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        anyhow::bail!("invalid configuration: {joined}");
    }
    Ok(config)
}
