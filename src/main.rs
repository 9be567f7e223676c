//! Binary entry point for promptrc.
//!
//! Browses the pattern catalog, manages custom patterns and toggles, and
//! drives headless picker sessions from the command line.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stdout in main binary for CLI output
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use promptrc::cli::{self, CliContext, OutputFormat, SurfaceChoice};
use promptrc::config::PromptrcConfig;
use promptrc::models::{PatternDraft, PatternType, TypeFilter};
use promptrc::observability::{self, LoggingConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Prompt pattern library with a slash-command picker.
#[derive(Parser)]
#[command(name = "promptrc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PROMPTRC_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Path to the store file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output format: table or json.
    #[arg(short, long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List patterns, popup style.
    List {
        /// Only this type: ritual, dev-pattern or combination.
        #[arg(short = 't', long = "type")]
        pattern_type: Option<String>,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Search patterns.
    Search {
        /// The search query.
        query: String,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one pattern.
    Show {
        /// Pattern id.
        id: String,
    },

    /// Assemble a composite prompt.
    Assemble {
        /// Pattern ids, in order.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Your own context, appended last.
        #[arg(long, default_value = "")]
        context: String,
    },

    /// Manage custom patterns.
    Custom {
        #[command(subcommand)]
        action: CustomAction,
    },

    /// Flip the per-site or global switch.
    Toggle {
        #[command(subcommand)]
        target: ToggleTarget,
    },

    /// Dispatch one JSON envelope to the background handler.
    Message {
        /// Envelope, e.g. '{"action":"getPatterns"}'.
        json: String,
    },

    /// Run a keyboard shortcut command.
    Shortcut {
        /// Command id: `insert_prompt` or `toggle_extension`.
        command: String,
    },

    /// Simulate typing into a page field.
    Simulate {
        /// Keys, e.g. "/rab{down}{enter}".
        keys: String,

        /// Field type: input, textarea or contenteditable.
        #[arg(short, long, default_value = "input")]
        surface: String,

        /// Page hostname.
        #[arg(long, default_value = "chat.example.com")]
        host: String,
    },
}

/// Custom pattern subcommands.
#[derive(Subcommand)]
enum CustomAction {
    /// Add or replace a custom pattern.
    Add {
        /// Trigger text.
        #[arg(long)]
        trigger: String,

        /// Purpose.
        #[arg(long)]
        purpose: String,

        /// Explicit id.
        #[arg(long)]
        id: Option<String>,

        /// Implication.
        #[arg(long, default_value = "")]
        implication: String,

        /// Type: ritual, dev-pattern or combination.
        #[arg(short = 't', long = "type")]
        pattern_type: Option<String>,

        /// Icon glyph.
        #[arg(long)]
        icon: Option<String>,

        /// Example usage; repeatable.
        #[arg(long = "example")]
        examples: Vec<String>,
    },

    /// Remove a custom pattern.
    Remove {
        /// Pattern id.
        id: String,
    },

    /// List custom patterns.
    List,
}

/// Toggle targets.
#[derive(Subcommand)]
enum ToggleTarget {
    /// Disable or re-enable one site.
    Site {
        /// Hostname.
        hostname: String,

        /// New state.
        #[arg(long, action = clap::ArgAction::Set)]
        disabled: bool,
    },

    /// Enable or disable everywhere.
    Extension {
        /// New state.
        #[arg(long, action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command and returns its output.
fn run_command(cli: Cli, mut config: PromptrcConfig) -> Result<String> {
    if let Some(store) = cli.store {
        config = config.with_store_path(store);
    }
    let format = OutputFormat::parse(&cli.format);
    let ctx = CliContext::open(config).context("failed to open pattern store")?;

    let output = match cli.command {
        Commands::List {
            pattern_type,
            limit,
        } => cli::cmd_list(&ctx, parse_filter(pattern_type.as_deref())?, limit, format)?,

        Commands::Search { query, limit } => cli::cmd_search(&ctx, &query, limit, format)?,

        Commands::Show { id } => cli::cmd_show(&ctx, &id, format)?,

        Commands::Assemble { ids, context } => {
            let mut prompt = cli::cmd_assemble(&ctx, &ids, &context)?;
            prompt.push('\n');
            prompt
        },

        Commands::Custom { action } => run_custom(&ctx, action, format)?,

        Commands::Toggle { target } => match target {
            ToggleTarget::Site { hostname, disabled } => {
                cli::cmd_toggle_site(&ctx, &hostname, disabled)?
            },
            ToggleTarget::Extension { enabled } => cli::cmd_toggle_extension(&ctx, enabled)?,
        },

        Commands::Message { json } => {
            let mut response = cli::cmd_message(&ctx, &json)?;
            response.push('\n');
            response
        },

        Commands::Shortcut { command } => cli::cmd_shortcut(&ctx, &command)?,

        Commands::Simulate {
            keys,
            surface,
            host,
        } => {
            let Some(surface) = SurfaceChoice::parse(&surface) else {
                bail!("unknown surface: {surface}");
            };
            let steps = cli::parse_steps(&keys)?;
            let report = cli::cmd_simulate(&ctx, &host, surface, &steps)?;
            match format {
                OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => report.to_string(),
            }
        },
    };
    Ok(output)
}

fn run_custom(ctx: &CliContext, action: CustomAction, format: OutputFormat) -> Result<String> {
    let output = match action {
        CustomAction::Add {
            trigger,
            purpose,
            id,
            implication,
            pattern_type,
            icon,
            examples,
        } => {
            let pattern_type = pattern_type
                .as_deref()
                .map(|s| PatternType::parse(s).with_context(|| format!("unknown type: {s}")))
                .transpose()?;
            let draft = PatternDraft {
                id,
                trigger,
                purpose,
                implication,
                pattern_type,
                icon,
                examples,
            };
            cli::cmd_custom_add(ctx, draft)?
        },
        CustomAction::Remove { id } => cli::cmd_custom_remove(ctx, &id)?,
        CustomAction::List => cli::cmd_custom_list(ctx, format)?,
    };
    Ok(output)
}

fn parse_filter(pattern_type: Option<&str>) -> Result<TypeFilter> {
    match pattern_type {
        None => Ok(TypeFilter::All),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(TypeFilter::All),
        Some(s) => PatternType::parse(s)
            .map(TypeFilter::Only)
            .with_context(|| format!("unknown type: {s}")),
    }
}

/// Loads configuration.
fn load_config(path: Option<&Path>) -> Result<PromptrcConfig> {
    if let Some(config_path) = path {
        return PromptrcConfig::load_from_file(config_path)
            .with_context(|| format!("reading {}", config_path.display()));
    }
    Ok(PromptrcConfig::load_default())
}
