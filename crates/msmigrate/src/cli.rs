//! Clap derive structures for the `msmigrate` CLI.
//!
//! Kept free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// msmigrate -- copy configuration between Meraki switches
#[derive(Debug, Parser)]
#[command(
    name = "msmigrate",
    version,
    about = "Copy configuration between Meraki switches via the Dashboard API",
    long_about = "Copy device attributes, tags, and switch port configuration from one\n\
        Meraki switch to another through the Dashboard API.\n\n\
        The API key is read from --api-key or MERAKI_DASHBOARD_API_KEY.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Dashboard API key (default: $MERAKI_DASHBOARD_API_KEY)
    #[arg(long, short = 'a', global = true)]
    pub api_key: Option<String>,

    /// Dashboard API base URL
    #[arg(long, env = "MSMIGRATE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "MSMIGRATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and port table (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a switch's device configuration and port list
    #[command(alias = "show")]
    Display(DisplayArgs),

    /// Copy configuration from SOURCE_SERIAL onto TARGET_SERIAL
    Migrate(MigrateArgs),

    /// Add the `undeployed` tag to a switch
    Tag(TagArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Serial of the switch to show
    #[arg(value_name = "DEVICE_SERIAL")]
    pub serial: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Switch to copy configuration from
    #[arg(value_name = "SOURCE_SERIAL")]
    pub source: String,

    /// Switch to copy configuration onto
    #[arg(value_name = "TARGET_SERIAL")]
    pub target: String,

    /// Organization id or name; enables the clone path for same-model switches
    #[arg(long = "org-id", short = 'o')]
    pub org_id: Option<String>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Refuse targets that look deployed (name equals MAC, or no `undeployed` tag)
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct TagArgs {
    /// Serial of the switch to tag
    #[arg(value_name = "DEVICE_SERIAL")]
    pub serial: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
