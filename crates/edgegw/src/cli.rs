//! Clap derive structures for the `edgegw` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// edgegw -- declarative edge gateway management
#[derive(Debug, Parser)]
#[command(
    name = "edgegw",
    version,
    about = "Reconcile declared edge gateways against an edge platform controller",
    long_about = "Reads a gateway declaration, creates it on the controller, waits for the\n\
        controller to make it visible, and keeps its interface list in sync.\n\n\
        The last applied declaration and lifecycle state live in a local state file.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "EDGEGW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "EDGEGW_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "EDGEGW_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EDGEGW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "EDGEGW_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EDGEGW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Local state file holding the last applied declaration
    #[arg(
        long,
        short = 's',
        env = "EDGEGW_STATE",
        default_value = "edgegw.state.json",
        global = true
    )]
    pub state: PathBuf,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what apply would do, without contacting the controller
    Plan(DeclarationArgs),

    /// Create or update the declared gateway
    Apply(ApplyArgs),

    /// Refresh and display the tracked gateway
    #[command(alias = "get")]
    Show,

    /// Start tracking a gateway that already exists on the controller
    Import(ImportArgs),

    /// Delete the tracked gateway
    #[command(alias = "rm")]
    Destroy,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Declaration Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeclarationArgs {
    /// Gateway declaration (TOML, YAML, or JSON by extension)
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub declaration: DeclarationArgs,

    /// Destroy and recreate when an immutable field changed
    #[arg(long)]
    pub allow_replace: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Name of the gateway on the controller
    pub name: String,

    #[command(flatten)]
    pub declaration: DeclarationArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
