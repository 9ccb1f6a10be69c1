//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Treespec CLI - Normalize schemas and validate item trees
///
/// Checks hierarchical records against declarative schemas written in JSON
/// or YAML and reports the first violation found.
#[derive(Parser, Debug)]
#[command(
    name = "treespec",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TREESPEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an item document against a schema
    Validate(ValidateArgs),

    /// Print the canonical form of a schema
    Normalize(NormalizeArgs),

    /// List validation error kinds or look one up by name or code
    Errors(ErrorsArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the schema document (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Path to the item document (JSON or YAML)
    #[arg(value_name = "ITEM")]
    pub item: PathBuf,

    /// Attribute default overrides as a JSON object, e.g. '{"maxLength": 20}'
    #[arg(long, value_name = "JSON")]
    pub attr_defaults: Option<String>,

    /// Child default overrides as a JSON object, e.g. '{"required": false}'
    #[arg(long, value_name = "JSON")]
    pub child_defaults: Option<String>,

    /// Treat the item document as a list of items
    #[arg(long)]
    pub batch: bool,

    /// Stop at the first rejected item in batch mode
    #[arg(long, requires = "batch")]
    pub fail_fast: bool,

    /// Maximum number of failures to report in batch mode (0 = unlimited)
    #[arg(long, requires = "batch", default_value = "0")]
    pub max_errors: usize,
}

/// Arguments for the normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Path to the schema document (JSON or YAML)
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Attribute default overrides as a JSON object
    #[arg(long, value_name = "JSON")]
    pub attr_defaults: Option<String>,

    /// Child default overrides as a JSON object
    #[arg(long, value_name = "JSON")]
    pub child_defaults: Option<String>,
}

/// Arguments for the errors command
#[derive(Parser, Debug)]
pub struct ErrorsArgs {
    /// Error kind name (e.g. MISSING_CHILD) or numeric code
    #[arg(value_name = "NAME|CODE")]
    pub identifier: Option<String>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
