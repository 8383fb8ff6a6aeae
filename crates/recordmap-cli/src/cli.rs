//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Recordmap CLI - Convert remote records to and from local schemas
///
/// Reads remote records or local attributes as JSON, renames fields through
/// the table correspondences declared in a schema file, and prints the result.
#[derive(Parser, Debug)]
#[command(
    name = "recordmap",
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
    #[arg(short, long, global = true, env = "RECORDMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the schema definition file (overrides the configured one)
    #[arg(short, long, global = true, env = "RECORDMAP_SCHEMAS")]
    pub schemas: Option<PathBuf>,

    /// Output format for results (defaults to the configured format, then human)
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
    /// Convert remote records into local attributes
    ToLocal(ToLocalArgs),

    /// Convert local attributes into remote record payloads
    ToRemote(ToRemoteArgs),

    /// Load the schema file and report its tables and collisions
    Check(CheckArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the to-local command
#[derive(Parser, Debug)]
pub struct ToLocalArgs {
    /// Remote records file (a record, an array of records, or a list response); `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Table whose correspondence applies; pass-through when omitted
    #[arg(short, long)]
    pub table: Option<String>,

    /// List dropped fields for each record
    #[arg(long)]
    pub show_dropped: bool,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the to-remote command
#[derive(Parser, Debug)]
pub struct ToRemoteArgs {
    /// Local attributes file (an object or an array of objects); `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Table whose correspondence applies; identity mapping when omitted
    #[arg(short, long)]
    pub table: Option<String>,

    /// List dropped fields for each record
    #[arg(long)]
    pub show_dropped: bool,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Treat non-injective correspondences as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
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

impl OutputFormat {
    /// Parse a format name from configuration
    pub fn from_config_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
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
