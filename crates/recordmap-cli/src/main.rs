//! Recordmap CLI - Command-line interface for record/schema conversion
//!
//! This is the main entry point for the recordmap CLI application, providing
//! commands for converting remote records into local attributes, converting
//! local attributes back into remote payloads, and checking schema files.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Configuration feeds logging, so load it before the subscriber exists
    let config = Config::load_with_file(cli.config.as_deref());

    // Initialize logging
    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    let result = config.and_then(|config| run(cli, config));

    // Handle the result
    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let config = config.with_schema_override(cli.schemas.clone());
    let format = config.output_format(cli.output)?;

    // Create output writer
    let mut output = OutputWriter::new(
        format,
        cli.use_color() && config.output.color,
        cli.quiet,
    );

    tracing::info!(
        verbosity = cli.verbosity_level(),
        schema_file = ?config.schema_file,
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::ToLocal(args) => handlers::handle_to_local(args, &config, &mut output),
        Commands::ToRemote(args) => handlers::handle_to_remote(args, &config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    // Create logging configuration from CLI args, config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    }

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    // Initialize the logging system
    logging::init_logging(logging_config)
}
