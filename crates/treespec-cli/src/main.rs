//! Treespec CLI - Command-line interface for schema-driven item tree validation
//!
//! This is the main entry point for the Treespec CLI application, providing
//! commands for normalizing schemas, validating item documents against them
//! and inspecting validation error kinds.

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

    // The configuration carries logging settings, so it is read first
    let loaded = Config::load_with_file(cli.config.as_deref());
    let file_logging = loaded
        .as_ref()
        .map(|(config, _)| config.logging.clone())
        .unwrap_or_default();

    if let Err(e) = init_logging(&cli, &file_logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = loaded.and_then(|(config, skipped)| {
        skipped.iter().for_each(config::SkippedLayer::report);
        run(cli, config)
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            // Rejected items were already reported on stdout
            if !matches!(e, error::Error::Invalid { .. }) {
                eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            }

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = config.output_format(cli.output);
    let use_color = cli.use_color() && config.output.color.unwrap_or(true);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output),
        Commands::Normalize(args) => handlers::handle_normalize(args, &config, &mut output),
        Commands::Errors(args) => handlers::handle_errors(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args, &mut std::io::stdout()),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, file: &config::LoggingConfig) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    logging_config.merge_with_file(file, verbosity);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
