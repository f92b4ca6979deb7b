//! Kor Measurements Viewer CLI.

use clap::{ColorChoice, Parser};
use kor_cli::logging::{LogConfig, LogFormat, init_logging};
use kor_cli::view::is_decoding_failure;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_blocks_command, run_view_command};
use crate::summary::{print_blocks, print_view};

/// Exit code when the export parsed but yielded no measurements.
const EXIT_NO_DATA: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::View(args) => match run_view_command(&args) {
            Ok(outcome) if outcome.is_empty() => {
                eprintln!(
                    "error: no valid data found in {}. Check that it is a Kor measurement export.",
                    outcome.source
                );
                EXIT_NO_DATA
            }
            Ok(outcome) => {
                print_view(&outcome, args.rows);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Blocks(args) => match run_blocks_command(&args) {
            Ok(listing) => {
                print_blocks(&listing);
                0
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    if is_decoding_failure(error) {
        eprintln!("error: could not decode the file with any supported text encoding");
        eprintln!("hint: Kor exports are usually saved as UTF-16");
    }
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
