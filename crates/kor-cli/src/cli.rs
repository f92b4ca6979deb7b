//! CLI argument definitions for the Kor viewer.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "kor",
    version,
    about = "Kor Measurements Viewer - Inspect Kor sonde exports",
    long_about = "Parse Kor sonde measurement exports into a clean dataset.\n\n\
                  Shows summary metrics, a data preview and parse warnings, and can\n\
                  export plottable readings as GeoJSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse an export and show metrics, a preview and warnings.
    View(ViewArgs),

    /// List the measurement blocks found in an export.
    Blocks(InputArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Kor export file, or `-` to read from stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// JSON file with parse options.
    #[arg(long = "options", value_name = "PATH")]
    pub options: Option<PathBuf>,

    /// Field positions (0-based, inclusive) searched for the serial on marker lines.
    #[arg(long = "serial-fields", value_name = "START-END", value_parser = parse_field_range)]
    pub serial_fields: Option<(usize, usize)>,

    /// Only accept header lines with exactly this many fields.
    #[arg(long = "header-width", value_name = "N")]
    pub header_width: Option<usize>,
}

#[derive(Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Show a single calendar date (YYYY-MM-DD).
    #[arg(long = "date", value_name = "DATE", conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,

    /// First date of an inclusive range (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE", requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last date of an inclusive range (YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE", requires = "from")]
    pub to: Option<NaiveDate>,

    /// Name coordinate columns `Lat`/`Long` instead of `Latitude`/`Longitude`.
    #[arg(long = "short-coordinates")]
    pub short_coordinates: bool,

    /// Keep rows whose serial is the `TBD` placeholder.
    #[arg(long = "keep-placeholder-serials")]
    pub keep_placeholder_serials: bool,

    /// Fail on the first unparseable date/time instead of leaving it null.
    #[arg(long = "strict-timestamps")]
    pub strict_timestamps: bool,

    /// Map title.
    #[arg(long = "title", value_name = "TEXT")]
    pub title: Option<String>,

    /// Write plottable readings to this GeoJSON file.
    #[arg(long = "geojson", value_name = "PATH")]
    pub geojson: Option<PathBuf>,

    /// Number of preview rows to print (0 to hide the preview).
    #[arg(long = "rows", value_name = "N", default_value_t = 10)]
    pub rows: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_field_range(value: &str) -> Result<(usize, usize), String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{value}'"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start field '{start}'"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end field '{end}'"))?;
    if start > end {
        return Err(format!("start field {start} is after end field {end}"));
    }
    Ok((start, end))
}
