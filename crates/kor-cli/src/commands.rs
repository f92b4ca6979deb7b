use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use kor_cli::blocks::{BlockListing, list_blocks};
use kor_cli::view::{InputSource, ViewOutcome, ViewRequest, load_parse_options, run_view};
use kor_model::{CoordinateNaming, ParseOptions, SentinelPolicy, TimestampPolicy};
use kor_report::DateFilter;

use crate::cli::{InputArgs, ViewArgs};

const STDIN_LABEL: &str = "<stdin>";

pub fn run_view_command(args: &ViewArgs) -> Result<ViewOutcome> {
    let mut options = parse_options(&args.input)?;
    if args.short_coordinates {
        options = options.with_coordinate_naming(CoordinateNaming::Short);
    }
    if args.keep_placeholder_serials {
        options = options.with_sentinel(SentinelPolicy::Keep);
    }
    if args.strict_timestamps {
        options = options.with_timestamp_policy(TimestampPolicy::FailOnError);
    }

    let filter = match (args.date, args.from, args.to) {
        (Some(day), _, _) => DateFilter::Single(day),
        (None, Some(start), Some(end)) => DateFilter::range(start, end)?,
        _ => DateFilter::All,
    };

    let mut request = ViewRequest::new(input_source(&args.input.input)?);
    request.options = options;
    request.filter = filter;
    request.geojson = args.geojson.clone();
    if let Some(title) = &args.title {
        request.title = title.clone();
    }
    run_view(&request)
}

pub fn run_blocks_command(args: &InputArgs) -> Result<BlockListing> {
    let options = parse_options(args)?;
    list_blocks(&input_source(&args.input)?, &options.segment)
}

fn parse_options(args: &InputArgs) -> Result<ParseOptions> {
    let mut options = match &args.options {
        Some(path) => load_parse_options(path)?,
        None => ParseOptions::default(),
    };
    if let Some((start, end)) = args.serial_fields {
        options.segment = options.segment.with_serial_fields(start..=end);
    }
    if args.header_width.is_some() {
        options.segment = options
            .segment
            .with_expected_header_width(args.header_width);
    }
    Ok(options)
}

fn input_source(path: &Path) -> Result<InputSource> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("read export from stdin")?;
        Ok(InputSource::Bytes {
            label: STDIN_LABEL.to_string(),
            bytes,
        })
    } else {
        Ok(InputSource::Path(path.to_path_buf()))
    }
}
