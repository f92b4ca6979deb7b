use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use kor_cli::blocks::BlockListing;
use kor_cli::view::{MapOutcome, ViewOutcome};
use kor_common::column_strings;
use kor_model::ParseWarning;
use kor_report::{DateFilter, FilterStatus};

pub fn print_view(outcome: &ViewOutcome, preview_rows: usize) {
    println!("Source: {}", outcome.source);
    if let Some(encoding) = outcome.report.encoding {
        println!("Encoding: {encoding}");
    }
    if let Some((first, last)) = outcome.date_bounds {
        println!("Dates: {first} to {last}");
    }
    print_filter_line(outcome);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let summary = &outcome.summary;
    table.add_row(vec![
        Cell::new("Total Measurements"),
        Cell::new(summary.total_measurements).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Unique Sensors"),
        Cell::new(summary.unique_sensors),
    ]);
    table.add_row(vec![Cell::new("Unique Sites"), Cell::new(summary.unique_sites)]);
    table.add_row(vec![
        Cell::new("First Reading"),
        optional_cell(summary.first_timestamp),
    ]);
    table.add_row(vec![
        Cell::new("Last Reading"),
        optional_cell(summary.last_timestamp),
    ]);
    table.add_row(vec![
        Cell::new("With Coordinates"),
        Cell::new(summary.with_coordinates),
    ]);
    println!("{table}");

    print_parse_counts(outcome);
    if preview_rows > 0 {
        print_preview(&outcome.data, preview_rows);
    }
    print_map(outcome.map.as_ref());
    print_warnings(&outcome.report.warnings);
}

pub fn print_blocks(listing: &BlockListing) {
    println!("Source: {}", listing.source);
    println!("Encoding: {}", listing.encoding);
    println!("Lines: {}", listing.lines);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Block"),
        header_cell("Serial"),
        header_cell("Columns"),
        header_cell("Rows"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    let mut total_rows = 0usize;
    for block in &listing.blocks {
        total_rows += block.rows;
        let status = match &block.error {
            Some(reason) => Cell::new(reason).fg(Color::Red),
            None => Cell::new("ok").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(block.index),
            Cell::new(&block.serial)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            count_cell(block.columns),
            count_cell(block.rows),
            status,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_warnings(&listing.warnings);
}

fn print_filter_line(outcome: &ViewOutcome) {
    let requested = match outcome.filter {
        DateFilter::All => return,
        DateFilter::Single(day) => day.to_string(),
        DateFilter::Range { start, end } => format!("{start} to {end}"),
    };
    match outcome.filter_status {
        FilterStatus::Applied => println!(
            "Filter: {requested} ({} of {} measurements)",
            outcome.matched, outcome.total
        ),
        FilterStatus::NoMatches => {
            eprintln!("warning: no measurements found for {requested}, showing all data");
        }
        FilterStatus::NoTimestampColumn => {
            eprintln!("warning: dataset has no timestamps, date filter ignored");
        }
        FilterStatus::Unfiltered => {}
    }
}

fn print_parse_counts(outcome: &ViewOutcome) {
    let report = &outcome.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Lines"),
        header_cell("Blocks"),
        header_cell("Assembled"),
        header_cell("Rows"),
        header_cell("Placeholder"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.lines),
        Cell::new(report.blocks_found),
        Cell::new(report.blocks_assembled),
        Cell::new(report.rows_assembled),
        count_cell(report.sentinel_rows_dropped),
        Cell::new(report.rows_out).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_preview(df: &DataFrame, limit: usize) {
    if df.height() == 0 {
        return;
    }
    let preview = df.head(Some(limit));
    let names: Vec<String> = preview
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        match column_strings(&preview, name) {
            Ok(Some(values)) => columns.push(values),
            _ => columns.push(vec![None; preview.height()]),
        }
    }

    let mut table = Table::new();
    table.set_header(names.iter().map(|name| header_cell(name)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in 0..preview.height() {
        table.add_row(
            columns
                .iter()
                .map(|values| match values.get(row).cloned().flatten() {
                    Some(value) => Cell::new(value),
                    None => dim_cell("-"),
                })
                .collect::<Vec<_>>(),
        );
    }
    println!(
        "Preview: first {} of {} measurements",
        preview.height(),
        df.height()
    );
    println!("{table}");
}

fn print_map(map: Option<&MapOutcome>) {
    match map {
        None => {}
        Some(MapOutcome::MissingColumns) => {
            eprintln!("warning: no latitude/longitude columns, map unavailable");
        }
        Some(MapOutcome::Figure { figure, written }) => {
            println!(
                "Map: {} points from {} sensors ({}, zoom {})",
                figure.points.len(),
                figure.serials.len(),
                figure.layout.style,
                figure.layout.zoom
            );
            if let Some([lat, lon]) = figure.layout.center {
                println!("Map center: {lat:.5}, {lon:.5}");
            }
            if let Some(path) = written {
                println!("GeoJSON: {}", path.display());
            }
        }
    }
}

fn print_warnings(warnings: &[ParseWarning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Detail")]);
    apply_table_style(&mut table);
    for warning in warnings {
        let kind = match warning {
            ParseWarning::MissingSerial { .. } => "Missing serial",
            ParseWarning::BlockParse { .. } => "Block dropped",
            ParseWarning::Timestamp { .. } => "Timestamp",
        };
        table.add_row(vec![
            Cell::new(kind).fg(Color::Yellow),
            Cell::new(warning.to_string()),
        ]);
    }
    eprintln!("Warnings: {}", warnings.len());
    eprintln!("{table}");
}

fn optional_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
