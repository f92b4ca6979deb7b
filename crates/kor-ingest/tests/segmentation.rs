use kor_ingest::{assemble_blocks, decode_bytes, encode_utf16le_with_bom, segment_lines};
use kor_model::columns::SERIAL_NUMBER;
use kor_model::{SegmentOptions, TextEncoding};
use proptest::prelude::*;

const HEADER: &str = "DATE (MM/DD/YYYY),TIME (HH:MM:SS),SITE NAME,DEPTH M,PH";

fn marker(serial: &str) -> String {
    format!("SENSOR SERIAL NUMBER:,,,,,{serial},,")
}

fn data_row(block: usize, row: usize) -> String {
    format!("06/01/2024,09:{:02}:00,Site{block},{row},7.5", row % 60)
}

/// Builds an export with the given number of rows per block, plus noise.
fn export(rows_per_block: &[usize]) -> Vec<String> {
    let mut lines = vec![
        "sep=,".to_string(),
        "Kor Measurement File Export".to_string(),
        "FILE CREATED:,06/01/2024 12:00:00".to_string(),
    ];
    for (block, &rows) in rows_per_block.iter().enumerate() {
        lines.push(marker(&format!("SN{block}")));
        lines.push(String::new());
        lines.push(HEADER.to_string());
        for row in 0..rows {
            lines.push(data_row(block, row));
        }
        lines.push("MEAN VALUE:,,,,1.0,7.5".to_string());
        lines.push("STANDARD DEVIATION:,,,,0.1,0.2".to_string());
    }
    lines
}

fn serial_column(lines: &[String]) -> Vec<String> {
    let segmentation = segment_lines(lines, &SegmentOptions::default());
    let table = assemble_blocks(&segmentation.blocks).expect("assemble");
    if table.frame.width() == 0 {
        return Vec::new();
    }
    table
        .frame
        .column(SERIAL_NUMBER)
        .expect("serial column")
        .str()
        .expect("string serials")
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn utf16_export_segments_end_to_end() {
    let text = export(&[2, 1]).join("\r\n");
    let decoded = decode_bytes(&encode_utf16le_with_bom(&text)).expect("decode");
    assert_eq!(decoded.encoding, TextEncoding::Utf16);

    let segmentation = segment_lines(&decoded.lines, &SegmentOptions::default());
    assert_eq!(segmentation.blocks.len(), 2);
    assert_eq!(segmentation.blocks[0].rows.len(), 2);
    assert_eq!(segmentation.blocks[1].serial.as_deref(), Some("SN1"));
}

#[test]
fn serial_in_last_searched_field() {
    let lines = vec![
        "SENSOR SERIAL NUMBER:,,,,,,,SN7".to_string(),
        HEADER.to_string(),
        data_row(0, 0),
    ];
    assert_eq!(serial_column(&lines), vec!["SN7"]);
}

#[test]
fn widened_serial_range_option() {
    let lines = vec![
        "SENSOR SERIAL NUMBER:,,,,,,,,,SN9".to_string(),
        HEADER.to_string(),
        data_row(0, 0),
    ];
    let default = segment_lines(&lines, &SegmentOptions::default());
    assert!(default.blocks.is_empty());
    assert_eq!(default.warnings.len(), 1);

    let widened = segment_lines(&lines, &SegmentOptions::default().with_serial_fields(5..=9));
    assert_eq!(widened.blocks.len(), 1);
}

proptest! {
    #[test]
    fn rows_follow_nearest_marker_in_order(rows in prop::collection::vec(0usize..6, 0..6)) {
        let lines = export(&rows);
        let expected: Vec<String> = rows
            .iter()
            .enumerate()
            .flat_map(|(block, &count)| std::iter::repeat_n(format!("SN{block}"), count))
            .collect();
        prop_assert_eq!(serial_column(&lines), expected);
    }

    #[test]
    fn segmentation_is_deterministic(rows in prop::collection::vec(0usize..4, 0..5)) {
        let lines = export(&rows);
        let first = segment_lines(&lines, &SegmentOptions::default());
        let second = segment_lines(&lines, &SegmentOptions::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_noise_never_panics(lines in prop::collection::vec("[ -~]{0,40}", 0..30)) {
        let segmentation = segment_lines(&lines, &SegmentOptions::default());
        prop_assert!(segmentation.blocks.iter().all(|b| b.is_usable()));
        prop_assert!(assemble_blocks(&segmentation.blocks).is_ok());
    }
}
