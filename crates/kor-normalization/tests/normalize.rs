use kor_common::{column_f64, column_timestamp_millis};
use kor_model::{CoordinateNaming, NormalizeOptions};
use kor_normalization::normalize;
use polars::prelude::*;

fn frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("SERIAL_NUMBER".into(), &["S1", "S1"]),
        Column::new("DATE (MM/DD/YYYY)".into(), &["06/01/2024", "06/01/2024"]),
        Column::new("TIME (HH:MM:SS)".into(), &["09:00:00", "09:00:01"]),
        Column::new("GPS LATITUDE".into(), &[44.5f64, 44.6]),
        Column::new("GPS LONGITUDE".into(), &[-68.1f64, -68.2]),
    ])
    .expect("frame")
}

#[test]
fn short_coordinate_naming() {
    let options = NormalizeOptions {
        coordinate_naming: CoordinateNaming::Short,
        ..NormalizeOptions::default()
    };
    let out = normalize(&frame(), &options).expect("normalize");
    let lat = column_f64(&out.frame, "Lat").expect("read").expect("Lat column");
    assert_eq!(lat, vec![Some(44.5), Some(44.6)]);
    assert!(out.frame.column("Latitude").is_err());
    assert!(column_f64(&out.frame, "Long").expect("read").is_some());
}

#[test]
fn timestamps_are_milliseconds_one_second_apart() {
    let out = normalize(&frame(), &NormalizeOptions::default()).expect("normalize");
    let millis = column_timestamp_millis(&out.frame, "Activity_Date_Time")
        .expect("read")
        .expect("timestamp column");
    let first = millis[0].expect("first timestamp");
    let second = millis[1].expect("second timestamp");
    assert_eq!(second - first, 1000);
}

#[test]
fn normalize_is_repeatable() {
    let first = normalize(&frame(), &NormalizeOptions::default()).expect("first");
    let second = normalize(&frame(), &NormalizeOptions::default()).expect("second");
    assert!(first.frame.equals_missing(&second.frame));
}
