use kor_core::parse_kor_bytes;
use kor_ingest::encode_utf16le_with_bom;
use kor_map::{build_map, valid_coordinates};
use kor_model::{CoordinateNaming, NormalizeOptions, ParseOptions};

const EXPORT: &str = "SENSOR SERIAL NUMBER:,,,,,S1,,\r\n\
DATE (MM/DD/YYYY),TIME (HH:MM:SS),SITE NAME,DEPTH M,TEMP °C,PH,LATITUDE,LONGITUDE\r\n\
06/01/2024,09:00:00,Dock,1.2,18.4,7.9,0,0\r\n\
06/01/2024,09:15:00,Dock,1.3,18.5,7.8,44.1,-68.2\r\n\
06/01/2024,09:30:00,Dock,1.4,18.6,7.7,44.2,\r\n";

#[test]
fn zero_coordinates_kept_in_dataset_but_not_mapped() {
    let parsed = parse_kor_bytes(&encode_utf16le_with_bom(EXPORT), &ParseOptions::default())
        .expect("parse");
    assert_eq!(parsed.data.height(), 3);

    let options = NormalizeOptions::default();
    let plottable = valid_coordinates(&parsed.data, &options).expect("filter");
    assert_eq!(plottable.height(), 1);

    let figure = build_map(&parsed.data, "Kor Measurements Map", &options).expect("map");
    assert_eq!(figure.points.len(), 1);
    let point = &figure.points[0];
    assert_eq!(point.serial, "S1");
    assert_eq!(point.row, 1);
    assert_eq!(point.hover["TEMP_°C"], serde_json::json!(18.5));
    assert_eq!(point.hover["Activity_Date_Time"], "2024-06-01 09:15:00");
}

#[test]
fn short_naming_map_and_geojson_file() {
    let options = ParseOptions::default().with_coordinate_naming(CoordinateNaming::Short);
    let parsed = parse_kor_bytes(&encode_utf16le_with_bom(EXPORT), &options).expect("parse");
    let figure = build_map(&parsed.data, "Map", &options.normalize).expect("map");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("map.geojson");
    figure.write_geojson(&path).expect("write");
    let text = std::fs::read_to_string(&path).expect("read back");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["features"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["features"][0]["properties"]["row"], 1);
}
