//! Canonical column names.
//!
//! The viewer and the map collaborator look columns up by these names, so any
//! change here is a change to the dataset contract.

/// Synthetic leading column holding the block's sensor serial.
pub const SERIAL_NUMBER: &str = "SERIAL_NUMBER";
/// Combined date and time of the reading.
pub const ACTIVITY_DATE_TIME: &str = "Activity_Date_Time";
/// Calendar day of the reading.
pub const ACTIVITY_DATE: &str = "Activity_Date";
pub const SITE_NAME: &str = "SITE_NAME";
pub const FILE_NAME: &str = "FILE_NAME";

/// Assembled columns kept as text, so site codes like `007` keep their zeros.
pub const TEXT_HEADERS: &[&str] = &[SERIAL_NUMBER, "SITE NAME", "FILE NAME"];

/// Intermediate names produced by the renamer and dropped after derivation.
pub const DATE: &str = "Date";
pub const TIME: &str = "Time";

pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
/// Legacy coordinate names.
pub const LAT: &str = "Lat";
pub const LONG: &str = "Long";

/// Substring identifying the raw latitude column.
pub const LATITUDE_TOKEN: &str = "LATITUDE";
/// Substring identifying the raw longitude column.
pub const LONGITUDE_TOKEN: &str = "LONGITUDE";
pub const TIME_PREFIX: &str = "TIME ";
pub const DATE_PREFIX: &str = "DATE ";

/// Column signature that identifies a block header line.
pub const HEADER_SIGNATURE: &str = "TIME (HH:MM:SS)";

pub const DEPTH_M: &str = "DEPTH_M";

/// Sensor readings shown on map hover, after renaming.
pub const HOVER_READINGS: &[&str] = &[
    "TEMP_°C",
    "ODO_%_SAT",
    "ODO_MG/L",
    "TURBIDITY_FNU",
    "SAL_PSU",
    "PH",
];
