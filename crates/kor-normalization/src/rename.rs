//! Canonical column naming.

use std::collections::HashMap;

use kor_model::NormalizeOptions;
use kor_model::columns::{DATE, DATE_PREFIX, LATITUDE_TOKEN, LONGITUDE_TOKEN, TIME, TIME_PREFIX};

use crate::error::{NormalizationError, Result};

/// Maps one raw header name to its canonical name.
///
/// Coordinate columns are matched by substring, the date and time columns by
/// prefix; every other name has its spaces replaced by underscores.
pub fn canonical_name(raw: &str, options: &NormalizeOptions) -> String {
    if raw.contains(LATITUDE_TOKEN) {
        options.latitude_column().to_string()
    } else if raw.contains(LONGITUDE_TOKEN) {
        options.longitude_column().to_string()
    } else if raw.starts_with(TIME_PREFIX) {
        TIME.to_string()
    } else if raw.starts_with(DATE_PREFIX) {
        DATE.to_string()
    } else {
        raw.replace(' ', "_")
    }
}

/// Canonical names for a header, rejecting collisions.
///
/// Only the first column matching a coordinate, date or time rule takes the
/// canonical name; later matches keep their underscored raw name. Exports
/// carry `TIME (FRACT. SEC)` next to `TIME (HH:MM:SS)`, for instance.
pub fn canonical_names<'a, I>(raw: I, options: &NormalizeOptions) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut origin: HashMap<String, &'a str> = HashMap::new();
    let mut out = Vec::new();
    for name in raw {
        let mut target = canonical_name(name, options);
        if origin.contains_key(&target) {
            target = name.replace(' ', "_");
        }
        if let Some(first) = origin.insert(target.clone(), name) {
            return Err(NormalizationError::DuplicateColumn {
                first: first.to_string(),
                second: name.to_string(),
                target,
            });
        }
        out.push(target);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kor_model::CoordinateNaming;

    #[test]
    fn test_canonical_names() {
        let options = NormalizeOptions::default();
        assert_eq!(canonical_name("GPS LATITUDE °", &options), "Latitude");
        assert_eq!(canonical_name("LONGITUDE", &options), "Longitude");
        assert_eq!(canonical_name("TIME (HH:MM:SS)", &options), "Time");
        assert_eq!(canonical_name("DATE (MM/DD/YYYY)", &options), "Date");
        assert_eq!(canonical_name("TEMP °C", &options), "TEMP_°C");
        assert_eq!(canonical_name("ODO % SAT", &options), "ODO_%_SAT");
        assert_eq!(canonical_name("SERIAL_NUMBER", &options), "SERIAL_NUMBER");
        // prefix match needs the trailing space
        assert_eq!(canonical_name("TIMESTAMP", &options), "TIMESTAMP");
    }

    #[test]
    fn test_short_coordinate_names() {
        let options = NormalizeOptions {
            coordinate_naming: CoordinateNaming::Short,
            ..NormalizeOptions::default()
        };
        assert_eq!(canonical_name("LATITUDE", &options), "Lat");
        assert_eq!(canonical_name("LONGITUDE", &options), "Long");
    }

    #[test]
    fn test_first_match_takes_canonical_name() {
        let options = NormalizeOptions::default();
        let names =
            canonical_names(["TIME (HH:MM:SS)", "TIME (FRACT. SEC)", "LATITUDE", "GPS LATITUDE"], &options)
                .unwrap();
        assert_eq!(
            names,
            vec!["Time", "TIME_(FRACT._SEC)", "Latitude", "GPS_LATITUDE"]
        );
    }

    #[test]
    fn test_collision_is_reported() {
        let options = NormalizeOptions::default();
        let err = canonical_names(["ODO MG/L", "ODO_MG/L"], &options).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::DuplicateColumn { ref target, .. } if target == "ODO_MG/L"
        ));
    }
}
