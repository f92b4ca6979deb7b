//! Kor dataset normalization.
//!
//! Converts the raw unified table into the clean dataset:
//! - **Renaming**: canonical coordinate, date and time names; spaces become underscores
//! - **Sentinel filtering**: rows with placeholder serials are dropped
//! - **Timestamps**: `Date` and `Time` combine into `Activity_Date_Time`;
//!   `Date` alone becomes the calendar-day `Activity_Date`
//! - **Typing and order**: categorical serials, string site names, fixed column order
//!
//! # Example
//!
//! ```ignore
//! use kor_model::NormalizeOptions;
//! use kor_normalization::normalize;
//!
//! let normalized = normalize(&assembled.frame, &NormalizeOptions::default())?;
//! println!("{} rows", normalized.frame.height());
//! ```

mod error;
mod executor;
mod rename;
mod timestamp;

pub use error::{NormalizationError, Result};
pub use executor::{
    NormalizedFrame, column_order, derive_activity_date, derive_timestamps, drop_sentinel_rows,
    normalize,
};
pub use rename::{canonical_name, canonical_names};
pub use timestamp::{
    DATE_FORMAT, TIMESTAMP_FORMATS, combine, parse_date, parse_timestamp, to_epoch_days, to_millis,
};
