//! Shared utilities for the Kor viewer crates.

mod frame;

pub use frame::{column_f64, column_strings, column_timestamp_millis, format_numeric};
