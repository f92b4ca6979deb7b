//! Viewer-side reports over a clean Kor dataset.
//!
//! - [`DateFilter`]: keep one day or an inclusive range of days
//! - [`Summary`]: total readings, distinct sensors and sites, time span

mod error;
mod filter;
mod summary;

pub use error::{ReportError, Result};
pub use filter::{
    DateFilter, DateSelection, FilterStatus, apply_date_filter, date_bounds, row_dates,
};
pub use summary::{Summary, summarize};
