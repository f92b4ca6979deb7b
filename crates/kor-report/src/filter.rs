//! Calendar-date filtering on `Activity_Date_Time`.

use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kor_common::column_timestamp_millis;
use kor_model::columns::ACTIVITY_DATE_TIME;

use crate::error::{ReportError, Result};

/// Which readings to keep, by calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    #[default]
    All,
    Single(NaiveDate),
    /// Inclusive on both ends.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    /// Builds a range filter, rejecting `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let filter = Self::Range { start, end };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Range { start, end } if start > end => {
                Err(ReportError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Single(day) => date == day,
            Self::Range { start, end } => start <= date && date <= end,
        }
    }
}

/// How a filter request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    /// No filter requested.
    Unfiltered,
    /// Filter applied and matched at least one row.
    Applied,
    /// Filter matched nothing; the full dataset is returned instead.
    NoMatches,
    /// The dataset has no timestamp column; the full dataset is returned.
    NoTimestampColumn,
}

/// Result of applying a [`DateFilter`].
#[derive(Debug, Clone)]
pub struct DateSelection {
    pub frame: DataFrame,
    pub status: FilterStatus,
    /// Rows matched by the filter.
    pub matched: usize,
    /// Rows in the unfiltered dataset.
    pub total: usize,
}

/// Calendar dates of each row; null timestamps stay `None`.
pub fn row_dates(df: &DataFrame) -> Result<Option<Vec<Option<NaiveDate>>>> {
    let Some(millis) = column_timestamp_millis(df, ACTIVITY_DATE_TIME)? else {
        return Ok(None);
    };
    Ok(Some(
        millis
            .into_iter()
            .map(|ms| {
                ms.and_then(DateTime::from_timestamp_millis)
                    .map(|ts| ts.date_naive())
            })
            .collect(),
    ))
}

/// Earliest and latest calendar date in the dataset.
pub fn date_bounds(df: &DataFrame) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let Some(dates) = row_dates(df)? else {
        return Ok(None);
    };
    let mut present = dates.into_iter().flatten();
    let Some(first) = present.next() else {
        return Ok(None);
    };
    let bounds = present.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Ok(Some(bounds))
}

/// Applies `filter`, falling back to the whole dataset when nothing matches.
pub fn apply_date_filter(df: &DataFrame, filter: &DateFilter) -> Result<DateSelection> {
    filter.validate()?;
    let total = df.height();
    let unchanged = |status| DateSelection {
        frame: df.clone(),
        status,
        matched: total,
        total,
    };

    if *filter == DateFilter::All {
        return Ok(unchanged(FilterStatus::Unfiltered));
    }
    let Some(dates) = row_dates(df)? else {
        warn!("no {ACTIVITY_DATE_TIME} column, date filter ignored");
        return Ok(unchanged(FilterStatus::NoTimestampColumn));
    };

    let keep: Vec<bool> = dates
        .iter()
        .map(|date| date.is_some_and(|d| filter.matches(d)))
        .collect();
    let matched = keep.iter().filter(|k| **k).count();
    if matched == 0 {
        warn!(?filter, "no measurements found for the selected date(s)");
        return Ok(DateSelection {
            matched: 0,
            ..unchanged(FilterStatus::NoMatches)
        });
    }

    let mask = BooleanChunked::from_slice("in_range".into(), &keep);
    let frame = df.filter(&mask)?;
    debug!(matched, total, "applied date filter");
    Ok(DateSelection {
        frame,
        status: FilterStatus::Applied,
        matched,
        total,
    })
}
