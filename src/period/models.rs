use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fmt;
use utoipa::IntoParams;

/// Query parameters selecting an aggregation window.
/// Exactly one of `date`, `year` + `month`, or `year` must be supplied.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PeriodQuery {
    /// A single calendar day (YYYY-MM-DD)
    #[param(example = "2025-03-15")]
    pub date: Option<String>,
    /// Calendar year
    #[param(example = 2025)]
    pub year: Option<i32>,
    /// Month of the year (1-12), requires `year`
    #[param(example = 3)]
    pub month: Option<u32>,
}

/// The aggregation window requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

/// Half-open interval `[start, end)` on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateInterval {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// No selector field was supplied
    Missing,
    /// Fields were supplied that cannot be combined
    Conflicting(&'static str),
    /// The endpoint needs both `year` and `month`
    MonthRequired,
    /// The endpoint does not accept a single-day window
    DayNotAllowed,
    InvalidDate(String),
    InvalidMonth(u32),
    YearOutOfRange(i32),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::Missing => write!(f, "Provide date OR year/month OR year"),
            PeriodError::Conflicting(msg) => write!(f, "{msg}"),
            PeriodError::MonthRequired => write!(f, "year and month are required"),
            PeriodError::DayNotAllowed => write!(f, "Provide year/month OR year"),
            PeriodError::InvalidDate(raw) => write!(f, "Invalid date: {raw}"),
            PeriodError::InvalidMonth(month) => {
                write!(f, "Invalid month: {month} (expected 1-12)")
            }
            PeriodError::YearOutOfRange(year) => {
                write!(f, "Invalid year: {year} (expected 1-9999)")
            }
        }
    }
}
