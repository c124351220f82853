use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::models::{DateInterval, PeriodError, PeriodQuery, PeriodSelector};

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

impl PeriodSelector {
    /// Build a selector from the three-way query. Empty `date` values count as absent.
    pub fn from_query(query: &PeriodQuery) -> Result<Self, PeriodError> {
        let date = query.date.as_deref().map(str::trim).filter(|d| !d.is_empty());

        match (date, query.year, query.month) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(PeriodError::Conflicting(
                "date cannot be combined with year or month",
            )),
            (Some(raw), None, None) => {
                let date = parse_wall_clock(raw)
                    .map(|dt| dt.date())
                    .ok_or_else(|| PeriodError::InvalidDate(raw.to_string()))?;
                Self::day(date)
            }
            (None, Some(year), Some(month)) => Self::month(year, month),
            (None, Some(year), None) => Self::year(year),
            (None, None, Some(_)) => Err(PeriodError::Conflicting("month requires a year")),
            (None, None, None) => Err(PeriodError::Missing),
        }
    }

    /// Like [`PeriodSelector::from_query`] but rejects the single-day variant.
    pub fn month_or_year_from_query(query: &PeriodQuery) -> Result<Self, PeriodError> {
        match Self::from_query(query) {
            Ok(PeriodSelector::Day(_)) => Err(PeriodError::DayNotAllowed),
            Err(PeriodError::Missing) => Err(PeriodError::DayNotAllowed),
            other => other,
        }
    }

    pub fn day(date: NaiveDate) -> Result<Self, PeriodError> {
        check_year(chrono::Datelike::year(&date))?;
        Ok(PeriodSelector::Day(date))
    }

    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(PeriodSelector::Month { year, month })
    }

    pub fn year(year: i32) -> Result<Self, PeriodError> {
        check_year(year)?;
        Ok(PeriodSelector::Year(year))
    }

    /// Resolve the selector to its `[start, end)` window.
    pub fn interval(&self) -> Result<DateInterval, PeriodError> {
        let (start, end) = match *self {
            PeriodSelector::Day(date) => {
                let next = date
                    .succ_opt()
                    .ok_or_else(|| PeriodError::InvalidDate(date.to_string()))?;
                (date, next)
            }
            PeriodSelector::Month { year, month } => {
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                (
                    first_of_month(year, month)?,
                    first_of_month(next_year, next_month)?,
                )
            }
            PeriodSelector::Year(year) => (first_of_month(year, 1)?, first_of_month(year + 1, 1)?),
        };

        Ok(DateInterval {
            start: start.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN),
        })
    }
}

fn check_year(year: i32) -> Result<(), PeriodError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(PeriodError::YearOutOfRange(year))
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::YearOutOfRange(year))
}

/// Parse a user-supplied timestamp into wall-clock time.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339.
/// An explicit offset is dropped after reading, keeping the caller's local time.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
