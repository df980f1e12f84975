//! Pay period model.
//!
//! A [`PayPeriod`] is an inclusive date range. Payroll runs over a calendar
//! month; forecasts run over a Monday-to-Sunday week.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive range of calendar days.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let january = PayPeriod::from_month("2026-01").unwrap();
/// assert_eq!(january.end_date, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
/// assert!(january.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidPeriod {
                input: format!("{}..{}", start_date, end_date),
                message: "end date is before start date".to_string(),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses a `YYYY-MM` month into the period covering that whole month.
    pub fn from_month(input: &str) -> EngineResult<Self> {
        let trimmed = input.trim();
        let invalid = |message: &str| EngineError::InvalidPeriod {
            input: input.to_string(),
            message: message.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("period is required"));
        }

        let (year, month) = trimmed
            .split_once('-')
            .filter(|(y, m)| is_digits(y, 4) && is_digits(m, 2))
            .ok_or_else(|| invalid("expected YYYY-MM"))?;
        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 01 and 12"));
        }

        let start_date =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid("year out of range"))?;
        let end_date = start_date
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| invalid("year out of range"))?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Returns the Monday-to-Sunday week containing `date`.
    pub fn week_containing(date: NaiveDate) -> EngineResult<Self> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let out_of_range = || EngineError::InvalidPeriod {
            input: date.to_string(),
            message: "week falls outside the supported calendar".to_string(),
        };

        let start_date = date.checked_sub_days(Days::new(offset)).ok_or_else(out_of_range)?;
        let end_date = start_date.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the number of days in the period.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
