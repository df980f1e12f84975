//! Shift, time entry and worked-interval models.
//!
//! Scheduled shifts and approved time entries both reduce to a
//! [`WorkedInterval`], the single shape the calculations operate on.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A scheduled shift, possibly unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The assigned staff member; `None` for an open shift.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The start time of the shift.
    pub start: NaiveDateTime,
    /// The end time of the shift.
    pub end: NaiveDateTime,
    /// Break minutes planned into the shift.
    #[serde(default)]
    pub scheduled_break_minutes: u32,
    /// The shift category, used for rate resolution.
    #[serde(default)]
    pub category_id: Option<String>,
    /// The location the shift is worked at.
    #[serde(default)]
    pub location_id: Option<String>,
}

/// Approval state of a time entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEntryStatus {
    /// Awaiting manager approval.
    #[default]
    Pending,
    /// Approved for payroll.
    Approved,
    /// Rejected; never paid.
    Rejected,
}

/// A clock-in/clock-out record from the timesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the time entry.
    pub id: String,
    /// The staff member who clocked in.
    pub user_id: String,
    /// Clock-in time.
    pub clock_in: NaiveDateTime,
    /// Clock-out time; `None` while the member is still clocked in.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// Break minutes recorded against the entry.
    #[serde(default)]
    pub total_break_minutes: u32,
    /// The shift category, used for rate resolution.
    #[serde(default)]
    pub category_id: Option<String>,
    /// The location the time was worked at.
    #[serde(default)]
    pub location_id: Option<String>,
    /// Approval state.
    #[serde(default)]
    pub status: TimeEntryStatus,
}

/// Identifies the record a worked interval was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalSource {
    /// A scheduled shift, by id.
    Shift(String),
    /// A time entry, by id.
    TimeEntry(String),
}

impl IntervalSource {
    /// Returns the id of the underlying record.
    pub fn id(&self) -> &str {
        match self {
            IntervalSource::Shift(id) | IntervalSource::TimeEntry(id) => id,
        }
    }
}

/// A resolved unit of worked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkedInterval {
    /// The record this interval came from.
    pub source: IntervalSource,
    /// The staff member who worked it; `None` for an open shift.
    pub user_id: Option<String>,
    /// Start of the interval.
    pub start: NaiveDateTime,
    /// End of the interval.
    pub end: NaiveDateTime,
    /// Break minutes recorded or scheduled on the source record.
    pub recorded_break_minutes: u32,
    /// The category id, if any.
    pub category_id: Option<String>,
    /// The location id, if any.
    pub location_id: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl From<&Shift> for WorkedInterval {
    fn from(shift: &Shift) -> Self {
        WorkedInterval {
            source: IntervalSource::Shift(shift.id.clone()),
            user_id: non_empty(&shift.user_id),
            start: shift.start,
            end: shift.end,
            recorded_break_minutes: shift.scheduled_break_minutes,
            category_id: non_empty(&shift.category_id),
            location_id: non_empty(&shift.location_id),
        }
    }
}

impl WorkedInterval {
    /// Resolves a time entry into a worked interval.
    ///
    /// Only approved entries that have been clocked out are worked time;
    /// anything else yields `None`.
    pub fn from_time_entry(entry: &TimeEntry) -> Option<Self> {
        if entry.status != TimeEntryStatus::Approved {
            return None;
        }
        let end = entry.clock_out?;

        Some(WorkedInterval {
            source: IntervalSource::TimeEntry(entry.id.clone()),
            user_id: Some(entry.user_id.clone()).filter(|id| !id.trim().is_empty()),
            start: entry.clock_in,
            end,
            recorded_break_minutes: entry.total_break_minutes,
            category_id: non_empty(&entry.category_id),
            location_id: non_empty(&entry.location_id),
        })
    }

    /// Gross duration in whole minutes, floored at zero.
    pub fn gross_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Gross duration in hours, floored at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{IntervalSource, WorkedInterval};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let interval = WorkedInterval {
    ///     source: IntervalSource::Shift("shift_001".to_string()),
    ///     user_id: Some("staff_001".to_string()),
    ///     start: NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end: NaiveDateTime::parse_from_str("2026-01-15 17:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     recorded_break_minutes: 0,
    ///     category_id: None,
    ///     location_id: None,
    /// };
    /// assert_eq!(interval.gross_hours(), Decimal::new(8, 0));
    /// ```
    pub fn gross_hours(&self) -> Decimal {
        Decimal::from(self.gross_minutes()) / Decimal::from(60)
    }

    /// The calendar day the interval is attributed to (the day it starts).
    pub fn work_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns true if a staff member worked (or is assigned to) the interval.
    pub fn is_assigned(&self) -> bool {
        self.user_id.is_some()
    }
}
