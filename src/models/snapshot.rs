//! The immutable input bundle a calculation runs against.

use serde::{Deserialize, Serialize};

use super::{Location, PayPeriod, Shift, ShiftCategory, StaffMember, TimeEntry, WorkedInterval};

/// Which records count as worked time for a payroll run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursSource {
    /// Approved, clocked-out time entries (actual hours).
    #[default]
    TimeEntries,
    /// Scheduled shifts (planned labour cost).
    Shifts,
}

/// Records fetched once per request by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollSnapshot {
    /// The organisation's roster.
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    /// The organisation's shift categories.
    #[serde(default)]
    pub categories: Vec<ShiftCategory>,
    /// The organisation's locations.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Scheduled shifts for the requested range.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Time entries for the requested range.
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

impl PayrollSnapshot {
    /// Resolves the snapshot's shifts starting inside `period` into intervals.
    pub fn shift_intervals(&self, period: &PayPeriod) -> Vec<WorkedInterval> {
        self.shifts
            .iter()
            .map(WorkedInterval::from)
            .filter(|i| period.contains_date(i.work_date()))
            .collect()
    }

    /// Resolves approved time entries starting inside `period` into intervals.
    pub fn time_entry_intervals(&self, period: &PayPeriod) -> Vec<WorkedInterval> {
        self.time_entries
            .iter()
            .filter_map(WorkedInterval::from_time_entry)
            .filter(|i| period.contains_date(i.work_date()))
            .collect()
    }

    /// Resolves the intervals for `source` inside `period`, in record order.
    pub fn worked_intervals(&self, source: HoursSource, period: &PayPeriod) -> Vec<WorkedInterval> {
        match source {
            HoursSource::TimeEntries => self.time_entry_intervals(period),
            HoursSource::Shifts => self.shift_intervals(period),
        }
    }
}
