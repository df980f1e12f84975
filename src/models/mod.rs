//! Core data models for the payroll engine.
//!
//! Input records (staff, categories, locations, shifts, time entries) and the
//! result values produced from them.

mod interval;
mod organisation;
mod period;
mod report;
mod snapshot;
mod staff;

pub use interval::{IntervalSource, Shift, TimeEntry, TimeEntryStatus, WorkedInterval};
pub use organisation::{Location, ShiftCategory};
pub use period::PayPeriod;
pub use report::{
    Aggregate, AuditWarning, CostBasis, CostResult, ForecastFigures, ForecastResult,
    ForecastVariance, HoursBreakdown, PayrollReport, PayrollTotals, StaffPayrollSummary,
    WarningLog, round_to_cents,
};
pub use snapshot::{HoursSource, PayrollSnapshot};
pub use staff::{CategoryRate, PaymentType, StaffMember, StaffRole};
