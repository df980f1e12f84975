//! Calculation logic for the payroll engine.
//!
//! This module contains rate resolution, unpaid break rules, interval pricing
//! under both break modes, employment cost (National Insurance and holiday
//! accrual), location/category/day breakdowns, weekly forecasts, and the payroll
//! run that ties them together.

mod aggregation;
mod breaks;
mod forecast;
mod interval_costing;
mod payroll_cost;
mod payroll_run;
mod rate_resolver;
mod visibility;
pub mod warnings;

pub use aggregation::{
    AggregateBuilder, Breakdowns, CostLine, UNASSIGNED_LOCATION_KEY, UNCATEGORISED_KEY,
    aggregate, attribute_cost, round_preserving_total,
};
pub use breaks::{
    break_minutes_for_hours, deductible_break_hours, minutes_to_hours, paid_hours,
    select_break_rule,
};
pub use forecast::{WEEKS_PER_MONTH, forecast_week, variance_percent};
pub use interval_costing::{IntervalCost, StaffDirectory, cost_intervals};
pub use payroll_cost::{
    StaffCost, calculate_hourly_cost, calculate_salaried_cost, calculate_staff_cost,
    holiday_accrual, national_insurance,
};
pub use payroll_run::run_payroll;
pub use rate_resolver::{RateOverrides, RateResolver, RateSource, ResolvedRate, resolve_hourly_rate};
pub use visibility::{ViewerRole, apply_visibility};
