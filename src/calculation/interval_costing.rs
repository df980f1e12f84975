//! Prices worked intervals: rate resolution plus unpaid-break deduction.
//!
//! ## Break modes
//!
//! - **Per shift:** every interval is measured against the break rules on its own.
//! - **Per day:** a staff member's intervals on one calendar day are measured
//!   together. The day's break is charged at the day's average rate
//!   (`day gross cost / day gross hours`) and shared back across the intervals by
//!   their share of the day's gross cost. Open shifts are never grouped; they keep
//!   their own scheduled break.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BreakCalculationMode, PayrollConfig};
use crate::models::{
    AuditWarning, HoursBreakdown, IntervalSource, StaffMember, WarningLog, WorkedInterval,
};

use super::aggregation::attribute_cost;
use super::breaks::{break_minutes_for_hours, deductible_break_hours, minutes_to_hours, paid_hours};
use super::rate_resolver::{RateOverrides, RateResolver, RateSource, ResolvedRate};
use super::warnings::FALLBACK_RATE_USED;

/// Roster lookup with each member's rate overrides pre-built.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory<'a> {
    members: HashMap<&'a str, (&'a StaffMember, RateOverrides)>,
    no_overrides: RateOverrides,
}

impl<'a> StaffDirectory<'a> {
    /// Indexes a roster by staff id.
    pub fn new(staff: &'a [StaffMember]) -> Self {
        Self {
            members: staff
                .iter()
                .map(|s| (s.id.as_str(), (s, RateOverrides::for_staff(s))))
                .collect(),
            no_overrides: RateOverrides::default(),
        }
    }

    /// Returns the staff member with the given id.
    pub fn get(&self, staff_id: &str) -> Option<&'a StaffMember> {
        self.members.get(staff_id).map(|(member, _)| *member)
    }

    /// Returns the overrides for a staff member; empty for open shifts and
    /// unknown ids.
    pub fn overrides(&self, staff_id: Option<&str>) -> &RateOverrides {
        staff_id
            .and_then(|id| self.members.get(id))
            .map(|(_, overrides)| overrides)
            .unwrap_or(&self.no_overrides)
    }
}

/// A priced worked interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalCost {
    /// The record the interval came from.
    pub source: IntervalSource,
    /// Who worked it; `None` for an open shift.
    pub user_id: Option<String>,
    /// The calendar day the interval is attributed to.
    pub date: NaiveDate,
    /// Location id, if any.
    pub location_id: Option<String>,
    /// Category id, if any.
    pub category_id: Option<String>,
    /// Gross, break and paid hours.
    pub hours: HoursBreakdown,
    /// The rate the interval was priced at.
    pub rate: ResolvedRate,
    /// `gross_hours × rate`, before any break deduction.
    pub gross_cost: Decimal,
    /// Pay after the unpaid break is deducted.
    pub pay: Decimal,
}

/// Prices `intervals` under the configured break mode.
///
/// The output has one entry per input interval, in the same order.
pub fn cost_intervals(
    intervals: &[WorkedInterval],
    directory: &StaffDirectory<'_>,
    resolver: &RateResolver<'_>,
    config: &PayrollConfig,
    warnings: &mut WarningLog,
) -> Vec<IntervalCost> {
    let mut costs: Vec<IntervalCost> = intervals
        .iter()
        .map(|interval| price_gross(interval, directory, resolver, warnings))
        .collect();

    match config.break_calculation_mode {
        BreakCalculationMode::PerShift => {
            for cost in &mut costs {
                let minutes = break_minutes_for_hours(cost.hours.gross_hours, &config.break_rules);
                apply_break(cost, minutes);
            }
        }
        BreakCalculationMode::PerDay => {
            for (cost, interval) in costs.iter_mut().zip(intervals) {
                if !interval.is_assigned() {
                    apply_break(cost, Decimal::from(interval.recorded_break_minutes));
                }
            }
            for day in group_by_staff_day(&costs) {
                apply_day_break(&mut costs, &day, config);
            }
        }
    }

    costs
}

fn price_gross(
    interval: &WorkedInterval,
    directory: &StaffDirectory<'_>,
    resolver: &RateResolver<'_>,
    warnings: &mut WarningLog,
) -> IntervalCost {
    let overrides = directory.overrides(interval.user_id.as_deref());
    let rate = resolver.resolve(overrides, interval.category_id.as_deref());

    if rate.source == RateSource::Fallback {
        let subject = interval
            .category_id
            .as_deref()
            .map(|id| format!("category '{}'", id))
            .unwrap_or_else(|| "intervals without a category".to_string());
        debug!(source = %interval.source.id(), %subject, "fallback hourly rate applied");
        warnings.push(AuditWarning::new(
            FALLBACK_RATE_USED,
            format!("No hourly rate configured for {}; fallback rate applied", subject),
            "low",
        ));
    }

    let gross_hours = interval.gross_hours();
    let gross_cost = gross_hours * rate.rate;

    IntervalCost {
        source: interval.source.clone(),
        user_id: interval.user_id.clone(),
        date: interval.work_date(),
        location_id: interval.location_id.clone(),
        category_id: interval.category_id.clone(),
        hours: HoursBreakdown {
            gross_hours,
            break_hours: Decimal::ZERO,
            paid_hours: gross_hours,
        },
        rate,
        gross_cost,
        pay: gross_cost,
    }
}

fn apply_break(cost: &mut IntervalCost, break_minutes: Decimal) {
    let break_hours = deductible_break_hours(cost.hours.gross_hours, break_minutes);
    cost.hours.break_hours = break_hours;
    cost.hours.paid_hours = paid_hours(cost.hours.gross_hours, break_hours);
    cost.pay = cost.hours.paid_hours * cost.rate.rate;
}

/// Indices of assigned intervals sharing a staff member and day, first-seen order.
fn group_by_staff_day(costs: &[IntervalCost]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut index: HashMap<(&str, NaiveDate), usize> = HashMap::new();

    for (i, cost) in costs.iter().enumerate() {
        let Some(user_id) = cost.user_id.as_deref() else {
            continue;
        };
        let slot = *index.entry((user_id, cost.date)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    groups
}

fn apply_day_break(costs: &mut [IntervalCost], day: &[usize], config: &PayrollConfig) {
    let day_hours: Decimal = day.iter().map(|&i| costs[i].hours.gross_hours).sum();
    let day_gross_cost: Decimal = day.iter().map(|&i| costs[i].gross_cost).sum();

    let break_minutes = break_minutes_for_hours(day_hours, &config.break_rules);
    let break_hours = minutes_to_hours(break_minutes).min(day_hours);
    if break_hours <= Decimal::ZERO {
        return;
    }

    let average_rate = if day_hours > Decimal::ZERO {
        day_gross_cost / day_hours
    } else {
        Decimal::ZERO
    };
    let day_deduction = break_hours * average_rate;

    let weights: Vec<Decimal> = if day_gross_cost > Decimal::ZERO {
        day.iter().map(|&i| costs[i].gross_cost).collect()
    } else {
        day.iter().map(|&i| costs[i].hours.gross_hours).collect()
    };
    let break_shares = attribute_cost(break_hours, &weights);
    let deduction_shares = attribute_cost(day_deduction, &weights);

    for ((&i, interval_break), deduction) in day.iter().zip(break_shares).zip(deduction_shares) {
        let cost = &mut costs[i];
        let interval_break = interval_break.min(cost.hours.gross_hours);
        cost.hours.break_hours = interval_break;
        cost.hours.paid_hours = paid_hours(cost.hours.gross_hours, interval_break);
        cost.pay = cost.gross_cost - deduction;
    }
}
