//! Unpaid break rule evaluation.
//!
//! Break rules form a step function from worked hours to unpaid break minutes:
//! of all rules whose `min_hours` has been reached, the one with the greatest
//! `min_hours` applies. With no qualifying rule the break is zero. Malformed
//! rules (negative fields) never qualify, so a bad configuration degrades to
//! "no break" rather than failing the calculation.

use rust_decimal::Decimal;

use crate::config::BreakRule;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Selects the rule that applies to `worked_hours`, if any.
///
/// When two well-formed rules share the same `min_hours` the first one listed
/// applies.
pub fn select_break_rule(worked_hours: Decimal, rules: &[BreakRule]) -> Option<&BreakRule> {
    let worked_hours = worked_hours.max(Decimal::ZERO);

    rules
        .iter()
        .filter(|r| r.is_well_formed() && r.min_hours <= worked_hours)
        .fold(None, |best: Option<&BreakRule>, rule| match best {
            Some(current) if current.min_hours >= rule.min_hours => Some(current),
            _ => Some(rule),
        })
}

/// Returns the unpaid break minutes earned by `worked_hours`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::break_minutes_for_hours;
/// use payroll_engine::config::BreakRule;
/// use rust_decimal::Decimal;
///
/// let rules = vec![
///     BreakRule { min_hours: Decimal::new(6, 0), break_minutes: Decimal::new(30, 0) },
///     BreakRule { min_hours: Decimal::new(8, 0), break_minutes: Decimal::new(45, 0) },
/// ];
///
/// assert_eq!(break_minutes_for_hours(Decimal::new(5, 0), &rules), Decimal::ZERO);
/// assert_eq!(break_minutes_for_hours(Decimal::new(6, 0), &rules), Decimal::new(30, 0));
/// assert_eq!(break_minutes_for_hours(Decimal::new(10, 0), &rules), Decimal::new(45, 0));
/// assert_eq!(break_minutes_for_hours(Decimal::new(10, 0), &[]), Decimal::ZERO);
/// ```
pub fn break_minutes_for_hours(worked_hours: Decimal, rules: &[BreakRule]) -> Decimal {
    select_break_rule(worked_hours, rules)
        .map(|r| r.break_minutes)
        .unwrap_or(Decimal::ZERO)
}

/// Converts minutes to hours.
pub fn minutes_to_hours(minutes: Decimal) -> Decimal {
    minutes / MINUTES_PER_HOUR
}

/// Returns the break actually deducted from an interval: never more than the
/// time worked.
pub fn deductible_break_hours(gross_hours: Decimal, break_minutes: Decimal) -> Decimal {
    minutes_to_hours(break_minutes.max(Decimal::ZERO))
        .min(gross_hours.max(Decimal::ZERO))
}

/// `max(0, gross_hours - break_hours)`.
pub fn paid_hours(gross_hours: Decimal, break_hours: Decimal) -> Decimal {
    (gross_hours - break_hours).max(Decimal::ZERO)
}
