//! Result models for payroll runs and forecasts.
//!
//! All figures are held at full precision while a calculation runs. Values are
//! rounded to cents exactly once, when a report is assembled, and rounded values
//! are never summed again.

use std::ops::AddAssign;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{HoursSource, PayPeriod, PaymentType, StaffRole};

/// Rounds a monetary or hours figure to two decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::models::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to_cents(Decimal::from_str("171.35046").unwrap()), Decimal::from_str("171.35").unwrap());
/// assert_eq!(round_to_cents(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The full employment cost of one staff member for a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostResult {
    /// Pay before statutory deductions.
    pub gross_pay: Decimal,
    /// Holiday pay set aside (hourly staff only).
    pub holiday_accrual: Decimal,
    /// Employee National Insurance; affects net pay, not employer cost.
    pub employee_ni: Decimal,
    /// Employer National Insurance.
    pub employer_ni: Decimal,
    /// `gross_pay + employer_ni + holiday_accrual`.
    pub total_cost: Decimal,
}

impl CostResult {
    /// Returns a copy with every figure rounded to cents.
    pub fn rounded(&self) -> Self {
        Self {
            gross_pay: round_to_cents(self.gross_pay),
            holiday_accrual: round_to_cents(self.holiday_accrual),
            employee_ni: round_to_cents(self.employee_ni),
            employer_ni: round_to_cents(self.employer_ni),
            total_cost: round_to_cents(self.total_cost),
        }
    }
}

impl AddAssign<&CostResult> for CostResult {
    fn add_assign(&mut self, other: &CostResult) {
        self.gross_pay += other.gross_pay;
        self.holiday_accrual += other.holiday_accrual;
        self.employee_ni += other.employee_ni;
        self.employer_ni += other.employer_ni;
        self.total_cost += other.total_cost;
    }
}

/// How a staff member's cost was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// Paid hours multiplied by resolved rates.
    Hourly,
    /// Fixed monthly salary.
    Salaried,
    /// Monthly member without a salary: reported with zero cost.
    NoActiveContract,
}

/// Gross, break and paid hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// Clock or scheduled duration.
    pub gross_hours: Decimal,
    /// Unpaid break deducted.
    pub break_hours: Decimal,
    /// `max(0, gross_hours - break_hours)`.
    pub paid_hours: Decimal,
}

impl HoursBreakdown {
    /// Returns a copy with every figure rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            gross_hours: round_to_cents(self.gross_hours),
            break_hours: round_to_cents(self.break_hours),
            paid_hours: round_to_cents(self.paid_hours),
        }
    }
}

impl AddAssign<&HoursBreakdown> for HoursBreakdown {
    fn add_assign(&mut self, other: &HoursBreakdown) {
        self.gross_hours += other.gross_hours;
        self.break_hours += other.break_hours;
        self.paid_hours += other.paid_hours;
    }
}

/// One staff member's line in a payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPayrollSummary {
    /// The staff member's id.
    pub staff_id: String,
    /// Display name.
    pub name: String,
    /// Organisation role, used for visibility filtering.
    pub role: StaffRole,
    /// Hourly or monthly.
    pub payment_type: PaymentType,
    /// How the cost was determined.
    pub basis: CostBasis,
    /// Number of worked intervals in the period.
    pub interval_count: usize,
    /// Hours worked in the period (informational for salaried staff).
    pub hours: HoursBreakdown,
    /// Cost for the period.
    pub cost: CostResult,
}

/// A named group of hours and cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Group key (location id, category id or ISO date).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Paid hours attributed to the group.
    pub hours: Decimal,
    /// Employment cost attributed to the group.
    pub cost: Decimal,
}

/// Grand totals for a payroll report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Hours across all staff.
    pub hours: HoursBreakdown,
    /// Costs across all staff.
    pub cost: CostResult,
    /// Total cost of hourly staff.
    pub hourly_cost: Decimal,
    /// Total cost of salaried staff (excludes members with no active contract).
    pub salaried_cost: Decimal,
    /// Number of staff lines the totals cover.
    pub staff_count: usize,
}

/// A non-fatal condition met during a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// Collects warnings, dropping exact duplicates while keeping first-seen order.
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    warnings: Vec<AuditWarning>,
}

impl WarningLog {
    /// Records a warning unless an identical one is already present.
    pub fn push(&mut self, warning: AuditWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// Returns the collected warnings.
    pub fn into_vec(self) -> Vec<AuditWarning> {
        self.warnings
    }
}

/// The result of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// The period covered.
    pub period: PayPeriod,
    /// Which records were treated as worked time.
    pub hours_source: HoursSource,
    /// Per-staff lines. May be filtered for the viewer; totals never are.
    pub staff: Vec<StaffPayrollSummary>,
    /// Cost by location, including the unassigned bucket when non-empty.
    pub by_location: Vec<Aggregate>,
    /// Cost by shift category.
    pub by_category: Vec<Aggregate>,
    /// Cost by calendar day.
    pub by_day: Vec<Aggregate>,
    /// Grand totals over every staff member.
    pub totals: PayrollTotals,
    /// Configuration degradations met while calculating.
    pub warnings: Vec<AuditWarning>,
}

/// Hours and cost on one side of a forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastFigures {
    /// Hours.
    pub hours: Decimal,
    /// Cost.
    pub cost: Decimal,
}

/// `scheduled - contracted`, absolute and as a percentage of contracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastVariance {
    /// Hours variance.
    pub hours: Decimal,
    /// Cost variance.
    pub cost: Decimal,
    /// Hours variance as a percentage of contracted hours (0 when none contracted).
    pub hours_percent: Decimal,
    /// Cost variance as a percentage of contracted cost (0 when none contracted).
    pub cost_percent: Decimal,
}

/// Contracted versus scheduled staffing for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// The Monday-to-Sunday week forecast.
    pub week: PayPeriod,
    /// The location filter applied, if any.
    pub location_id: Option<String>,
    /// Baseline from contracts.
    pub contracted: ForecastFigures,
    /// Figures from the week's shifts.
    pub scheduled: ForecastFigures,
    /// Scheduled minus contracted.
    pub variance: ForecastVariance,
    /// Configuration degradations met while calculating.
    pub warnings: Vec<AuditWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_cost(gross: &str) -> CostResult {
        CostResult {
            gross_pay: dec(gross),
            holiday_accrual: dec("1.005"),
            employee_ni: dec("0.004"),
            employer_ni: dec("2.5"),
            total_cost: dec(gross) + dec("3.505"),
        }
    }

    #[test]
    fn test_round_to_cents_midpoint_away_from_zero() {
        assert_eq!(round_to_cents(dec("2.345")), dec("2.35"));
        assert_eq!(round_to_cents(dec("-2.345")), dec("-2.35"));
        assert_eq!(round_to_cents(dec("2.344")), dec("2.34"));
        assert_eq!(round_to_cents(dec("10")), dec("10"));
    }

    #[test]
    fn test_cost_result_rounding() {
        let rounded = sample_cost("100.004").rounded();
        assert_eq!(rounded.gross_pay, dec("100.00"));
        assert_eq!(rounded.holiday_accrual, dec("1.01"));
        assert_eq!(rounded.employee_ni, dec("0.00"));
        assert_eq!(rounded.total_cost, dec("103.51"));
    }

    #[test]
    fn test_cost_results_sum_before_rounding() {
        // Three lines of 0.004 round to 0.00 each but sum to 0.01.
        let line = CostResult {
            gross_pay: dec("0.004"),
            total_cost: dec("0.004"),
            ..Default::default()
        };
        let mut total = CostResult::default();
        for _ in 0..3 {
            total += &line;
        }

        assert_eq!(line.rounded().total_cost, dec("0.00"));
        assert_eq!(total.rounded().total_cost, dec("0.01"));
    }

    #[test]
    fn test_hours_breakdown_add_assign() {
        let mut total = HoursBreakdown::default();
        total += &HoursBreakdown {
            gross_hours: dec("8"),
            break_hours: dec("0.5"),
            paid_hours: dec("7.5"),
        };
        total += &HoursBreakdown {
            gross_hours: dec("4"),
            break_hours: dec("0"),
            paid_hours: dec("4"),
        };

        assert_eq!(total.gross_hours, dec("12"));
        assert_eq!(total.paid_hours, dec("11.5"));
    }

    #[test]
    fn test_warning_log_drops_duplicates() {
        let mut log = WarningLog::default();
        log.push(AuditWarning::new("FALLBACK_RATE_USED", "cat_x", "low"));
        log.push(AuditWarning::new("FALLBACK_RATE_USED", "cat_x", "low"));
        log.push(AuditWarning::new("UNKNOWN_STAFF", "staff_9", "medium"));

        let warnings = log.into_vec();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].code, "FALLBACK_RATE_USED");
    }

    #[test]
    fn test_cost_result_serializes_decimals_as_strings() {
        let json = serde_json::to_string(&sample_cost("100")).unwrap();
        assert!(json.contains("\"gross_pay\":\"100\""));
        assert!(json.contains("\"employer_ni\":\"2.5\""));
    }

    #[test]
    fn test_cost_basis_serialization() {
        assert_eq!(
            serde_json::to_string(&CostBasis::NoActiveContract).unwrap(),
            "\"no_active_contract\""
        );
    }
}
