//! Gross pay to full employment cost.
//!
//! Hourly and monthly staff share the National Insurance formula but differ in
//! where gross pay comes from and whether holiday is accrued.

use rust_decimal::Decimal;

use crate::config::{NiBand, PayrollConfig};
use crate::models::{CostBasis, CostResult, StaffMember};

/// National Insurance on `gross_pay` for one band: `max(0, gross - threshold) × rate`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::national_insurance;
/// use payroll_engine::config::NiBand;
/// use rust_decimal::Decimal;
///
/// let employer = NiBand { threshold: Decimal::new(75833, 2), rate: Decimal::new(138, 3) };
///
/// assert_eq!(national_insurance(Decimal::new(500, 0), &employer), Decimal::ZERO);
/// assert_eq!(
///     national_insurance(Decimal::new(2000, 0), &employer).round_dp(2),
///     Decimal::new(17135, 2)
/// );
/// ```
pub fn national_insurance(gross_pay: Decimal, band: &NiBand) -> Decimal {
    (gross_pay - band.threshold).max(Decimal::ZERO) * band.rate
}

/// Holiday pay set aside for hourly gross pay.
pub fn holiday_accrual(gross_pay: Decimal, ratio: Decimal) -> Decimal {
    gross_pay * ratio
}

fn assemble(gross_pay: Decimal, holiday_accrual: Decimal, config: &PayrollConfig) -> CostResult {
    let employee_ni = national_insurance(gross_pay, &config.national_insurance.employee);
    let employer_ni = national_insurance(gross_pay, &config.national_insurance.employer);

    CostResult {
        gross_pay,
        holiday_accrual,
        employee_ni,
        employer_ni,
        total_cost: gross_pay + employer_ni + holiday_accrual,
    }
}

/// Cost of an hourly member whose priced, break-adjusted pay sums to `gross_pay`.
pub fn calculate_hourly_cost(gross_pay: Decimal, config: &PayrollConfig) -> CostResult {
    assemble(
        gross_pay,
        holiday_accrual(gross_pay, config.holiday_accrual_ratio),
        config,
    )
}

/// Cost of a monthly member: the salary is gross pay whatever hours were worked.
pub fn calculate_salaried_cost(monthly_salary: Decimal, config: &PayrollConfig) -> CostResult {
    assemble(monthly_salary, Decimal::ZERO, config)
}

/// A staff member's cost together with how it was determined.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffCost {
    /// Full-precision cost figures.
    pub cost: CostResult,
    /// Which branch produced them.
    pub basis: CostBasis,
}

/// Costs one staff member for a period.
///
/// `hourly_pay` is the sum of the member's interval pay; it is ignored for
/// monthly members. A monthly member without a salary costs nothing.
pub fn calculate_staff_cost(
    staff: &StaffMember,
    hourly_pay: Decimal,
    config: &PayrollConfig,
) -> StaffCost {
    if !staff.is_salaried() {
        return StaffCost {
            cost: calculate_hourly_cost(hourly_pay, config),
            basis: CostBasis::Hourly,
        };
    }

    match staff.monthly_salary {
        Some(salary) => StaffCost {
            cost: calculate_salaried_cost(salary, config),
            basis: CostBasis::Salaried,
        },
        None => StaffCost {
            cost: CostResult::default(),
            basis: CostBasis::NoActiveContract,
        },
    }
}
