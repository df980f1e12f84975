//! Configuration types for payroll calculation.
//!
//! These structures are deserialized from the organisation's `payroll.yaml`
//! and may also arrive inline with an API request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How unpaid breaks are evaluated against worked time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakCalculationMode {
    /// Each worked interval is measured against the break rules on its own.
    #[default]
    PerShift,
    /// All of a staff member's intervals on a calendar day are measured together.
    PerDay,
}

/// One step of the unpaid-break step function.
///
/// Working at least `min_hours` earns `break_minutes` of unpaid break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakRule {
    /// The worked-hours threshold at which this rule applies.
    pub min_hours: Decimal,
    /// The unpaid break, in minutes, deducted once the threshold is reached.
    pub break_minutes: Decimal,
}

impl BreakRule {
    /// Returns true when neither field is negative.
    pub fn is_well_formed(&self) -> bool {
        self.min_hours >= Decimal::ZERO && self.break_minutes >= Decimal::ZERO
    }
}

/// A single-threshold National Insurance band for one payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NiBand {
    /// Earnings in the period up to this amount attract no contribution.
    pub threshold: Decimal,
    /// The marginal rate applied above the threshold (e.g. 0.138).
    pub rate: Decimal,
}

/// National Insurance bands for both payers.
///
/// The employee and employer bands are independent and need not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalInsuranceConfig {
    /// Employee contribution band (affects net pay only).
    pub employee: NiBand,
    /// Employer contribution band (part of total employment cost).
    pub employer: NiBand,
}

/// Organisation-wide payroll configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Break evaluation mode.
    #[serde(default)]
    pub break_calculation_mode: BreakCalculationMode,
    /// Break rules, in any order.
    #[serde(default)]
    pub break_rules: Vec<BreakRule>,
    /// National Insurance bands.
    pub national_insurance: NationalInsuranceConfig,
    /// Fraction of hourly gross pay set aside for holiday (e.g. 0.1207).
    pub holiday_accrual_ratio: Decimal,
    /// Hourly rate used when neither a staff override nor a category rate exists.
    pub fallback_hourly_rate: Decimal,
}

impl PayrollConfig {
    /// Returns the break rules that can take part in rule selection.
    pub fn well_formed_break_rules(&self) -> impl Iterator<Item = &BreakRule> {
        self.break_rules.iter().filter(|r| r.is_well_formed())
    }

    /// Returns the number of configured break rules that are ignored as malformed.
    pub fn malformed_break_rule_count(&self) -> usize {
        self.break_rules.iter().filter(|r| !r.is_well_formed()).count()
    }
}
