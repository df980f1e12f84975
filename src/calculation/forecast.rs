//! Weekly staffing forecast: contracted baseline against the published schedule.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::PayrollConfig;
use crate::models::{
    AuditWarning, ForecastFigures, ForecastResult, ForecastVariance, PayPeriod, PayrollSnapshot,
    StaffMember, WarningLog, round_to_cents,
};

use super::interval_costing::{StaffDirectory, cost_intervals};
use super::rate_resolver::{RateResolver, RateSource};
use super::warnings::{FALLBACK_RATE_USED, NO_ACTIVE_CONTRACT};

/// Average number of weeks in a month, used to turn a salary into a weekly cost.
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(433, 0, 0, false, 2);

/// `variance / baseline × 100`, or zero when there is no baseline.
pub fn variance_percent(variance: Decimal, baseline: Decimal) -> Decimal {
    if baseline.is_zero() {
        Decimal::ZERO
    } else {
        variance / baseline * Decimal::ONE_HUNDRED
    }
}

/// Compares contracted and scheduled hours and cost for `week`.
///
/// With `location_id` set, only staff attached to that location count towards
/// the contracted side and only shifts at that location towards the scheduled
/// side.
pub fn forecast_week(
    snapshot: &PayrollSnapshot,
    week: &PayPeriod,
    location_id: Option<&str>,
    config: &PayrollConfig,
) -> ForecastResult {
    let directory = StaffDirectory::new(&snapshot.staff);
    let resolver = RateResolver::new(&snapshot.categories, config.fallback_hourly_rate);
    let mut warnings = WarningLog::default();

    let contracted = contracted_figures(snapshot, location_id, &directory, &resolver, &mut warnings);
    let scheduled = scheduled_figures(snapshot, week, location_id, &directory, &resolver, config, &mut warnings);

    let hours_variance = scheduled.hours - contracted.hours;
    let cost_variance = scheduled.cost - contracted.cost;

    info!(
        week_start = %week.start_date,
        location_id = location_id.unwrap_or("all"),
        contracted_hours = %contracted.hours,
        scheduled_hours = %scheduled.hours,
        "forecast calculated"
    );

    ForecastResult {
        week: week.clone(),
        location_id: location_id.map(str::to_string),
        variance: ForecastVariance {
            hours: round_to_cents(hours_variance),
            cost: round_to_cents(cost_variance),
            hours_percent: round_to_cents(variance_percent(hours_variance, contracted.hours)),
            cost_percent: round_to_cents(variance_percent(cost_variance, contracted.cost)),
        },
        contracted: ForecastFigures {
            hours: round_to_cents(contracted.hours),
            cost: round_to_cents(contracted.cost),
        },
        scheduled: ForecastFigures {
            hours: round_to_cents(scheduled.hours),
            cost: round_to_cents(scheduled.cost),
        },
        warnings: warnings.into_vec(),
    }
}

fn contracted_figures(
    snapshot: &PayrollSnapshot,
    location_id: Option<&str>,
    directory: &StaffDirectory<'_>,
    resolver: &RateResolver<'_>,
    warnings: &mut WarningLog,
) -> ForecastFigures {
    let mut figures = ForecastFigures::default();

    for member in snapshot
        .staff
        .iter()
        .filter(|s| s.active)
        .filter(|s| location_id.is_none_or(|id| s.is_attached_to(id)))
    {
        let hours = member.contracted_hours.unwrap_or(Decimal::ZERO);
        figures.hours += hours;
        figures.cost += contracted_weekly_cost(member, hours, directory, resolver, warnings);
    }

    figures
}

fn contracted_weekly_cost(
    member: &StaffMember,
    hours: Decimal,
    directory: &StaffDirectory<'_>,
    resolver: &RateResolver<'_>,
    warnings: &mut WarningLog,
) -> Decimal {
    if member.is_salaried() {
        return match member.monthly_salary {
            Some(salary) => salary / WEEKS_PER_MONTH,
            None => {
                warnings.push(no_active_contract(member));
                Decimal::ZERO
            }
        };
    }

    let rate = resolver.resolve(
        directory.overrides(Some(member.id.as_str())),
        member.primary_category_id.as_deref(),
    );
    if rate.source == RateSource::Fallback && hours > Decimal::ZERO {
        debug!(staff_id = %member.id, "contracted hours priced at fallback rate");
        warnings.push(AuditWarning::new(
            FALLBACK_RATE_USED,
            format!(
                "No hourly rate configured for the primary category of staff '{}'; fallback rate applied",
                member.id
            ),
            "low",
        ));
    }
    hours * rate.rate
}

fn scheduled_figures(
    snapshot: &PayrollSnapshot,
    week: &PayPeriod,
    location_id: Option<&str>,
    directory: &StaffDirectory<'_>,
    resolver: &RateResolver<'_>,
    config: &PayrollConfig,
    warnings: &mut WarningLog,
) -> ForecastFigures {
    // Per-day breaks span locations: price the whole week, then filter.
    let intervals = snapshot.shift_intervals(week);
    let costs = cost_intervals(&intervals, directory, resolver, config, warnings);

    let mut figures = ForecastFigures::default();
    for cost in costs
        .iter()
        .filter(|c| location_id.is_none_or(|id| c.location_id.as_deref() == Some(id)))
    {
        figures.hours += cost.hours.paid_hours;

        let salaried = cost
            .user_id
            .as_deref()
            .and_then(|id| directory.get(id))
            .is_some_and(StaffMember::is_salaried);
        if !salaried {
            figures.cost += cost.pay;
        }
    }

    figures
}

fn no_active_contract(member: &StaffMember) -> AuditWarning {
    AuditWarning::new(
        NO_ACTIVE_CONTRACT,
        format!("Monthly staff '{}' has no salary on record", member.id),
        "medium",
    )
}
