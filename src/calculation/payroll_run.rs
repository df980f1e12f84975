//! End-to-end payroll run over one pay period.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::PayrollConfig;
use crate::models::{
    AuditWarning, CostBasis, HoursBreakdown, HoursSource, PayPeriod, PaymentType,
    PayrollReport, PayrollSnapshot, PayrollTotals, StaffPayrollSummary, StaffRole, WarningLog,
    WorkedInterval, round_to_cents,
};

use super::aggregation::{CostLine, aggregate, attribute_cost};
use super::interval_costing::{IntervalCost, StaffDirectory, cost_intervals};
use super::payroll_cost::{StaffCost, calculate_hourly_cost, calculate_staff_cost};
use super::rate_resolver::RateResolver;
use super::warnings::{
    MALFORMED_BREAK_RULE, NO_ACTIVE_CONTRACT, OPEN_SHIFTS_EXCLUDED, UNKNOWN_STAFF,
};

/// One staff member's worked intervals within a run.
#[derive(Debug, Default)]
struct StaffWork {
    intervals: Vec<usize>,
    hours: HoursBreakdown,
    pay: Decimal,
}

/// A staff line before rounding.
struct StaffLine {
    summary: StaffPayrollSummary,
    work: StaffWork,
}

/// Calculates the payroll report for `period`.
///
/// Worked time comes from `source`. Open shifts are left out, since nobody is
/// paid for them. The returned report is unfiltered; see
/// [`apply_visibility`](super::apply_visibility) for viewer filtering.
pub fn run_payroll(
    snapshot: &PayrollSnapshot,
    period: &PayPeriod,
    source: HoursSource,
    config: &PayrollConfig,
) -> PayrollReport {
    let mut warnings = WarningLog::default();

    let malformed = config.malformed_break_rule_count();
    if malformed > 0 {
        warn!(malformed, "ignoring malformed break rules");
        warnings.push(AuditWarning::new(
            MALFORMED_BREAK_RULE,
            format!("{} break rule(s) with negative values were ignored", malformed),
            "medium",
        ));
    }

    let (intervals, open): (Vec<WorkedInterval>, Vec<WorkedInterval>) = snapshot
        .worked_intervals(source, period)
        .into_iter()
        .partition(WorkedInterval::is_assigned);
    if !open.is_empty() {
        warnings.push(AuditWarning::new(
            OPEN_SHIFTS_EXCLUDED,
            format!("{} open shift(s) excluded from payroll", open.len()),
            "low",
        ));
    }

    let directory = StaffDirectory::new(&snapshot.staff);
    let resolver = RateResolver::new(&snapshot.categories, config.fallback_hourly_rate);
    let costs = cost_intervals(&intervals, &directory, &resolver, config, &mut warnings);

    let mut work = group_by_staff(&costs);
    let mut lines: Vec<StaffLine> = Vec::new();

    for member in &snapshot.staff {
        let member_work = work.remove(member.id.as_str()).unwrap_or_default();
        if !member.active && member_work.intervals.is_empty() {
            continue;
        }

        let StaffCost { cost, basis } = calculate_staff_cost(member, member_work.pay, config);
        if basis == CostBasis::NoActiveContract {
            warnings.push(AuditWarning::new(
                NO_ACTIVE_CONTRACT,
                format!("Monthly staff '{}' has no salary on record", member.id),
                "medium",
            ));
        }

        lines.push(StaffLine {
            summary: StaffPayrollSummary {
                staff_id: member.id.clone(),
                name: member.name.clone(),
                role: member.role,
                payment_type: member.payment_type,
                basis,
                interval_count: member_work.intervals.len(),
                hours: member_work.hours.clone(),
                cost,
            },
            work: member_work,
        });
    }

    // Whatever is left references ids missing from the roster.
    let mut unknown: Vec<(&str, StaffWork)> = work.into_iter().collect();
    unknown.sort_by_key(|(_, w)| w.intervals.first().copied());
    for (staff_id, member_work) in unknown {
        warn!(%staff_id, "worked time for staff missing from roster");
        warnings.push(AuditWarning::new(
            UNKNOWN_STAFF,
            format!("Worked time recorded for unknown staff '{}'; costed as hourly", staff_id),
            "medium",
        ));
        lines.push(StaffLine {
            summary: StaffPayrollSummary {
                staff_id: staff_id.to_string(),
                name: staff_id.to_string(),
                role: StaffRole::Staff,
                payment_type: PaymentType::Hourly,
                basis: CostBasis::Hourly,
                interval_count: member_work.intervals.len(),
                hours: member_work.hours.clone(),
                cost: calculate_hourly_cost(member_work.pay, config),
            },
            work: member_work,
        });
    }

    let totals = total(&lines);
    let cost_lines = attribute_lines(&lines, &costs);
    let breakdowns = aggregate(
        &cost_lines,
        &snapshot.locations,
        &resolver,
        totals.hours.paid_hours,
        totals.cost.total_cost,
    )
    .rounded();

    info!(
        period_start = %period.start_date,
        period_end = %period.end_date,
        staff_count = totals.staff_count,
        interval_count = costs.len(),
        total_cost = %round_to_cents(totals.cost.total_cost),
        "payroll calculated"
    );

    PayrollReport {
        period: period.clone(),
        hours_source: source,
        staff: lines
            .into_iter()
            .map(|line| StaffPayrollSummary {
                hours: line.summary.hours.rounded(),
                cost: line.summary.cost.rounded(),
                ..line.summary
            })
            .collect(),
        by_location: breakdowns.by_location,
        by_category: breakdowns.by_category,
        by_day: breakdowns.by_day,
        totals: PayrollTotals {
            hours: totals.hours.rounded(),
            cost: totals.cost.rounded(),
            hourly_cost: round_to_cents(totals.hourly_cost),
            salaried_cost: round_to_cents(totals.salaried_cost),
            staff_count: totals.staff_count,
        },
        warnings: warnings.into_vec(),
    }
}

fn group_by_staff(costs: &[IntervalCost]) -> HashMap<&str, StaffWork> {
    let mut work: HashMap<&str, StaffWork> = HashMap::new();
    for (i, cost) in costs.iter().enumerate() {
        let Some(user_id) = cost.user_id.as_deref() else {
            continue;
        };
        let entry = work.entry(user_id).or_default();
        entry.intervals.push(i);
        entry.hours += &cost.hours;
        entry.pay += cost.pay;
    }
    work
}

fn total(lines: &[StaffLine]) -> PayrollTotals {
    let mut totals = PayrollTotals {
        staff_count: lines.len(),
        ..Default::default()
    };
    for line in lines {
        let summary = &line.summary;
        totals.hours += &summary.hours;
        totals.cost += &summary.cost;
        match summary.basis {
            CostBasis::Hourly => totals.hourly_cost += summary.cost.total_cost,
            CostBasis::Salaried => totals.salaried_cost += summary.cost.total_cost,
            CostBasis::NoActiveContract => {}
        }
    }
    totals
}

/// Spreads each staff member's total cost over their intervals: by pay for
/// hourly staff, by paid hours for salaried staff.
fn attribute_lines(lines: &[StaffLine], costs: &[IntervalCost]) -> Vec<CostLine> {
    let mut cost_lines = Vec::with_capacity(costs.len());

    for line in lines {
        let weights: Vec<Decimal> = line
            .work
            .intervals
            .iter()
            .map(|&i| match line.summary.basis {
                CostBasis::Hourly => costs[i].pay,
                CostBasis::Salaried | CostBasis::NoActiveContract => costs[i].hours.paid_hours,
            })
            .collect();
        let shares = attribute_cost(line.summary.cost.total_cost, &weights);

        for (&i, share) in line.work.intervals.iter().zip(shares) {
            let interval = &costs[i];
            cost_lines.push(CostLine {
                location_id: interval.location_id.clone(),
                category_id: interval.category_id.clone(),
                date: interval.date,
                hours: interval.hours.paid_hours,
                cost: share,
            });
        }
    }

    cost_lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::aggregation::UNASSIGNED_LOCATION_KEY;
    use crate::config::{BreakCalculationMode, BreakRule, NationalInsuranceConfig, NiBand};
    use crate::models::{
        CategoryRate, Location, Shift, ShiftCategory, StaffMember, TimeEntry, TimeEntryStatus,
    };
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn config() -> PayrollConfig {
        PayrollConfig {
            break_calculation_mode: BreakCalculationMode::PerShift,
            break_rules: vec![BreakRule {
                min_hours: dec("6"),
                break_minutes: dec("30"),
            }],
            national_insurance: NationalInsuranceConfig {
                employee: NiBand {
                    threshold: dec("1048.00"),
                    rate: dec("0.08"),
                },
                employer: NiBand {
                    threshold: dec("758.33"),
                    rate: dec("0.138"),
                },
            },
            holiday_accrual_ratio: dec("0.1207"),
            fallback_hourly_rate: dec("11.44"),
        }
    }

    fn member(id: &str, role: StaffRole, payment_type: PaymentType) -> StaffMember {
        StaffMember {
            id: id.to_string(),
            name: format!("Name {}", id),
            role,
            payment_type,
            monthly_salary: None,
            contracted_hours: None,
            category_rates: vec![],
            primary_category_id: None,
            location_ids: vec![],
            active: true,
        }
    }

    fn entry(id: &str, user: &str, day: &str, start: &str, end: &str, location: Option<&str>) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            user_id: user.to_string(),
            clock_in: make_datetime(&format!("{} {}", day, start)),
            clock_out: Some(make_datetime(&format!("{} {}", day, end))),
            total_break_minutes: 0,
            category_id: Some("cat_bar".to_string()),
            location_id: location.map(str::to_string),
            status: TimeEntryStatus::Approved,
        }
    }

    fn snapshot() -> PayrollSnapshot {
        let mut manager = member("staff_002", StaffRole::Manager, PaymentType::Monthly);
        manager.monthly_salary = Some(dec("2000"));

        PayrollSnapshot {
            staff: vec![member("staff_001", StaffRole::Staff, PaymentType::Hourly), manager],
            categories: vec![ShiftCategory {
                id: "cat_bar".to_string(),
                name: "Bar".to_string(),
                default_hourly_rate: Some(dec("15")),
                color: None,
            }],
            locations: vec![Location {
                id: "loc_north".to_string(),
                name: "North".to_string(),
                active: true,
            }],
            shifts: vec![],
            time_entries: vec![
                entry("te_1", "staff_001", "2026-01-15", "09:00:00", "17:00:00", Some("loc_north")),
                entry("te_2", "staff_001", "2026-01-16", "09:00:00", "13:00:00", None),
            ],
        }
    }

    fn january() -> PayPeriod {
        PayPeriod::from_month("2026-01").unwrap()
    }

    #[test]
    fn test_hourly_and_salaried_lines() {
        let report = run_payroll(&snapshot(), &january(), HoursSource::TimeEntries, &config());

        assert_eq!(report.staff.len(), 2);

        let hourly = &report.staff[0];
        assert_eq!(hourly.basis, CostBasis::Hourly);
        assert_eq!(hourly.interval_count, 2);
        assert_eq!(hourly.hours.paid_hours, dec("11.50"));
        // 7.5h + 4h at $15 = 172.50, accrual 20.82, below NI thresholds.
        assert_eq!(hourly.cost.gross_pay, dec("172.50"));
        assert_eq!(hourly.cost.holiday_accrual, dec("20.82"));
        assert_eq!(hourly.cost.total_cost, dec("193.32"));

        let salaried = &report.staff[1];
        assert_eq!(salaried.basis, CostBasis::Salaried);
        assert_eq!(salaried.cost.total_cost, dec("2171.35"));

        assert_eq!(report.totals.hourly_cost, dec("193.32"));
        assert_eq!(report.totals.salaried_cost, dec("2171.35"));
        assert_eq!(report.totals.cost.total_cost, dec("2364.67"));
        assert_eq!(report.totals.staff_count, 2);
    }

    #[test]
    fn test_location_breakdown_reconciles() {
        let report = run_payroll(&snapshot(), &january(), HoursSource::TimeEntries, &config());

        let located: Decimal = report.by_location.iter().map(|a| a.cost).sum();
        assert_eq!(located, report.totals.cost.total_cost);
        assert!(report.by_location.iter().any(|a| a.key == UNASSIGNED_LOCATION_KEY));

        // The 8h entry earns 112.50 of the 172.50 pay.
        let north = report.by_location.iter().find(|a| a.key == "loc_north").unwrap();
        assert_eq!(north.hours, dec("7.50"));
        assert_eq!(north.cost, round_to_cents(dec("193.3207500") * dec("112.5") / dec("172.5")));
    }

    #[test]
    fn test_short_entries_at_many_locations_reconcile_to_the_cent() {
        let sites: Vec<Location> = (0..8)
            .map(|i| Location {
                id: format!("loc_{}", i),
                name: format!("Site {}", i),
                active: true,
            })
            .collect();
        let time_entries: Vec<TimeEntry> = sites
            .iter()
            .enumerate()
            .map(|(i, site)| TimeEntry {
                category_id: None,
                ..entry(
                    &format!("te_{}", i),
                    "staff_001",
                    &format!("2026-01-{:02}", i + 5),
                    "09:00:00",
                    "09:20:00",
                    Some(site.id.as_str()),
                )
            })
            .collect();
        let snap = PayrollSnapshot {
            staff: vec![member("staff_001", StaffRole::Staff, PaymentType::Hourly)],
            locations: sites,
            time_entries,
            ..Default::default()
        };

        let report = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());

        // 8 x 20 minutes at the 11.44 fallback, plus 12.07% accrual.
        assert_eq!(report.totals.cost.total_cost, dec("34.19"));
        let located: Decimal = report.by_location.iter().map(|a| a.cost).sum();
        assert_eq!(located, dec("34.19"));
        assert!(report.by_location.iter().all(|a| a.key != UNASSIGNED_LOCATION_KEY));

        let days: Decimal = report.by_day.iter().map(|a| a.cost).sum();
        assert_eq!(days, dec("34.19"));
    }

    #[test]
    fn test_category_and_day_breakdowns() {
        let report = run_payroll(&snapshot(), &january(), HoursSource::TimeEntries, &config());

        assert_eq!(report.by_category.len(), 1);
        assert_eq!(report.by_category[0].label, "Bar");
        assert_eq!(report.by_category[0].cost, dec("193.32"));

        assert_eq!(report.by_day.len(), 2);
        assert_eq!(report.by_day[0].key, "2026-01-15");
    }

    #[test]
    fn test_identical_snapshots_give_identical_reports() {
        let snap = snapshot();
        let first = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());
        let second = run_payroll(&snap.clone(), &january(), HoursSource::TimeEntries, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn test_open_shifts_excluded_with_warning() {
        let mut snap = snapshot();
        snap.shifts = vec![
            Shift {
                id: "open".to_string(),
                user_id: None,
                start: make_datetime("2026-01-20 09:00:00"),
                end: make_datetime("2026-01-20 17:00:00"),
                scheduled_break_minutes: 30,
                category_id: Some("cat_bar".to_string()),
                location_id: None,
            },
            Shift {
                id: "assigned".to_string(),
                user_id: Some("staff_001".to_string()),
                start: make_datetime("2026-01-21 09:00:00"),
                end: make_datetime("2026-01-21 17:00:00"),
                scheduled_break_minutes: 30,
                category_id: Some("cat_bar".to_string()),
                location_id: None,
            },
        ];

        let report = run_payroll(&snap, &january(), HoursSource::Shifts, &config());

        assert_eq!(report.staff[0].interval_count, 1);
        assert_eq!(report.staff[0].cost.gross_pay, dec("112.50"));
        assert!(report.warnings.iter().any(|w| w.code == OPEN_SHIFTS_EXCLUDED));
    }

    #[test]
    fn test_unknown_staff_costed_as_hourly() {
        let mut snap = snapshot();
        snap.time_entries.push(entry("te_x", "ghost", "2026-01-17", "09:00:00", "11:00:00", None));

        let report = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());

        let ghost = report.staff.last().unwrap();
        assert_eq!(ghost.staff_id, "ghost");
        assert_eq!(ghost.cost.gross_pay, dec("30.00"));
        assert!(report.warnings.iter().any(|w| w.code == UNKNOWN_STAFF));
    }

    #[test]
    fn test_monthly_without_salary_excluded_from_salaried_total() {
        let mut snap = snapshot();
        snap.staff[1].monthly_salary = None;

        let report = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());

        assert_eq!(report.staff[1].basis, CostBasis::NoActiveContract);
        assert_eq!(report.staff[1].cost.total_cost, dec("0"));
        assert_eq!(report.totals.salaried_cost, dec("0"));
        assert!(report.warnings.iter().any(|w| w.code == NO_ACTIVE_CONTRACT));
    }

    #[test]
    fn test_inactive_staff_without_work_omitted() {
        let mut snap = snapshot();
        snap.staff[1].active = false;

        let report = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());

        assert_eq!(report.staff.len(), 1);
        assert_eq!(report.totals.salaried_cost, dec("0"));
    }

    #[test]
    fn test_malformed_break_rule_warns_and_is_ignored() {
        let mut cfg = config();
        cfg.break_rules.push(BreakRule {
            min_hours: dec("-1"),
            break_minutes: dec("60"),
        });

        let report = run_payroll(&snapshot(), &january(), HoursSource::TimeEntries, &cfg);

        assert_eq!(report.staff[0].hours.paid_hours, dec("11.50"));
        assert!(report.warnings.iter().any(|w| w.code == MALFORMED_BREAK_RULE));
    }

    #[test]
    fn test_staff_override_used_for_pay() {
        let mut snap = snapshot();
        snap.staff[0].category_rates = vec![CategoryRate {
            category_id: "cat_bar".to_string(),
            hourly_rate: dec("20"),
        }];

        let report = run_payroll(&snap, &january(), HoursSource::TimeEntries, &config());
        assert_eq!(report.staff[0].cost.gross_pay, dec("230.00"));
    }
}
