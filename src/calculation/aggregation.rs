//! Location, category and day breakdowns of a payroll run.
//!
//! Groups are built at full precision, sorted by descending cost (ties keep
//! first-seen order), and only rounded when the report is assembled.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Aggregate, Location, round_to_cents};

use super::rate_resolver::RateResolver;

const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Key of the synthetic location bucket holding unattributed cost.
pub const UNASSIGNED_LOCATION_KEY: &str = "unassigned";

/// Key of the category group holding intervals without a category.
pub const UNCATEGORISED_KEY: &str = "uncategorised";

/// Hours and cost attributed to one worked interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CostLine {
    /// Where the interval was worked.
    pub location_id: Option<String>,
    /// What kind of work it was.
    pub category_id: Option<String>,
    /// The day it is attributed to.
    pub date: NaiveDate,
    /// Paid hours.
    pub hours: Decimal,
    /// Share of its staff member's total employment cost.
    pub cost: Decimal,
}

/// Full-precision breakdowns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdowns {
    /// By location, including the unassigned bucket when non-zero.
    pub by_location: Vec<Aggregate>,
    /// By shift category.
    pub by_category: Vec<Aggregate>,
    /// By calendar day.
    pub by_day: Vec<Aggregate>,
}

impl Breakdowns {
    /// Rounds every group to two decimal places.
    ///
    /// Within each breakdown the rounded groups sum to the rounded total of the
    /// unrounded groups.
    pub fn rounded(self) -> Self {
        Self {
            by_location: round_all(self.by_location),
            by_category: round_all(self.by_category),
            by_day: round_all(self.by_day),
        }
    }
}

fn round_all(groups: Vec<Aggregate>) -> Vec<Aggregate> {
    let hours: Vec<Decimal> = groups.iter().map(|g| g.hours).collect();
    let costs: Vec<Decimal> = groups.iter().map(|g| g.cost).collect();
    let hours = round_preserving_total(&hours);
    let costs = round_preserving_total(&costs);

    groups
        .into_iter()
        .zip(hours.into_iter().zip(costs))
        .map(|(g, (hours, cost))| Aggregate { hours, cost, ..g })
        .collect()
}

/// Rounds `values` to cents so that they sum to the rounded sum of `values`.
///
/// Every value is first rounded down; the cents still missing go one each to
/// the values with the largest remainders, earlier values winning ties.
pub fn round_preserving_total(values: &[Decimal]) -> Vec<Decimal> {
    let mut rounded: Vec<Decimal> = values
        .iter()
        .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::ToNegativeInfinity))
        .collect();
    let target = round_to_cents(values.iter().copied().sum());
    let mut missing = target - rounded.iter().copied().sum::<Decimal>();

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| (values[b] - rounded[b]).cmp(&(values[a] - rounded[a])));

    for i in order {
        if missing < CENT {
            break;
        }
        rounded[i] += CENT;
        missing -= CENT;
    }

    rounded
}

/// Accumulates named groups in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AggregateBuilder {
    groups: Vec<Aggregate>,
    index: HashMap<String, usize>,
}

impl AggregateBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group at zero if it is not already present.
    pub fn seed(&mut self, key: &str, label: &str) {
        self.slot(key, || label.to_string());
    }

    /// Adds hours and cost to a group, creating it with `label` on first use.
    pub fn add(&mut self, key: &str, label: impl FnOnce() -> String, hours: Decimal, cost: Decimal) {
        let slot = self.slot(key, label);
        let group = &mut self.groups[slot];
        group.hours += hours;
        group.cost += cost;
    }

    /// Sum of every group's cost.
    pub fn total_cost(&self) -> Decimal {
        self.groups.iter().map(|g| g.cost).sum()
    }

    /// Sum of every group's hours.
    pub fn total_hours(&self) -> Decimal {
        self.groups.iter().map(|g| g.hours).sum()
    }

    fn slot(&mut self, key: &str, label: impl FnOnce() -> String) -> usize {
        if let Some(&slot) = self.index.get(key) {
            return slot;
        }
        self.groups.push(Aggregate {
            key: key.to_string(),
            label: label(),
            hours: Decimal::ZERO,
            cost: Decimal::ZERO,
        });
        self.index.insert(key.to_string(), self.groups.len() - 1);
        self.groups.len() - 1
    }

    /// Returns the groups sorted by descending cost.
    pub fn finish(self) -> Vec<Aggregate> {
        let mut groups = self.groups;
        groups.sort_by(|a, b| b.cost.cmp(&a.cost));
        groups
    }
}

/// Splits `total` across `weights` proportionally.
///
/// The last positively weighted entry takes the division remainder, so the
/// shares always sum to exactly `total`. When the weights sum to zero nothing is
/// attributed and every share is zero.
pub fn attribute_cost(total: Decimal, weights: &[Decimal]) -> Vec<Decimal> {
    let weight_sum: Decimal = weights.iter().filter(|w| **w > Decimal::ZERO).sum();
    if weight_sum <= Decimal::ZERO {
        return vec![Decimal::ZERO; weights.len()];
    }

    let mut shares: Vec<Decimal> = weights
        .iter()
        .map(|w| total * (*w).max(Decimal::ZERO) / weight_sum)
        .collect();

    if let Some(last) = weights.iter().rposition(|w| *w > Decimal::ZERO) {
        let others: Decimal = shares
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != last)
            .map(|(_, s)| *s)
            .sum();
        shares[last] = total - others;
    }

    shares
}

/// Builds the three breakdowns.
///
/// `grand_hours` and `grand_cost` are the report totals; whatever the lines do
/// not place at a location lands in the unassigned bucket so that location costs
/// always sum to `grand_cost`.
pub fn aggregate(
    lines: &[CostLine],
    locations: &[Location],
    resolver: &RateResolver<'_>,
    grand_hours: Decimal,
    grand_cost: Decimal,
) -> Breakdowns {
    let location_names: HashMap<&str, &str> = locations
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();

    let mut by_location = AggregateBuilder::new();
    for location in locations.iter().filter(|l| l.active) {
        by_location.seed(&location.id, &location.name);
    }

    let mut by_category = AggregateBuilder::new();
    let mut by_day = AggregateBuilder::new();

    for line in lines {
        if let Some(location_id) = line.location_id.as_deref() {
            by_location.add(
                location_id,
                || {
                    location_names
                        .get(location_id)
                        .copied()
                        .unwrap_or(location_id)
                        .to_string()
                },
                line.hours,
                line.cost,
            );
        }

        match line.category_id.as_deref() {
            Some(category_id) => by_category.add(
                category_id,
                || {
                    resolver
                        .category_name(category_id)
                        .unwrap_or(category_id)
                        .to_string()
                },
                line.hours,
                line.cost,
            ),
            None => by_category.add(
                UNCATEGORISED_KEY,
                || "Uncategorised".to_string(),
                line.hours,
                line.cost,
            ),
        }

        by_day.add(
            &line.date.format("%Y-%m-%d").to_string(),
            || line.date.format("%a %d %b").to_string(),
            line.hours,
            line.cost,
        );
    }

    let unassigned_hours = grand_hours - by_location.total_hours();
    let unassigned_cost = grand_cost - by_location.total_cost();
    if !unassigned_cost.is_zero() || !unassigned_hours.is_zero() {
        by_location.add(
            UNASSIGNED_LOCATION_KEY,
            || "Unassigned".to_string(),
            unassigned_hours,
            unassigned_cost,
        );
    }

    Breakdowns {
        by_location: by_location.finish(),
        by_category: by_category.finish(),
        by_day: by_day.finish(),
    }
}
