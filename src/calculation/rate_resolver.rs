//! Hourly rate resolution.
//!
//! A worked interval is priced at the first rate found in this order:
//! 1. the staff member's override for the interval's category
//! 2. the category's default hourly rate
//! 3. the organisation's fallback hourly rate
//!
//! Presence is checked explicitly at every step, so a configured rate of zero
//! is used as a real rate rather than being treated as missing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryRate, ShiftCategory, StaffMember};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The staff member's per-category override.
    StaffOverride,
    /// The category's default hourly rate.
    CategoryDefault,
    /// The organisation fallback rate.
    Fallback,
}

/// The result of a rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// The hourly rate.
    pub rate: Decimal,
    /// Which level supplied it.
    pub source: RateSource,
}

/// A staff member's category rate overrides, keyed by category id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateOverrides {
    rates: HashMap<String, Decimal>,
}

impl RateOverrides {
    /// Builds the lookup from an ordered override list; later entries win.
    pub fn from_rates(rates: &[CategoryRate]) -> Self {
        Self {
            rates: rates
                .iter()
                .map(|r| (r.category_id.clone(), r.hourly_rate))
                .collect(),
        }
    }

    /// Builds the lookup for one staff member.
    pub fn for_staff(staff: &StaffMember) -> Self {
        Self::from_rates(&staff.category_rates)
    }

    /// Returns the override for `category_id`, if one is present.
    pub fn get(&self, category_id: &str) -> Option<Decimal> {
        self.rates.get(category_id).copied()
    }

    /// Returns true if an override is present for `category_id`.
    pub fn has_override(&self, category_id: &str) -> bool {
        self.rates.contains_key(category_id)
    }
}

/// Resolves an hourly rate from its three possible sources.
///
/// `category_id` may be `None` or empty, in which case neither an override nor a
/// category default can apply.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{resolve_hourly_rate, RateOverrides, RateSource};
/// use payroll_engine::models::CategoryRate;
/// use rust_decimal::Decimal;
///
/// let overrides = RateOverrides::from_rates(&[CategoryRate {
///     category_id: "cat_bar".to_string(),
///     hourly_rate: Decimal::new(1650, 2),
/// }]);
/// let fallback = Decimal::new(1144, 2);
///
/// let bar = resolve_hourly_rate(Some(Decimal::new(15, 0)), &overrides, Some("cat_bar"), fallback);
/// assert_eq!(bar.rate, Decimal::new(1650, 2));
/// assert_eq!(bar.source, RateSource::StaffOverride);
///
/// let kitchen = resolve_hourly_rate(Some(Decimal::new(14, 0)), &overrides, Some("cat_kitchen"), fallback);
/// assert_eq!(kitchen.source, RateSource::CategoryDefault);
///
/// let none = resolve_hourly_rate(None, &overrides, None, fallback);
/// assert_eq!(none.rate, fallback);
/// ```
pub fn resolve_hourly_rate(
    category_default: Option<Decimal>,
    overrides: &RateOverrides,
    category_id: Option<&str>,
    fallback: Decimal,
) -> ResolvedRate {
    let category_id = category_id.filter(|id| !id.trim().is_empty());

    if let Some(rate) = category_id.and_then(|id| overrides.get(id)) {
        return ResolvedRate {
            rate,
            source: RateSource::StaffOverride,
        };
    }

    if let Some(rate) = category_id.and(category_default) {
        return ResolvedRate {
            rate,
            source: RateSource::CategoryDefault,
        };
    }

    ResolvedRate {
        rate: fallback,
        source: RateSource::Fallback,
    }
}

/// Category lookup plus fallback rate for one snapshot.
#[derive(Debug, Clone)]
pub struct RateResolver<'a> {
    categories: HashMap<&'a str, &'a ShiftCategory>,
    fallback: Decimal,
}

impl<'a> RateResolver<'a> {
    /// Indexes the organisation's categories.
    pub fn new(categories: &'a [ShiftCategory], fallback: Decimal) -> Self {
        Self {
            categories: categories.iter().map(|c| (c.id.as_str(), c)).collect(),
            fallback,
        }
    }

    /// Resolves the rate for a category, applying `overrides` first.
    pub fn resolve(&self, overrides: &RateOverrides, category_id: Option<&str>) -> ResolvedRate {
        let category_default = category_id
            .and_then(|id| self.categories.get(id))
            .and_then(|c| c.default_hourly_rate);

        resolve_hourly_rate(category_default, overrides, category_id, self.fallback)
    }

    /// Returns the display name of a category.
    pub fn category_name(&self, category_id: &str) -> Option<&'a str> {
        self.categories
            .get(category_id)
            .copied()
            .map(|c| c.name.as_str())
    }
}
