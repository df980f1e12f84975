//! Shift categories and locations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A category of work (e.g. "Bar", "Kitchen") with its default pay rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCategory {
    /// Unique identifier for the category.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rate paid when the staff member has no override for this category.
    #[serde(default)]
    pub default_hourly_rate: Option<Decimal>,
    /// Display colour used by the scheduling UI.
    #[serde(default)]
    pub color: Option<String>,
}

/// A site the organisation staffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier for the location.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inactive locations are not pre-seeded into location breakdowns.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
