//! Staff roster model and related types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a staff member is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Paid for hours worked at an hourly rate.
    Hourly,
    /// Paid a fixed monthly salary regardless of hours worked.
    Monthly,
}

/// A staff member's role within the organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Organisation administrator.
    Admin,
    /// Location or team manager.
    Manager,
    /// Regular staff.
    #[default]
    Staff,
}

impl StaffRole {
    /// Returns true for roles whose individual pay is hidden from managers.
    pub fn is_privileged(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::Manager)
    }
}

/// A per-category hourly rate that overrides the category default for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRate {
    /// The shift category the rate applies to.
    pub category_id: String,
    /// The hourly rate paid to this member for that category.
    pub hourly_rate: Decimal,
}

/// Represents a member of the organisation's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Organisation role.
    #[serde(default)]
    pub role: StaffRole,
    /// Hourly or monthly pay.
    pub payment_type: PaymentType,
    /// Monthly salary; expected for [`PaymentType::Monthly`] members.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Agreed weekly hours used as the forecast baseline.
    #[serde(default)]
    pub contracted_hours: Option<Decimal>,
    /// Category rate overrides. When a category appears twice the later entry wins.
    #[serde(default)]
    pub category_rates: Vec<CategoryRate>,
    /// The category whose rate prices this member's contracted hours.
    #[serde(default)]
    pub primary_category_id: Option<String>,
    /// Locations the member is attached to.
    #[serde(default)]
    pub location_ids: Vec<String>,
    /// Whether the member is currently employed.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl StaffMember {
    /// Returns true if the member is paid a monthly salary.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{PaymentType, StaffMember, StaffRole};
    /// use rust_decimal::Decimal;
    ///
    /// let member = StaffMember {
    ///     id: "staff_001".to_string(),
    ///     name: "Alex".to_string(),
    ///     role: StaffRole::Staff,
    ///     payment_type: PaymentType::Monthly,
    ///     monthly_salary: Some(Decimal::new(2000, 0)),
    ///     contracted_hours: None,
    ///     category_rates: vec![],
    ///     primary_category_id: None,
    ///     location_ids: vec![],
    ///     active: true,
    /// };
    /// assert!(member.is_salaried());
    /// ```
    pub fn is_salaried(&self) -> bool {
        self.payment_type == PaymentType::Monthly
    }

    /// Returns true if the member is attached to the given location.
    pub fn is_attached_to(&self, location_id: &str) -> bool {
        self.location_ids.iter().any(|id| id == location_id)
    }
}
