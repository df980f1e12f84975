//! Request types for the payroll engine API.
//!
//! Both endpoints take the snapshot records at the top level of the body next to
//! their own parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::models::{HoursSource, PayrollSnapshot};

/// Request body for the `/payroll` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The month to report on, as `YYYY-MM`.
    pub month: String,
    /// Which records count as worked time.
    #[serde(default)]
    pub hours_source: HoursSource,
    /// Organisation configuration; the server default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PayrollConfig>,
    /// Staff, categories, locations, shifts and time entries.
    #[serde(flatten)]
    pub snapshot: PayrollSnapshot,
}

/// Request body for the `/forecast` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Any date in the week to forecast; the week runs Monday to Sunday.
    pub week_start: NaiveDate,
    /// Restricts the forecast to one location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Organisation configuration; the server default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PayrollConfig>,
    /// Staff, categories, locations and shifts.
    #[serde(flatten)]
    pub snapshot: PayrollSnapshot,
}
