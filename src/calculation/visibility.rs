//! Viewer-dependent filtering of finished payroll reports.
//!
//! Filtering happens after every figure has been computed, so totals and
//! breakdowns always cover the whole organisation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::models::PayrollReport;

/// A role allowed to view payroll figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    /// Sees every staff line.
    Admin,
    /// Sees every staff line except those of managers and admins.
    Manager,
}

impl FromStr for ViewerRole {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(ViewerRole::Admin),
            "manager" => Ok(ViewerRole::Manager),
            _ => Err(EngineError::AccessDenied {
                role: s.to_string(),
            }),
        }
    }
}

/// Removes the staff lines `viewer` may not see.
pub fn apply_visibility(mut report: PayrollReport, viewer: ViewerRole) -> PayrollReport {
    if viewer == ViewerRole::Manager {
        let before = report.staff.len();
        report.staff.retain(|line| !line.role.is_privileged());
        debug!(
            hidden = before - report.staff.len(),
            "privileged staff lines hidden from manager"
        );
    }
    report
}
