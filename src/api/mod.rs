//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for monthly payroll reports and
//! weekly staffing forecasts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{VIEWER_ROLE_HEADER, create_router};
pub use request::{ForecastRequest, PayrollRequest};
pub use response::{ApiError, ApiErrorResponse, PayrollResponse};
pub use state::AppState;
