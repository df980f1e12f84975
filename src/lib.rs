//! Payroll and labour-cost computation engine
//!
//! This crate turns a snapshot of staff, shift categories, shifts and time entries
//! into per-staff employment costs, location/category/day breakdowns and weekly
//! contracted-versus-scheduled forecasts. Calculations are pure functions over an
//! immutable snapshot; the `api` module exposes them over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
