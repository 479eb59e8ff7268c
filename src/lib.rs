//! Budget Engine for nonprofit organizations
//!
//! This crate computes the forecast budget of an association: payroll with
//! employer charges, depreciation and loan amortization, per-service budgets
//! and unit costs, provisions, working capital, operating reserve, a
//! three-year projection and a forecast income statement.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
