//! Configuration loading and management for the budget engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files: organization metadata, payroll constants, the calendar, and the
//! chart of accounts used for the income statement.
//!
//! # Example
//!
//! ```no_run
//! use budget_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Employer charges: {}", loader.config().payroll().employer_charge_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CalendarConfig, ChartOfAccounts, EngineConfig, EngineSettings, OrganizationMetadata,
    PayrollConstants,
};
