//! Core data models for the budget engine.
//!
//! This module contains the budget entities the engine consumes, the
//! snapshot document that carries them, and the audit trail types.

mod audit;
mod direction;
mod investment;
mod line_item;
mod parameters;
mod personnel;
mod service;
mod snapshot;

pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningSeverity};
pub use direction::Direction;
pub use investment::{InvestmentCategory, InvestmentLine, InvestmentPlan};
pub use line_item::{ExpenseLine, LineItem, RevenueLine};
pub use parameters::{
    CapitalLine, GlobalParameters, ProvisionBase, ProvisionRule, TurnoverBasis,
    default_provision_rules,
};
pub use personnel::PersonnelLine;
pub use service::{Activity, Cohort, Enrollment, MONTHS_PER_YEAR, MonthlyCounts, Service};
pub use snapshot::{BudgetSnapshot, SNAPSHOT_VERSION};
