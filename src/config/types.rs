//! Configuration types for the budget engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure also has a
//! `Default` carrying the documented constants, so a caller can run the engine
//! without any file on disk.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// Metadata about the organization the budget belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationMetadata {
    /// The human-readable name of the organization.
    pub name: String,
    /// Version of the configuration set.
    #[serde(default)]
    pub version: String,
}

impl Default for OrganizationMetadata {
    fn default() -> Self {
        Self {
            name: "Association".to_string(),
            version: String::new(),
        }
    }
}

/// Organization-wide payroll constants.
///
/// The wage premium is paid monthly to eligible staff and is itself subject
/// to the surcharge factor; employer charges apply to gross pay only.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConstants {
    /// Employer charge ratio applied to annual gross pay (e.g. 0.42).
    pub employer_charge_rate: Decimal,
    /// Fixed monthly wage premium for eligible staff (e.g. 238).
    pub fixed_monthly_premium: Decimal,
    /// Surcharge factor applied to the premium (e.g. 1.42).
    pub premium_surcharge_factor: Decimal,
}

impl Default for PayrollConstants {
    fn default() -> Self {
        Self {
            employer_charge_rate: Decimal::new(42, 2),
            fixed_monthly_premium: Decimal::new(238, 0),
            premium_surcharge_factor: Decimal::new(142, 2),
        }
    }
}

/// Calendar constants.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Days per year used for unit volumes and payment delays.
    pub days_per_year: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { days_per_year: 365 }
    }
}

/// Structure of `engine.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Organization metadata.
    #[serde(default)]
    pub organization: OrganizationMetadata,
    /// Payroll constants.
    #[serde(default)]
    pub payroll: PayrollConstants,
    /// Calendar constants.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Chart of accounts used to group line items in the income statement.
///
/// Structure of `accounts.yaml`. Labels are matched exactly; anything not
/// listed falls back to the default account of its side.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartOfAccounts {
    /// Expense label to account code.
    #[serde(default)]
    pub expenses: HashMap<String, String>,
    /// Revenue label to account code.
    #[serde(default)]
    pub revenues: HashMap<String, String>,
    /// Account used for expense labels with no mapping.
    #[serde(default = "default_expense_account")]
    pub default_expense_account: String,
    /// Account used for revenue labels with no mapping.
    #[serde(default = "default_revenue_account")]
    pub default_revenue_account: String,
}

fn default_expense_account() -> String {
    "6".to_string()
}

fn default_revenue_account() -> String {
    "70".to_string()
}

impl ChartOfAccounts {
    /// Returns the account code for an expense label.
    pub fn expense_account(&self, label: &str) -> &str {
        self.expenses
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_expense_account)
    }

    /// Returns the account code for a revenue label.
    pub fn revenue_account(&self, label: &str) -> &str {
        self.revenues
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_revenue_account)
    }
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        let expenses = [
            ("Alimentation", "601"),
            ("Carburant", "6061"),
            ("Assurances", "616"),
            ("Frais bancaires", "627"),
            ("Formation", "6064"),
            ("Eau/Élec/Gaz", "606"),
            ("Entretien", "615"),
            ("Fournitures", "6064"),
            ("Loyer", "613"),
            ("Charges", "614"),
            ("Téléphonie", "626"),
            ("Documentation", "6181"),
        ];
        let revenues = [
            ("Prestations de services", "706"),
            ("Frais de formation", "706"),
            ("Participation usagers", "706"),
            ("Subventions", "74"),
            ("Subvention État", "741"),
            ("Subvention Région", "742"),
            ("Subvention Département", "743"),
            ("Cotisations", "756"),
            ("Dons", "754"),
        ];

        Self {
            expenses: expenses
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            revenues: revenues
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_expense_account: default_expense_account(),
            default_revenue_account: default_revenue_account(),
        }
    }
}

/// The complete engine configuration.
///
/// Always passed explicitly into the engine; nothing is read from ambient
/// process state during a computation.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    settings: EngineSettings,
    accounts: ChartOfAccounts,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, accounts: ChartOfAccounts) -> Self {
        Self { settings, accounts }
    }

    /// Returns the organization metadata.
    pub fn organization(&self) -> &OrganizationMetadata {
        &self.settings.organization
    }

    /// Returns the payroll constants.
    pub fn payroll(&self) -> &PayrollConstants {
        &self.settings.payroll
    }

    /// Returns the number of days per year as a decimal.
    pub fn days_per_year(&self) -> Decimal {
        Decimal::from(self.settings.calendar.days_per_year)
    }

    /// Returns the chart of accounts.
    pub fn accounts(&self) -> &ChartOfAccounts {
        &self.accounts
    }
}
