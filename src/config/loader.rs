//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{ChartOfAccounts, EngineConfig, EngineSettings};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Organization metadata, payroll and calendar constants
/// └── accounts.yaml   # Chart of accounts for expense and revenue labels
/// ```
///
/// # Example
///
/// ```no_run
/// use budget_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Organization: {}", loader.config().organization().name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        let accounts = Self::load_yaml::<ChartOfAccounts>(&path.join("accounts.yaml"))?;

        debug!(
            path = %path.display(),
            organization = %settings.organization.name,
            expense_accounts = accounts.expenses.len(),
            revenue_accounts = accounts.revenues.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(settings, accounts),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().organization().name, "AFERTES");
    }

    #[test]
    fn test_payroll_constants_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let payroll = loader.config().payroll();

        assert_eq!(payroll.employer_charge_rate, dec("0.42"));
        assert_eq!(payroll.fixed_monthly_premium, dec("238"));
        assert_eq!(payroll.premium_surcharge_factor, dec("1.42"));
        assert_eq!(loader.config().days_per_year(), dec("365"));
    }

    #[test]
    fn test_accounts_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let accounts = loader.config().accounts();

        assert_eq!(accounts.expense_account("Téléphonie"), "626");
        assert_eq!(accounts.revenue_account("Cotisations"), "756");
        assert_eq!(accounts.expense_account("Unmapped"), "6");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_default_loader_matches_shipped_constants() {
        let shipped = ConfigLoader::load(config_path()).unwrap();
        let default = ConfigLoader::default();

        assert_eq!(
            shipped.config().payroll().employer_charge_rate,
            default.config().payroll().employer_charge_rate
        );
        assert_eq!(
            shipped.config().days_per_year(),
            default.config().days_per_year()
        );
    }
}
