//! Organization-wide budget assumptions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Base a provision rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionBase {
    /// Total payroll (Direction and every service).
    Payroll,
    /// Total investment principal across services.
    Investments,
    /// Turnover, see [`TurnoverBasis`].
    Revenue,
}

/// A named provision: `rate` percent of a calculation base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRule {
    /// Identifier.
    pub id: u64,
    /// Label (e.g. "Provision congés payés").
    pub label: String,
    /// The base the rate applies to.
    pub base: ProvisionBase,
    /// Rate in percent.
    #[serde(default)]
    pub rate: Decimal,
}

/// A permanent-capital line item (reserves, retained earnings, grants...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalLine {
    /// Identifier.
    pub id: u64,
    /// Label.
    pub label: String,
    /// Amount.
    #[serde(default)]
    pub amount: Decimal,
}

/// Figure used as turnover for provisions and working capital.
///
/// Historically the organization approximates turnover by total service
/// cost; `Revenue` switches to the sum of entered service revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverBasis {
    /// Sum of service grand totals.
    #[default]
    Cost,
    /// Sum of service revenue totals.
    Revenue,
}

/// Organization-wide assumptions. Exactly one per budget document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalParameters {
    /// Annual cost escalation in percent.
    pub annual_growth_rate: Decimal,
    /// Client payment delay in days.
    pub client_payment_delay_days: u32,
    /// Supplier payment delay in days.
    pub supplier_payment_delay_days: u32,
    /// Inventory value.
    pub inventory_value: Decimal,
    /// Provision rules.
    pub provision_rules: Vec<ProvisionRule>,
    /// Permanent-capital line items.
    pub permanent_capital: Vec<CapitalLine>,
    /// Turnover figure used by provisions and working capital.
    pub turnover_basis: TurnoverBasis,
    /// Years of depreciation already accumulated on the fixed assets.
    pub depreciation_years_elapsed: u32,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            annual_growth_rate: Decimal::new(25, 1),
            client_payment_delay_days: 30,
            supplier_payment_delay_days: 30,
            inventory_value: Decimal::ZERO,
            provision_rules: default_provision_rules(),
            permanent_capital: Vec::new(),
            turnover_basis: TurnoverBasis::Cost,
            depreciation_years_elapsed: 1,
        }
    }
}

/// The three provisions every association starts with.
pub fn default_provision_rules() -> Vec<ProvisionRule> {
    vec![
        ProvisionRule {
            id: 1,
            label: "Provision congés payés".to_string(),
            base: ProvisionBase::Payroll,
            rate: Decimal::from(10),
        },
        ProvisionRule {
            id: 2,
            label: "Provision grosses réparations".to_string(),
            base: ProvisionBase::Investments,
            rate: Decimal::from(2),
        },
        ProvisionRule {
            id: 3,
            label: "Provision créances douteuses".to_string(),
            base: ProvisionBase::Revenue,
            rate: Decimal::from(1),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_documented_defaults() {
        let params: GlobalParameters = serde_json::from_str("{}").unwrap();

        assert_eq!(params.annual_growth_rate, Decimal::new(25, 1));
        assert_eq!(params.client_payment_delay_days, 30);
        assert_eq!(params.supplier_payment_delay_days, 30);
        assert_eq!(params.provision_rules.len(), 3);
        assert_eq!(params.turnover_basis, TurnoverBasis::Cost);
        assert_eq!(params.depreciation_years_elapsed, 1);
    }

    #[test]
    fn test_deserialize_provision_rule() {
        let json = r#"{ "id": 7, "label": "Provision litiges", "base": "revenue", "rate": 0.5 }"#;

        let rule: ProvisionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.base, ProvisionBase::Revenue);
        assert_eq!(rule.rate, Decimal::new(5, 1));
    }

    #[test]
    fn test_unknown_provision_base_is_rejected() {
        let json = r#"{ "id": 7, "label": "X", "base": "stock", "rate": 1 }"#;
        assert!(serde_json::from_str::<ProvisionRule>(json).is_err());
    }
}
