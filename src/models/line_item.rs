//! Free-form monthly line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A labelled monthly amount.
///
/// Services own open-ended, order-preserving lists of these for operating
/// expenses and for revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identifier, unique within the owning list.
    pub id: u64,
    /// Label (e.g. "Carburant"); also used to look up the account code.
    pub label: String,
    /// Monthly amount.
    #[serde(default)]
    pub monthly_amount: Decimal,
}

impl LineItem {
    /// The monthly amount over twelve months.
    pub fn annual_amount(&self) -> Decimal {
        self.monthly_amount * Decimal::from(12)
    }
}

/// An operating expense line.
pub type ExpenseLine = LineItem;

/// A revenue line.
pub type RevenueLine = LineItem;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_amount() {
        let item = LineItem {
            id: 1,
            label: "Fournitures".to_string(),
            monthly_amount: Decimal::from(1500),
        };
        assert_eq!(item.annual_amount(), Decimal::from(18000));
    }

    #[test]
    fn test_deserialize_without_amount() {
        let item: LineItem = serde_json::from_str(r#"{ "id": 3, "label": "Dons" }"#).unwrap();
        assert_eq!(item.monthly_amount, Decimal::ZERO);
    }
}
