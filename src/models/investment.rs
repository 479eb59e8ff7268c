//! Investment models.
//!
//! A service owns exactly one [`InvestmentLine`] per [`InvestmentCategory`];
//! the set of categories is fixed by the chart of accounts, so the plan is a
//! struct rather than an open map.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DURATION_RANGE, MAX_AMOUNT, MAX_RATE};
use crate::error::{EngineError, EngineResult};

/// Accounting category of a capitalized asset.
///
/// # Example
///
/// ```
/// use budget_engine::models::InvestmentCategory;
///
/// assert_eq!(InvestmentCategory::Vehicle.account(), "2182");
/// assert_eq!(InvestmentCategory::ALL.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentCategory {
    /// Real estate.
    Building,
    /// Building works.
    Works,
    /// Transport equipment.
    Vehicle,
    /// IT equipment.
    ItEquipment,
    /// Furniture.
    Furniture,
    /// Bank fees on acquisition.
    BankFees,
    /// Notary fees.
    NotaryFees,
}

impl InvestmentCategory {
    /// Every category, in reporting order.
    pub const ALL: [InvestmentCategory; 7] = [
        InvestmentCategory::Building,
        InvestmentCategory::Works,
        InvestmentCategory::Vehicle,
        InvestmentCategory::ItEquipment,
        InvestmentCategory::Furniture,
        InvestmentCategory::BankFees,
        InvestmentCategory::NotaryFees,
    ];

    /// Plan Comptable Général account code for the category.
    pub fn account(self) -> &'static str {
        match self {
            InvestmentCategory::Building | InvestmentCategory::Works => "213",
            InvestmentCategory::Vehicle => "2182",
            InvestmentCategory::ItEquipment => "2183",
            InvestmentCategory::Furniture => "2184",
            InvestmentCategory::BankFees => "627",
            InvestmentCategory::NotaryFees => "622",
        }
    }

    /// Name of the category's field in a serialized [`InvestmentPlan`].
    pub fn field_name(self) -> &'static str {
        match self {
            InvestmentCategory::Building => "building",
            InvestmentCategory::Works => "works",
            InvestmentCategory::Vehicle => "vehicle",
            InvestmentCategory::ItEquipment => "itEquipment",
            InvestmentCategory::Furniture => "furniture",
            InvestmentCategory::BankFees => "bankFees",
            InvestmentCategory::NotaryFees => "notaryFees",
        }
    }

    /// Account label for the category.
    pub fn label(self) -> &'static str {
        match self {
            InvestmentCategory::Building => "Constructions",
            InvestmentCategory::Works => "Constructions (travaux)",
            InvestmentCategory::Vehicle => "Matériel de transport",
            InvestmentCategory::ItEquipment => "Matériel informatique",
            InvestmentCategory::Furniture => "Mobilier",
            InvestmentCategory::BankFees => "Frais bancaires (acquisition)",
            InvestmentCategory::NotaryFees => "Frais notariés",
        }
    }
}

/// One capitalized asset and the loan financing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentLine {
    /// Principal (acquisition value).
    #[serde(default)]
    pub principal: Decimal,
    /// Depreciation and loan duration in years (at least 1).
    #[serde(default = "default_duration_years")]
    pub duration_years: u32,
    /// Annual loan rate in percent; 0 means a cash purchase.
    #[serde(default)]
    pub annual_rate: Decimal,
}

fn default_duration_years() -> u32 {
    1
}

impl Default for InvestmentLine {
    fn default() -> Self {
        Self {
            principal: Decimal::ZERO,
            duration_years: default_duration_years(),
            annual_rate: Decimal::ZERO,
        }
    }
}

impl InvestmentLine {
    /// Creates an investment line.
    pub fn new(principal: Decimal, duration_years: u32, annual_rate: Decimal) -> Self {
        Self {
            principal,
            duration_years,
            annual_rate,
        }
    }

    /// Rejects values outside the accepted input ranges.
    ///
    /// Duration must lie in [`DURATION_RANGE`], principal in
    /// `[0, MAX_AMOUNT]` and the annual rate in `[0, MAX_RATE]`. `entity`
    /// names the line in the returned `InvalidEntity` error.
    pub fn check_ranges(&self, entity: &str) -> EngineResult<()> {
        let (min_years, max_years) = DURATION_RANGE;
        if i64::from(self.duration_years) < min_years || i64::from(self.duration_years) > max_years {
            return Err(EngineError::invalid_entity(
                entity,
                "durationYears",
                format!("must be between {} and {}", min_years, max_years),
            ));
        }
        if self.principal < Decimal::ZERO || self.principal > Decimal::from(MAX_AMOUNT) {
            return Err(EngineError::invalid_entity(
                entity,
                "principal",
                format!("must be between 0 and {}", MAX_AMOUNT),
            ));
        }
        if self.annual_rate < Decimal::ZERO || self.annual_rate > Decimal::from(MAX_RATE) {
            return Err(EngineError::invalid_entity(
                entity,
                "annualRate",
                format!("must be between 0 and {}", MAX_RATE),
            ));
        }
        Ok(())
    }
}

/// The fixed set of investments owned by a service, one per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentPlan {
    /// Real estate.
    pub building: InvestmentLine,
    /// Building works.
    pub works: InvestmentLine,
    /// Transport equipment.
    pub vehicle: InvestmentLine,
    /// IT equipment.
    pub it_equipment: InvestmentLine,
    /// Furniture.
    pub furniture: InvestmentLine,
    /// Bank fees on acquisition.
    pub bank_fees: InvestmentLine,
    /// Notary fees.
    pub notary_fees: InvestmentLine,
}

impl InvestmentPlan {
    /// Returns the line for a category.
    pub fn get(&self, category: InvestmentCategory) -> &InvestmentLine {
        match category {
            InvestmentCategory::Building => &self.building,
            InvestmentCategory::Works => &self.works,
            InvestmentCategory::Vehicle => &self.vehicle,
            InvestmentCategory::ItEquipment => &self.it_equipment,
            InvestmentCategory::Furniture => &self.furniture,
            InvestmentCategory::BankFees => &self.bank_fees,
            InvestmentCategory::NotaryFees => &self.notary_fees,
        }
    }

    /// Returns a mutable reference to the line for a category.
    pub fn get_mut(&mut self, category: InvestmentCategory) -> &mut InvestmentLine {
        match category {
            InvestmentCategory::Building => &mut self.building,
            InvestmentCategory::Works => &mut self.works,
            InvestmentCategory::Vehicle => &mut self.vehicle,
            InvestmentCategory::ItEquipment => &mut self.it_equipment,
            InvestmentCategory::Furniture => &mut self.furniture,
            InvestmentCategory::BankFees => &mut self.bank_fees,
            InvestmentCategory::NotaryFees => &mut self.notary_fees,
        }
    }

    /// Iterates over every category with its line, in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (InvestmentCategory, &InvestmentLine)> {
        InvestmentCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Sum of all principals.
    pub fn total_principal(&self) -> Decimal {
        self.iter().map(|(_, line)| line.principal).sum()
    }
}
