//! Central overhead entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PersonnelLine;

/// The Direction: executive and administrative staff plus shared facility
/// costs not attributable to a single service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Direction {
    /// Direction staff.
    pub personnel: Vec<PersonnelLine>,
    /// Monthly headquarters rent.
    pub rent: Decimal,
    /// Monthly headquarters utilities and service charges.
    pub utilities: Decimal,
    /// Other monthly headquarters charges.
    pub other_charges: Decimal,
}

impl Direction {
    /// The three flat monthly charges, annualized.
    pub fn flat_charges_annual(&self) -> Decimal {
        (self.rent + self.utilities + self.other_charges) * Decimal::from(12)
    }
}
