//! Request types for the Budget Engine API.
//!
//! `/budget` takes a snapshot document as is; only `/amortization` has a
//! dedicated request body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InvestmentLine;

/// Request body for the `/amortization` endpoint.
///
/// Unlike an investment inside a snapshot, principal and duration are
/// required here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRequest {
    /// Amount invested or borrowed.
    pub principal: Decimal,
    /// Depreciation and repayment period in years.
    pub duration_years: u32,
    /// Annual interest rate in percent; 0 for a cash purchase.
    #[serde(default)]
    pub annual_rate: Decimal,
}

impl From<AmortizationRequest> for InvestmentLine {
    fn from(req: AmortizationRequest) -> Self {
        InvestmentLine::new(req.principal, req.duration_years, req.annual_rate)
    }
}
