//! Payroll cost calculation.
//!
//! This module converts one personnel line into its fully-loaded annual cost:
//! gross pay, employer charges and, for eligible staff, the fixed monthly wage
//! premium with its surcharge.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PayrollConstants;
use crate::models::PersonnelLine;

/// Annual cost of one personnel line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollCost {
    /// Identifier of the personnel line.
    pub id: u64,
    /// Job title.
    pub title: String,
    /// Full-time equivalent.
    pub fte: Decimal,
    /// Monthly gross salary for one FTE.
    pub monthly_salary: Decimal,
    /// Whether the wage premium applies.
    pub premium_eligible: bool,
    /// `monthly_salary × 12 × fte`.
    pub gross_annual: Decimal,
    /// `gross_annual × employer_charge_rate`.
    pub employer_charges: Decimal,
    /// Annual wage premium, surcharge included. Zero when not eligible.
    pub premium: Decimal,
    /// `gross_annual + employer_charges + premium`.
    pub total_annual_cost: Decimal,
}

/// Calculates the annual cost of one personnel line.
///
/// # Arguments
///
/// * `line` - The personnel line (salary, FTE, premium flag)
/// * `constants` - Organization-wide charge rate and premium constants
///
/// # Returns
///
/// A [`PayrollCost`] where:
/// - `gross_annual = monthly_salary × 12 × fte`
/// - `employer_charges = gross_annual × employer_charge_rate`
/// - `premium = fixed_monthly_premium × premium_surcharge_factor × 12 × fte` when eligible
/// - `total_annual_cost` is the sum of the three
///
/// An FTE of zero yields an all-zero cost.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::calculate_payroll;
/// use budget_engine::config::PayrollConstants;
/// use budget_engine::models::PersonnelLine;
/// use rust_decimal::Decimal;
///
/// let line = PersonnelLine::new(1, "Éducateur", Decimal::ONE, Decimal::from(3000), true);
/// let cost = calculate_payroll(&line, &PayrollConstants::default());
///
/// assert_eq!(cost.gross_annual, Decimal::from(36000));
/// assert_eq!(cost.employer_charges, Decimal::from(15120));
/// assert_eq!(cost.premium, Decimal::new(405552, 2));
/// assert_eq!(cost.total_annual_cost, Decimal::new(5517552, 2));
/// ```
pub fn calculate_payroll(line: &PersonnelLine, constants: &PayrollConstants) -> PayrollCost {
    let months = Decimal::from(12);
    let gross_annual = line.monthly_salary * months * line.fte;
    let employer_charges = gross_annual * constants.employer_charge_rate;
    let premium = if line.premium_eligible {
        constants.fixed_monthly_premium * constants.premium_surcharge_factor * months * line.fte
    } else {
        Decimal::ZERO
    };

    PayrollCost {
        id: line.id,
        title: line.title.clone(),
        fte: line.fte,
        monthly_salary: line.monthly_salary,
        premium_eligible: line.premium_eligible,
        gross_annual,
        employer_charges,
        premium,
        total_annual_cost: gross_annual + employer_charges + premium,
    }
}

/// Totals of a list of payroll costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayrollSummary {
    /// Per-line costs, in input order.
    pub details: Vec<PayrollCost>,
    /// Sum of FTE.
    pub total_fte: Decimal,
    /// Sum of gross annual pay (account 641).
    pub total_gross: Decimal,
    /// Sum of employer charges and premiums (account 645).
    pub total_charges: Decimal,
    /// Sum of total annual costs.
    pub total: Decimal,
}

/// Calculates every line of a staff list and totals them.
pub fn summarize_payroll(lines: &[PersonnelLine], constants: &PayrollConstants) -> PayrollSummary {
    let details: Vec<PayrollCost> = lines
        .iter()
        .map(|line| calculate_payroll(line, constants))
        .collect();

    PayrollSummary {
        total_fte: details.iter().map(|d| d.fte).sum(),
        total_gross: details.iter().map(|d| d.gross_annual).sum(),
        total_charges: details
            .iter()
            .map(|d| d.employer_charges + d.premium)
            .sum(),
        total: details.iter().map(|d| d.total_annual_cost).sum(),
        details,
    }
}
