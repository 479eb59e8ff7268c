//! Depreciation and loan amortization for one investment.
//!
//! Depreciation is straight-line over the duration. The financing loan is a
//! fixed-payment amortizing loan over the same duration, simulated month by
//! month so that each year's interest charge can be reported separately.
//! A zero rate means a cash purchase: straight repayment with no interest.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::models::InvestmentLine;

use super::validators::DURATION_RANGE;

/// One year of the loan schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationYear {
    /// Year number, starting at 1.
    pub year: u32,
    /// Interest paid during the year.
    pub interest: Decimal,
    /// Principal repaid during the year.
    pub capital_repaid: Decimal,
    /// Outstanding balance at the end of the year, never negative.
    pub remaining_balance: Decimal,
}

/// Depreciation and financing figures for one investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationResult {
    /// Acquisition value.
    pub principal: Decimal,
    /// Duration in years after clamping to the accepted range.
    pub duration_years: u32,
    /// Annual loan rate in percent.
    pub annual_rate: Decimal,
    /// `principal / duration_years`.
    pub straight_line_depreciation: Decimal,
    /// Straight-line depreciation rate in percent, `100 / duration_years`.
    pub depreciation_rate: Decimal,
    /// Fixed monthly loan payment. Zero for a cash purchase.
    pub monthly_payment: Decimal,
    /// Year-by-year schedule, one entry per year of the duration.
    pub schedule: Vec<AmortizationYear>,
    /// Interest per year, one entry per year of the duration.
    pub interest_by_year: Vec<Decimal>,
    /// Total paid over the life of the loan.
    pub total_cost: Decimal,
    /// `total_cost - principal`.
    pub total_interest_cost: Decimal,
}

impl AmortizationResult {
    /// Interest for a zero-based year index; 0 beyond the duration.
    pub fn interest_for_year(&self, index: usize) -> Decimal {
        self.interest_by_year
            .get(index)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The interest charge used for the current budget year.
    pub fn first_year_interest(&self) -> Decimal {
        self.interest_for_year(0)
    }
}

/// Calculates depreciation and the loan schedule for one investment.
///
/// # Arguments
///
/// * `line` - The investment (principal, duration, annual rate in percent)
///
/// # Returns
///
/// An [`AmortizationResult`]. The duration is clamped to [`DURATION_RANGE`]
/// and intermediate products saturate instead of overflowing. With a
/// zero rate the principal is repaid in equal yearly parts and every interest
/// figure is zero. Otherwise the monthly payment follows the annuity formula
/// `M = P × r(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate and `n` the
/// number of months.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::calculate_amortization;
/// use budget_engine::models::InvestmentLine;
/// use rust_decimal::Decimal;
///
/// let result = calculate_amortization(&InvestmentLine::new(Decimal::from(120000), 10, Decimal::ZERO));
///
/// assert_eq!(result.straight_line_depreciation, Decimal::from(12000));
/// assert_eq!(result.schedule.len(), 10);
/// assert_eq!(result.first_year_interest(), Decimal::ZERO);
/// assert_eq!(result.schedule[9].remaining_balance, Decimal::ZERO);
/// ```
pub fn calculate_amortization(line: &InvestmentLine) -> AmortizationResult {
    let duration_years = line
        .duration_years
        .clamp(DURATION_RANGE.0 as u32, DURATION_RANGE.1 as u32);
    let months = duration_years.saturating_mul(12);
    let years = Decimal::from(duration_years);
    let principal = line.principal;

    let straight_line_depreciation = principal / years;
    let depreciation_rate = Decimal::ONE_HUNDRED / years;

    let (monthly_payment, schedule) = if line.annual_rate.is_zero() {
        (Decimal::ZERO, straight_repayment(principal, duration_years))
    } else {
        let monthly_rate = line.annual_rate / Decimal::ONE_HUNDRED / Decimal::from(12);
        let payment = annuity_payment(principal, monthly_rate, months);
        (
            payment,
            loan_schedule(principal, monthly_rate, payment, duration_years),
        )
    };

    let total_cost = if line.annual_rate.is_zero() {
        principal
    } else {
        monthly_payment.saturating_mul(Decimal::from(months))
    };

    AmortizationResult {
        principal,
        duration_years,
        annual_rate: line.annual_rate,
        straight_line_depreciation,
        depreciation_rate,
        monthly_payment,
        interest_by_year: schedule.iter().map(|y| y.interest).collect(),
        schedule,
        total_cost,
        total_interest_cost: total_cost.saturating_sub(principal),
    }
}

/// Fixed monthly payment of an amortizing loan.
///
/// Falls back to the interest-only limit `principal × r` when `(1+r)^n`
/// overflows.
fn annuity_payment(principal: Decimal, monthly_rate: Decimal, months: u32) -> Decimal {
    if principal.is_zero() {
        return Decimal::ZERO;
    }

    let growth = (Decimal::ONE + monthly_rate).checked_powi(i64::from(months));
    match growth {
        Some(growth) if growth > Decimal::ONE => {
            let numerator = principal.checked_mul(monthly_rate).and_then(|p| p.checked_mul(growth));
            match numerator {
                Some(numerator) => numerator / (growth - Decimal::ONE),
                None => principal.saturating_mul(monthly_rate),
            }
        }
        _ => principal.saturating_mul(monthly_rate),
    }
}

fn straight_repayment(principal: Decimal, duration_years: u32) -> Vec<AmortizationYear> {
    let yearly = principal / Decimal::from(duration_years);
    let mut balance = principal;

    (1..=duration_years)
        .map(|year| {
            let capital_repaid = if year == duration_years {
                balance
            } else {
                yearly.min(balance)
            };
            balance = (balance - capital_repaid).max(Decimal::ZERO);
            AmortizationYear {
                year,
                interest: Decimal::ZERO,
                capital_repaid,
                remaining_balance: balance,
            }
        })
        .collect()
}

fn loan_schedule(
    principal: Decimal,
    monthly_rate: Decimal,
    payment: Decimal,
    duration_years: u32,
) -> Vec<AmortizationYear> {
    let mut balance = principal;

    (1..=duration_years)
        .map(|year| {
            let mut interest = Decimal::ZERO;
            let mut capital_repaid = Decimal::ZERO;

            for _ in 0..12 {
                let month_interest = balance.saturating_mul(monthly_rate);
                let month_capital = payment.saturating_sub(month_interest).min(balance);
                interest = interest.saturating_add(month_interest);
                capital_repaid = capital_repaid.saturating_add(month_capital);
                balance = balance.saturating_sub(month_capital);
            }

            balance = balance.max(Decimal::ZERO);
            AmortizationYear {
                year,
                interest,
                capital_repaid,
                remaining_balance: balance,
            }
        })
        .collect()
}
