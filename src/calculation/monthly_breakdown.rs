//! Annual budget with a uniform monthly split.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::MONTHS_PER_YEAR;

use super::organization::DirectionBudget;
use super::service_budget::ServiceBudget;

/// One month of the annual budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBudget {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Payroll for the month.
    pub payroll: Decimal,
    /// Operating charges for the month.
    pub operating: Decimal,
    /// Depreciation for the month.
    pub depreciation: Decimal,
    /// Interest for the month.
    pub interest: Decimal,
    /// Sum of the four.
    pub total: Decimal,
}

/// Organization annual budget by nature, with its monthly split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBreakdown {
    /// Direction and service payroll.
    pub payroll: Decimal,
    /// Direction flat charges and service operating expenses.
    pub operating: Decimal,
    /// Service depreciation.
    pub depreciation: Decimal,
    /// Service first-year interest.
    pub interest: Decimal,
    /// Sum of the four.
    pub annual_total: Decimal,
    /// Twelve equal months.
    pub months: Vec<MonthBudget>,
}

/// Splits the organization's annual budget evenly over twelve months.
pub fn monthly_breakdown(direction: &DirectionBudget, services: &[ServiceBudget]) -> MonthlyBreakdown {
    let payroll = direction.payroll_total + services.iter().map(|s| s.payroll_total).sum::<Decimal>();
    let operating =
        direction.flat_charges_annual + services.iter().map(|s| s.operating_total).sum::<Decimal>();
    let depreciation: Decimal = services.iter().map(|s| s.depreciation_total).sum();
    let interest: Decimal = services.iter().map(|s| s.interest_total).sum();
    let annual_total = payroll + operating + depreciation + interest;

    let months_count = Decimal::from(MONTHS_PER_YEAR as u32);
    let months = (1..=MONTHS_PER_YEAR as u32)
        .map(|month| MonthBudget {
            month,
            payroll: payroll / months_count,
            operating: operating / months_count,
            depreciation: depreciation / months_count,
            interest: interest / months_count,
            total: annual_total / months_count,
        })
        .collect();

    MonthlyBreakdown {
        payroll,
        operating,
        depreciation,
        interest,
        annual_total,
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_uniform_split() {
        let direction = DirectionBudget {
            payroll_total: dec("120000"),
            flat_charges_annual: dec("24000"),
            total: dec("144000"),
            ..Default::default()
        };

        let breakdown = monthly_breakdown(&direction, &[]);

        assert_eq!(breakdown.annual_total, dec("144000"));
        assert_eq!(breakdown.months.len(), 12);
        assert_eq!(breakdown.months[0].month, 1);
        assert_eq!(breakdown.months[11].month, 12);
        for month in &breakdown.months {
            assert_eq!(month.payroll, dec("10000"));
            assert_eq!(month.operating, dec("2000"));
            assert_eq!(month.total, dec("12000"));
        }
    }

    #[test]
    fn test_empty_organization() {
        let breakdown = monthly_breakdown(&DirectionBudget::default(), &[]);
        assert_eq!(breakdown.annual_total, Decimal::ZERO);
        assert!(breakdown.months.iter().all(|m| m.total.is_zero()));
    }
}
