//! Forecast income statement (compte de résultat) by chart-of-accounts code.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::organization::DirectionBudget;
use super::service_budget::ServiceBudget;

/// Account for headquarters rent.
pub const RENT_ACCOUNT: &str = "613";
/// Account for headquarters service charges.
pub const UTILITIES_ACCOUNT: &str = "614";
/// Account for other headquarters charges.
pub const OTHER_CHARGES_ACCOUNT: &str = "6";
/// Accounts for wages and social charges.
pub const PERSONNEL_ACCOUNT: &str = "641/645";
/// Account for depreciation allowances.
pub const DEPRECIATION_ACCOUNT: &str = "681";
/// Account for loan interest.
pub const INTEREST_ACCOUNT: &str = "661";

/// One line of the statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementLine {
    /// Label.
    pub label: String,
    /// Chart-of-accounts code.
    pub account: String,
    /// Annual amount.
    pub amount: Decimal,
}

impl StatementLine {
    fn new(label: impl Into<String>, account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            account: account.into(),
            amount,
        }
    }
}

/// A titled group of lines with its total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementSection {
    /// Lines, in reporting order.
    pub lines: Vec<StatementLine>,
    /// Sum of the lines.
    pub total: Decimal,
}

impl StatementSection {
    fn from_lines(lines: Vec<StatementLine>) -> Self {
        let total = lines.iter().map(|l| l.amount).sum();
        Self { lines, total }
    }
}

/// Forecast income statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomeStatement {
    /// Class 60-62: purchases and external charges.
    pub purchases: StatementSection,
    /// Class 64: personnel.
    pub personnel: StatementSection,
    /// Class 68: depreciation allowances.
    pub depreciation: StatementSection,
    /// Class 66: financial charges.
    pub financial: StatementSection,
    /// Sum of the charge sections.
    pub total_charges: Decimal,
    /// Class 70: sales and services.
    pub sales: StatementSection,
    /// Class 74: operating grants.
    pub grants: StatementSection,
    /// Class 75: other operating income.
    pub other_income: StatementSection,
    /// Sum of the product sections.
    pub total_products: Decimal,
    /// `total_products - total_charges`.
    pub result: Decimal,
    /// Whether the result is a surplus.
    pub surplus: bool,
}

/// Builds the income statement.
///
/// Service expenses are grouped by account, labelled with the first label
/// seen for that account. Revenue lines are reported per service and sorted
/// into classes 70, 74 and 75 by account prefix.
pub fn build_income_statement(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
) -> IncomeStatement {
    let mut by_account: BTreeMap<&str, (&str, Decimal)> = BTreeMap::new();
    for item in services.iter().flat_map(|s| &s.operating_details) {
        let entry = by_account
            .entry(item.account.as_str())
            .or_insert((item.label.as_str(), Decimal::ZERO));
        entry.1 += item.annual_amount;
    }
    let mut purchase_lines: Vec<StatementLine> = by_account
        .into_iter()
        .map(|(account, (label, amount))| StatementLine::new(label, account, amount))
        .collect();
    purchase_lines.push(StatementLine::new("Loyer siège", RENT_ACCOUNT, direction.rent_annual));
    purchase_lines.push(StatementLine::new(
        "Charges siège",
        UTILITIES_ACCOUNT,
        direction.utilities_annual,
    ));
    purchase_lines.push(StatementLine::new(
        "Autres charges siège",
        OTHER_CHARGES_ACCOUNT,
        direction.other_charges_annual,
    ));

    let mut personnel_lines = vec![StatementLine::new(
        "Personnel Direction",
        PERSONNEL_ACCOUNT,
        direction.payroll_total,
    )];
    personnel_lines.extend(services.iter().map(|s| {
        StatementLine::new(
            format!("Personnel {}", s.service_name),
            PERSONNEL_ACCOUNT,
            s.payroll_total,
        )
    }));

    let depreciation_lines = services
        .iter()
        .filter(|s| s.depreciation_total > Decimal::ZERO)
        .map(|s| {
            StatementLine::new(
                format!("Amortissements {}", s.service_name),
                DEPRECIATION_ACCOUNT,
                s.depreciation_total,
            )
        })
        .collect();

    let financial_lines = services
        .iter()
        .filter(|s| s.interest_total > Decimal::ZERO)
        .map(|s| {
            StatementLine::new(
                format!("Intérêts emprunts {}", s.service_name),
                INTEREST_ACCOUNT,
                s.interest_total,
            )
        })
        .collect();

    let mut sales = Vec::new();
    let mut grants = Vec::new();
    let mut other_income = Vec::new();
    for service in services {
        for item in &service.revenue_details {
            let line = StatementLine::new(
                format!("{} ({})", item.label, service.service_name),
                item.account.clone(),
                item.annual_amount,
            );
            if item.account.starts_with("74") {
                grants.push(line);
            } else if item.account.starts_with("75") {
                other_income.push(line);
            } else {
                sales.push(line);
            }
        }
    }

    let purchases = StatementSection::from_lines(purchase_lines);
    let personnel = StatementSection::from_lines(personnel_lines);
    let depreciation = StatementSection::from_lines(depreciation_lines);
    let financial = StatementSection::from_lines(financial_lines);
    let sales = StatementSection::from_lines(sales);
    let grants = StatementSection::from_lines(grants);
    let other_income = StatementSection::from_lines(other_income);

    let total_charges = purchases.total + personnel.total + depreciation.total + financial.total;
    let total_products = sales.total + grants.total + other_income.total;
    let result = total_products - total_charges;

    IncomeStatement {
        purchases,
        personnel,
        depreciation,
        financial,
        total_charges,
        sales,
        grants,
        other_income,
        total_products,
        result,
        surplus: result >= Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{calculate_direction_budget, calculate_service_budget};
    use crate::config::EngineConfig;
    use crate::models::{Activity, Direction, InvestmentLine, LineItem, PersonnelLine, Service};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(id: u64, label: &str, monthly: &str) -> LineItem {
        LineItem {
            id,
            label: label.to_string(),
            monthly_amount: dec(monthly),
        }
    }

    fn fixture() -> (DirectionBudget, Vec<ServiceBudget>) {
        let config = EngineConfig::default();
        let direction = Direction {
            personnel: vec![PersonnelLine::new(1, "Directeur", dec("1"), dec("4000"), false)],
            rent: dec("1000"),
            utilities: dec("300"),
            other_charges: dec("200"),
        };

        let mut a = Service::new(1, "Formation");
        a.activity = Activity::Generic {
            unit_count: 10,
            activity_rate: dec("100"),
        };
        a.expenses = vec![item(1, "Fournitures", "100"), item(2, "Carburant", "50")];
        a.revenues = vec![item(1, "Subventions", "1000"), item(2, "Cotisations", "100")];
        a.investments.building = InvestmentLine::new(dec("100000"), 5, dec("3"));

        let mut b = Service::new(2, "Accompagnement");
        b.expenses = vec![item(1, "Fournitures", "200"), item(2, "Inconnu", "10")];
        b.revenues = vec![item(1, "Frais de formation", "500")];

        (
            calculate_direction_budget(&direction, &config),
            vec![
                calculate_service_budget(&a, &config),
                calculate_service_budget(&b, &config),
            ],
        )
    }

    #[test]
    fn test_purchases_are_grouped_by_account() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        let accounts: Vec<&str> = statement
            .purchases
            .lines
            .iter()
            .map(|l| l.account.as_str())
            .collect();
        assert_eq!(accounts, vec!["6", "6061", "6064", "613", "614", "6"]);

        let supplies = &statement.purchases.lines[2];
        assert_eq!(supplies.label, "Fournitures");
        assert_eq!(supplies.amount, dec("3600"));
        assert_eq!(statement.purchases.total, dec("4320") + dec("18000"));
    }

    #[test]
    fn test_personnel_lines_per_owner() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        assert_eq!(statement.personnel.lines.len(), 3);
        assert_eq!(statement.personnel.lines[0].label, "Personnel Direction");
        assert_eq!(statement.personnel.lines[0].amount, dec("68160"));
        assert_eq!(statement.personnel.lines[1].label, "Personnel Formation");
        assert!(statement.personnel.lines.iter().all(|l| l.account == "641/645"));
    }

    #[test]
    fn test_depreciation_and_interest_skip_empty_services() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        assert_eq!(statement.depreciation.lines.len(), 1);
        assert_eq!(statement.depreciation.total, dec("20000"));
        assert_eq!(statement.financial.lines.len(), 1);
        assert_eq!(statement.financial.lines[0].account, "661");
        assert_eq!(statement.financial.total, services[0].interest_total);
    }

    #[test]
    fn test_products_are_classified() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        assert_eq!(statement.grants.total, dec("12000"));
        assert_eq!(statement.grants.lines[0].label, "Subventions (Formation)");
        assert_eq!(statement.other_income.total, dec("1200"));
        assert_eq!(statement.other_income.lines[0].account, "756");
        assert_eq!(statement.sales.total, dec("6000"));
        assert_eq!(statement.total_products, dec("19200"));
    }

    #[test]
    fn test_result() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        assert_eq!(
            statement.total_charges,
            statement.purchases.total
                + statement.personnel.total
                + statement.depreciation.total
                + statement.financial.total
        );
        assert_eq!(statement.result, statement.total_products - statement.total_charges);
        assert!(!statement.surplus);
    }

    #[test]
    fn test_charges_match_organization_totals() {
        let (direction, services) = fixture();
        let statement = build_income_statement(&direction, &services);

        let expected = direction.total + services.iter().map(|s| s.grand_total).sum::<Decimal>();
        assert_eq!(statement.total_charges, expected);
    }
}
