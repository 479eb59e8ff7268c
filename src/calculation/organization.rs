//! Organization-wide views.
//!
//! Every view here is a pure function of the Direction budget, the service
//! budgets and the global parameters, so they can be computed in any order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::models::{Direction, GlobalParameters, ProvisionBase, TurnoverBasis};

use super::payroll::{PayrollCost, summarize_payroll};
use super::service_budget::ServiceBudget;

/// Annual budget of the Direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectionBudget {
    /// Sum of FTE.
    pub total_fte: Decimal,
    /// Total annual payroll cost.
    pub payroll_total: Decimal,
    /// Gross pay part of the payroll.
    pub payroll_gross: Decimal,
    /// Employer charges and premiums part of the payroll.
    pub payroll_charges: Decimal,
    /// Per-line payroll costs.
    pub payroll_details: Vec<PayrollCost>,
    /// Annual rent.
    pub rent_annual: Decimal,
    /// Annual utilities.
    pub utilities_annual: Decimal,
    /// Annual other charges.
    pub other_charges_annual: Decimal,
    /// Sum of the three flat charges over twelve months.
    pub flat_charges_annual: Decimal,
    /// `payroll_total + flat_charges_annual`.
    pub total: Decimal,
}

/// Calculates the Direction's annual budget.
pub fn calculate_direction_budget(direction: &Direction, config: &EngineConfig) -> DirectionBudget {
    let payroll = summarize_payroll(&direction.personnel, config.payroll());
    let months = Decimal::from(12);
    let flat_charges_annual = direction.flat_charges_annual();

    DirectionBudget {
        total_fte: payroll.total_fte,
        payroll_total: payroll.total,
        payroll_gross: payroll.total_gross,
        payroll_charges: payroll.total_charges,
        payroll_details: payroll.details,
        rent_annual: direction.rent * months,
        utilities_annual: direction.utilities * months,
        other_charges_annual: direction.other_charges * months,
        flat_charges_annual,
        total: payroll.total + flat_charges_annual,
    }
}

/// Turnover figure for provisions and working capital.
///
/// With [`TurnoverBasis::Cost`] this is the sum of service grand totals,
/// the organization's historical approximation of turnover.
pub fn turnover(services: &[ServiceBudget], basis: TurnoverBasis) -> Decimal {
    match basis {
        TurnoverBasis::Cost => services.iter().map(|s| s.grand_total).sum(),
        TurnoverBasis::Revenue => services.iter().map(|s| s.revenue_total).sum(),
    }
}

/// One computed provision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionAmount {
    /// Identifier of the rule.
    pub id: u64,
    /// Label of the rule.
    pub label: String,
    /// Base the rate applies to.
    pub base: ProvisionBase,
    /// Value of the base.
    pub base_amount: Decimal,
    /// Rate in percent.
    pub rate: Decimal,
    /// `base_amount × rate / 100`.
    pub amount: Decimal,
}

/// All provisions with their bases.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provisions {
    /// Direction and service payroll.
    pub payroll_base: Decimal,
    /// Investment principal across services.
    pub investment_base: Decimal,
    /// Turnover.
    pub revenue_base: Decimal,
    /// One entry per rule, in rule order.
    pub details: Vec<ProvisionAmount>,
    /// Sum of the provisions.
    pub total: Decimal,
}

/// Calculates every configured provision.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::{DirectionBudget, calculate_provisions};
/// use budget_engine::models::GlobalParameters;
/// use rust_decimal::Decimal;
///
/// let direction = DirectionBudget {
///     payroll_total: Decimal::from(100000),
///     ..Default::default()
/// };
/// let provisions = calculate_provisions(&direction, &[], &GlobalParameters::default());
///
/// // 10% paid-leave provision on payroll, nothing else.
/// assert_eq!(provisions.total, Decimal::from(10000));
/// ```
pub fn calculate_provisions(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
    params: &GlobalParameters,
) -> Provisions {
    let payroll_base =
        direction.payroll_total + services.iter().map(|s| s.payroll_total).sum::<Decimal>();
    let investment_base: Decimal = services.iter().map(|s| s.total_principal).sum();
    let revenue_base = turnover(services, params.turnover_basis);

    let details: Vec<ProvisionAmount> = params
        .provision_rules
        .iter()
        .map(|rule| {
            let base_amount = match rule.base {
                ProvisionBase::Payroll => payroll_base,
                ProvisionBase::Investments => investment_base,
                ProvisionBase::Revenue => revenue_base,
            };
            ProvisionAmount {
                id: rule.id,
                label: rule.label.clone(),
                base: rule.base,
                base_amount,
                rate: rule.rate,
                amount: base_amount * rule.rate / Decimal::ONE_HUNDRED,
            }
        })
        .collect();

    Provisions {
        payroll_base,
        investment_base,
        revenue_base,
        total: details.iter().map(|d| d.amount).sum(),
        details,
    }
}

/// Working-capital requirement (BFR).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkingCapital {
    /// Inventory value.
    pub stocks: Decimal,
    /// `revenue_base / days × client delay`.
    pub receivables: Decimal,
    /// `purchases_base / days × supplier delay`.
    pub payables: Decimal,
    /// `stocks + receivables - payables`.
    pub bfr: Decimal,
    /// `bfr / revenue_base × days`, 0 without turnover.
    pub bfr_in_days: Decimal,
    /// Turnover.
    pub revenue_base: Decimal,
    /// Direction flat charges plus service operating expenses.
    pub purchases_base: Decimal,
}

/// Calculates the working-capital requirement.
///
/// Longer client delays raise the requirement; longer supplier delays lower it.
pub fn calculate_working_capital(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
    params: &GlobalParameters,
    days_per_year: Decimal,
) -> WorkingCapital {
    let revenue_base = turnover(services, params.turnover_basis);
    let purchases_base = direction.flat_charges_annual
        + services.iter().map(|s| s.operating_total).sum::<Decimal>();

    let (receivables, payables) = if days_per_year > Decimal::ZERO {
        (
            revenue_base / days_per_year * Decimal::from(params.client_payment_delay_days),
            purchases_base / days_per_year * Decimal::from(params.supplier_payment_delay_days),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let stocks = params.inventory_value;
    let bfr = stocks + receivables - payables;
    let bfr_in_days = if revenue_base > Decimal::ZERO {
        bfr / revenue_base * days_per_year
    } else {
        Decimal::ZERO
    };

    WorkingCapital {
        stocks,
        receivables,
        payables,
        bfr,
        bfr_in_days,
        revenue_base,
        purchases_base,
    }
}

/// Operating reserve (fonds de roulement).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperatingReserve {
    /// Sum of permanent-capital lines.
    pub permanent_capital_total: Decimal,
    /// Sum of investment principals.
    pub gross_fixed_assets: Decimal,
    /// Depreciation accumulated over the elapsed years.
    pub accumulated_depreciation: Decimal,
    /// `gross_fixed_assets - accumulated_depreciation`.
    pub net_fixed_assets: Decimal,
    /// `permanent_capital_total - net_fixed_assets`.
    pub operating_reserve: Decimal,
    /// Years of depreciation assumed accumulated.
    pub years_elapsed: u32,
}

/// Calculates the operating reserve.
///
/// Accumulated depreciation is, per investment, the straight-line annual
/// figure times `min(years_elapsed, duration)`.
pub fn calculate_operating_reserve(
    services: &[ServiceBudget],
    params: &GlobalParameters,
    years_elapsed: u32,
) -> OperatingReserve {
    let permanent_capital_total: Decimal =
        params.permanent_capital.iter().map(|c| c.amount).sum();

    let mut gross_fixed_assets = Decimal::ZERO;
    let mut accumulated_depreciation = Decimal::ZERO;
    for detail in services.iter().flat_map(|s| &s.investment_details) {
        let amortization = &detail.amortization;
        let years = years_elapsed.min(amortization.duration_years);
        gross_fixed_assets += amortization.principal;
        accumulated_depreciation += amortization.straight_line_depreciation * Decimal::from(years);
    }
    let net_fixed_assets = gross_fixed_assets - accumulated_depreciation;

    OperatingReserve {
        permanent_capital_total,
        gross_fixed_assets,
        accumulated_depreciation,
        net_fixed_assets,
        operating_reserve: permanent_capital_total - net_fixed_assets,
        years_elapsed,
    }
}

/// Net treasury: operating reserve minus working-capital requirement.
pub fn net_treasury(reserve: &OperatingReserve, working_capital: &WorkingCapital) -> Decimal {
    reserve.operating_reserve - working_capital.bfr
}

/// Balance of one service in the organization summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceBalance {
    /// Service identifier.
    pub service_id: u64,
    /// Service name.
    pub service_name: String,
    /// Annual cost.
    pub charges: Decimal,
    /// Annual revenue.
    pub revenue: Decimal,
    /// `revenue - charges`.
    pub balance: Decimal,
    /// Whether the service runs a surplus (zero counts as balanced, not deficit).
    pub surplus: bool,
}

/// Organization-wide charges, revenue and balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationSummary {
    /// Direction total.
    pub direction_charges: Decimal,
    /// Sum of service grand totals.
    pub service_charges: Decimal,
    /// `direction_charges + service_charges`.
    pub total_charges: Decimal,
    /// Sum of service revenue.
    pub total_revenue: Decimal,
    /// `total_revenue - total_charges`.
    pub global_balance: Decimal,
    /// Whether the organization as a whole runs a surplus.
    pub surplus: bool,
    /// Per service, in input order.
    pub services: Vec<ServiceBalance>,
}

/// Summarizes charges against revenue for the organization.
pub fn summarize_organization(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
) -> OrganizationSummary {
    let service_charges: Decimal = services.iter().map(|s| s.grand_total).sum();
    let total_revenue: Decimal = services.iter().map(|s| s.revenue_total).sum();
    let total_charges = direction.total + service_charges;
    let global_balance = total_revenue - total_charges;

    OrganizationSummary {
        direction_charges: direction.total,
        service_charges,
        total_charges,
        total_revenue,
        global_balance,
        surplus: global_balance >= Decimal::ZERO,
        services: services
            .iter()
            .map(|s| ServiceBalance {
                service_id: s.service_id,
                service_name: s.service_name.clone(),
                charges: s.grand_total,
                revenue: s.revenue_total,
                balance: s.balance,
                surplus: s.balance >= Decimal::ZERO,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_service_budget;
    use crate::models::{Activity, CapitalLine, InvestmentLine, LineItem, PersonnelLine, Service};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn direction() -> Direction {
        Direction {
            personnel: vec![PersonnelLine::new(1, "Directeur", dec("1"), dec("4000"), false)],
            rent: dec("1000"),
            utilities: dec("300"),
            other_charges: dec("200"),
        }
    }

    fn service(id: u64, units: u32, principal: &str, opex: &str, revenue: &str) -> Service {
        let mut service = Service::new(id, format!("Service {}", id));
        service.activity = Activity::Generic {
            unit_count: units,
            activity_rate: dec("100"),
        };
        service.personnel.push(PersonnelLine::new(1, "Éducateur", dec("1"), dec("3000"), true));
        service.investments.building = InvestmentLine::new(dec(principal), 10, Decimal::ZERO);
        service.expenses.push(LineItem {
            id: 1,
            label: "Fournitures".to_string(),
            monthly_amount: dec(opex),
        });
        service.revenues.push(LineItem {
            id: 1,
            label: "Subventions".to_string(),
            monthly_amount: dec(revenue),
        });
        service
    }

    fn budgets(services: &[Service]) -> Vec<ServiceBudget> {
        services
            .iter()
            .map(|s| calculate_service_budget(s, &EngineConfig::default()))
            .collect()
    }

    #[test]
    fn test_direction_budget() {
        let budget = calculate_direction_budget(&direction(), &EngineConfig::default());

        assert_eq!(budget.payroll_total, dec("68160"));
        assert_eq!(budget.rent_annual, dec("12000"));
        assert_eq!(budget.flat_charges_annual, dec("18000"));
        assert_eq!(budget.total, dec("86160"));
    }

    #[test]
    fn test_provisions_with_default_rules() {
        let config = EngineConfig::default();
        let dir = calculate_direction_budget(&direction(), &config);
        let services = budgets(&[service(1, 10, "100000", "500", "2000")]);

        let provisions = calculate_provisions(&dir, &services, &GlobalParameters::default());

        assert_eq!(provisions.payroll_base, dec("68160") + dec("55175.52"));
        assert_eq!(provisions.investment_base, dec("100000"));
        assert_eq!(provisions.revenue_base, services[0].grand_total);
        assert_eq!(provisions.details.len(), 3);
        assert_eq!(provisions.details[0].amount, provisions.payroll_base * dec("0.1"));
        assert_eq!(provisions.details[1].amount, dec("2000"));
        assert_eq!(
            provisions.total,
            provisions.details.iter().map(|d| d.amount).sum::<Decimal>()
        );
    }

    #[test]
    fn test_provisions_on_true_revenue() {
        let dir = DirectionBudget::default();
        let services = budgets(&[service(1, 10, "0", "0", "2000")]);
        let params = GlobalParameters {
            turnover_basis: TurnoverBasis::Revenue,
            ..GlobalParameters::default()
        };

        let provisions = calculate_provisions(&dir, &services, &params);
        assert_eq!(provisions.revenue_base, dec("24000"));
        assert_eq!(provisions.details[2].amount, dec("240"));
    }

    #[test]
    fn test_working_capital() {
        let config = EngineConfig::default();
        let dir = calculate_direction_budget(&direction(), &config);
        let services = budgets(&[service(1, 10, "0", "500", "2000")]);
        let params = GlobalParameters {
            inventory_value: dec("1000"),
            ..GlobalParameters::default()
        };

        let wc = calculate_working_capital(&dir, &services, &params, dec("365"));

        assert_eq!(wc.revenue_base, dec("61175.52"));
        assert_eq!(wc.purchases_base, dec("24000"));
        assert_eq!(wc.receivables, dec("61175.52") / dec("365") * dec("30"));
        assert_eq!(wc.payables, dec("24000") / dec("365") * dec("30"));
        assert_eq!(wc.bfr, dec("1000") + wc.receivables - wc.payables);
        assert_eq!(wc.bfr_in_days, wc.bfr / wc.revenue_base * dec("365"));
    }

    #[test]
    fn test_working_capital_without_turnover() {
        let wc = calculate_working_capital(
            &DirectionBudget::default(),
            &[],
            &GlobalParameters::default(),
            dec("365"),
        );
        assert_eq!(wc.bfr, Decimal::ZERO);
        assert_eq!(wc.bfr_in_days, Decimal::ZERO);
    }

    #[test]
    fn test_operating_reserve() {
        let services = budgets(&[service(1, 10, "100000", "0", "0")]);
        let params = GlobalParameters {
            permanent_capital: vec![
                CapitalLine {
                    id: 1,
                    label: "Réserves".to_string(),
                    amount: dec("50000"),
                },
                CapitalLine {
                    id: 2,
                    label: "Report à nouveau".to_string(),
                    amount: dec("70000"),
                },
            ],
            ..GlobalParameters::default()
        };

        let reserve = calculate_operating_reserve(&services, &params, 1);
        assert_eq!(reserve.permanent_capital_total, dec("120000"));
        assert_eq!(reserve.gross_fixed_assets, dec("100000"));
        assert_eq!(reserve.accumulated_depreciation, dec("10000"));
        assert_eq!(reserve.net_fixed_assets, dec("90000"));
        assert_eq!(reserve.operating_reserve, dec("30000"));

        let later = calculate_operating_reserve(&services, &params, 25);
        assert_eq!(later.accumulated_depreciation, dec("100000"));
        assert_eq!(later.net_fixed_assets, Decimal::ZERO);
    }

    #[test]
    fn test_net_treasury() {
        let reserve = OperatingReserve {
            operating_reserve: dec("30000"),
            ..Default::default()
        };
        let wc = WorkingCapital {
            bfr: dec("12000"),
            ..Default::default()
        };
        assert_eq!(net_treasury(&reserve, &wc), dec("18000"));
    }

    #[test]
    fn test_organization_summary() {
        let config = EngineConfig::default();
        let dir = calculate_direction_budget(&direction(), &config);
        let services = budgets(&[
            service(1, 10, "0", "0", "10000"),
            service(2, 10, "0", "0", "1000"),
        ]);

        let summary = summarize_organization(&dir, &services);

        assert_eq!(summary.total_charges, dir.total + dec("55175.52") * dec("2"));
        assert_eq!(summary.total_revenue, dec("132000"));
        assert_eq!(summary.global_balance, summary.total_revenue - summary.total_charges);
        assert!(!summary.surplus);
        assert!(summary.services[0].surplus);
        assert!(!summary.services[1].surplus);
    }

    proptest! {
        #[test]
        fn prop_client_delay_raises_bfr(delay in 0u32..365, extra in 1u32..=30) {
            let services = budgets(&[service(1, 10, "0", "500", "2000")]);
            let dir = DirectionBudget::default();
            let mut params = GlobalParameters {
                client_payment_delay_days: delay,
                ..GlobalParameters::default()
            };
            let before = calculate_working_capital(&dir, &services, &params, dec("365")).bfr;
            params.client_payment_delay_days = delay + extra;
            let after = calculate_working_capital(&dir, &services, &params, dec("365")).bfr;

            prop_assert!(after > before);
        }

        #[test]
        fn prop_supplier_delay_lowers_bfr(delay in 0u32..365, extra in 1u32..=30) {
            let services = budgets(&[service(1, 10, "0", "500", "2000")]);
            let dir = DirectionBudget::default();
            let mut params = GlobalParameters {
                supplier_payment_delay_days: delay,
                ..GlobalParameters::default()
            };
            let before = calculate_working_capital(&dir, &services, &params, dec("365")).bfr;
            params.supplier_payment_delay_days = delay + extra;
            let after = calculate_working_capital(&dir, &services, &params, dec("365")).bfr;

            prop_assert!(after < before);
        }
    }
}
