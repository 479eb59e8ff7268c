//! Budget computation: snapshot in, report out.
//!
//! [`compute_budget`] runs every calculator over one snapshot and records an
//! audit step for each figure it derives, so a reader of the report can see
//! which rule produced which number from which inputs.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::calculation::{
    ActivitySummary, DirectionBudget, IncomeStatement, MonthlyBreakdown, OperatingReserve,
    OrganizationSummary, Projection, Provisions, ServiceBudget, WorkingCapital,
    build_income_statement, calculate_direction_budget, calculate_operating_reserve,
    calculate_provisions, calculate_service_budget, calculate_working_capital, monthly_breakdown,
    net_treasury, project_three_years, summarize_organization,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{AuditTrace, BudgetSnapshot, TurnoverBasis, WarningSeverity};

/// The complete result of a budget computation.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    /// Unique identifier of this computation.
    pub calculation_id: Uuid,
    /// When the computation ran.
    pub timestamp: DateTime<Utc>,
    /// Version of this crate.
    pub engine_version: String,
    /// Organization name from the configuration.
    pub organization: String,
    /// Version of the snapshot that was computed.
    pub snapshot_version: String,
    /// Direction budget.
    pub direction: DirectionBudget,
    /// Service budgets, in snapshot order.
    pub services: Vec<ServiceBudget>,
    /// Provisions.
    pub provisions: Provisions,
    /// Working-capital requirement.
    pub working_capital: WorkingCapital,
    /// Operating reserve.
    pub operating_reserve: OperatingReserve,
    /// Operating reserve minus working-capital requirement.
    pub net_treasury: Decimal,
    /// Charges against revenue, organization-wide and per service.
    pub summary: OrganizationSummary,
    /// Three-year projection.
    pub projection: Projection,
    /// Annual budget with its monthly split.
    pub monthly_breakdown: MonthlyBreakdown,
    /// Forecast income statement.
    pub income_statement: IncomeStatement,
    /// Audit trail of the computation.
    pub audit_trace: AuditTrace,
}

/// Computes every budget view for a snapshot.
///
/// # Arguments
///
/// * `snapshot` - The budget document; it is validated first
/// * `config` - Payroll constants, calendar and chart of accounts
///
/// # Returns
///
/// The [`BudgetReport`], or `InvalidEntity` if the snapshot breaks a
/// structural invariant. Deficits and zero volumes never fail; they are
/// reported as warnings in the audit trace.
///
/// # Examples
///
/// ```
/// use budget_engine::config::EngineConfig;
/// use budget_engine::engine::compute_budget;
/// use budget_engine::models::BudgetSnapshot;
///
/// let snapshot = BudgetSnapshot::from_json(r#"{ "services": [] }"#).unwrap();
/// let report = compute_budget(&snapshot, &EngineConfig::default()).unwrap();
///
/// assert!(report.services.is_empty());
/// assert_eq!(report.projection.years.len(), 3);
/// ```
pub fn compute_budget(snapshot: &BudgetSnapshot, config: &EngineConfig) -> EngineResult<BudgetReport> {
    let start_time = Instant::now();
    snapshot.validate()?;

    let params = &snapshot.global_params;
    let mut trace = AuditTrace::default();

    let direction = calculate_direction_budget(&snapshot.direction, config);
    record_direction(&mut trace, &direction);

    let services: Vec<ServiceBudget> = snapshot
        .services
        .iter()
        .map(|service| calculate_service_budget(service, config))
        .collect();
    for (service, budget) in snapshot.services.iter().zip(&services) {
        record_service(&mut trace, budget, service.activity.kind());
        warn_service(&mut trace, budget);
    }

    let provisions = calculate_provisions(&direction, &services, params);
    trace.record(
        "provisions",
        "Provisions",
        "15",
        serde_json::json!({
            "payroll_base": provisions.payroll_base.to_string(),
            "investment_base": provisions.investment_base.to_string(),
            "revenue_base": provisions.revenue_base.to_string(),
            "rules": provisions.details.len()
        }),
        serde_json::json!({
            "total": provisions.total.to_string()
        }),
        format!(
            "{} provision rule(s) applied for a total of {}",
            provisions.details.len(),
            provisions.total
        ),
    );

    let working_capital =
        calculate_working_capital(&direction, &services, params, config.days_per_year());
    trace.record(
        "working_capital",
        "Working Capital Requirement",
        "",
        serde_json::json!({
            "revenue_base": working_capital.revenue_base.to_string(),
            "purchases_base": working_capital.purchases_base.to_string(),
            "stocks": working_capital.stocks.to_string(),
            "client_payment_delay_days": params.client_payment_delay_days,
            "supplier_payment_delay_days": params.supplier_payment_delay_days
        }),
        serde_json::json!({
            "receivables": working_capital.receivables.to_string(),
            "payables": working_capital.payables.to_string(),
            "bfr": working_capital.bfr.to_string(),
            "bfr_in_days": working_capital.bfr_in_days.to_string()
        }),
        format!(
            "BFR = {} + {} - {} = {}",
            working_capital.stocks,
            working_capital.receivables,
            working_capital.payables,
            working_capital.bfr
        ),
    );
    if params.turnover_basis == TurnoverBasis::Cost && !services.is_empty() {
        trace.warn(
            "TURNOVER_APPROXIMATED_BY_COST",
            "Provisions and working capital use total service cost as turnover".to_string(),
            WarningSeverity::Low,
        );
    }

    let operating_reserve =
        calculate_operating_reserve(&services, params, params.depreciation_years_elapsed);
    let treasury = net_treasury(&operating_reserve, &working_capital);
    trace.record(
        "operating_reserve",
        "Operating Reserve",
        "10/28",
        serde_json::json!({
            "permanent_capital_total": operating_reserve.permanent_capital_total.to_string(),
            "gross_fixed_assets": operating_reserve.gross_fixed_assets.to_string(),
            "years_elapsed": operating_reserve.years_elapsed
        }),
        serde_json::json!({
            "accumulated_depreciation": operating_reserve.accumulated_depreciation.to_string(),
            "net_fixed_assets": operating_reserve.net_fixed_assets.to_string(),
            "operating_reserve": operating_reserve.operating_reserve.to_string(),
            "net_treasury": treasury.to_string()
        }),
        format!(
            "Operating reserve {} minus BFR {} leaves net treasury of {}",
            operating_reserve.operating_reserve, working_capital.bfr, treasury
        ),
    );

    let summary = summarize_organization(&direction, &services);
    if !summary.surplus {
        trace.warn(
            "ORGANIZATION_DEFICIT",
            format!(
                "Organization charges {} exceed revenue {} by {}",
                summary.total_charges,
                summary.total_revenue,
                -summary.global_balance
            ),
            WarningSeverity::High,
        );
    }

    let projection = project_three_years(&direction, &services, params.annual_growth_rate);
    trace.record(
        "projection",
        "Three-Year Projection",
        "",
        serde_json::json!({
            "annual_growth_rate": params.annual_growth_rate.to_string(),
            "direction_cost": direction.total.to_string(),
            "services": services.len()
        }),
        serde_json::json!({
            "totals": projection
                .years
                .iter()
                .map(|y| y.total_cost.to_string())
                .collect::<Vec<_>>(),
            "evolution": projection.evolution.to_string()
        }),
        format!(
            "Payroll and operating costs escalated at {}% per year",
            params.annual_growth_rate
        ),
    );
    if let Some(first) = projection.years.first() {
        if first.unallocated_overhead > Decimal::ZERO && !services.is_empty() {
            trace.warn(
                "UNALLOCATED_OVERHEAD",
                format!(
                    "{} of Direction cost could not be allocated: no service has any volume",
                    first.unallocated_overhead
                ),
                WarningSeverity::Low,
            );
        }
    }

    let monthly = monthly_breakdown(&direction, &services);
    let income_statement = build_income_statement(&direction, &services);
    trace.record(
        "income_statement",
        "Income Statement",
        "6/7",
        serde_json::json!({
            "total_charges": income_statement.total_charges.to_string(),
            "total_products": income_statement.total_products.to_string()
        }),
        serde_json::json!({
            "result": income_statement.result.to_string(),
            "surplus": income_statement.surplus
        }),
        format!(
            "Products {} - charges {} = {}",
            income_statement.total_products,
            income_statement.total_charges,
            income_statement.result
        ),
    );

    trace.duration_us = start_time.elapsed().as_micros() as u64;

    Ok(BudgetReport {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        organization: config.organization().name.clone(),
        snapshot_version: snapshot.version.clone(),
        direction,
        services,
        provisions,
        working_capital,
        operating_reserve,
        net_treasury: treasury,
        summary,
        projection,
        monthly_breakdown: monthly,
        income_statement,
        audit_trace: trace,
    })
}

fn record_direction(trace: &mut AuditTrace, direction: &DirectionBudget) {
    trace.record(
        "direction_budget",
        "Direction Budget",
        "641/645",
        serde_json::json!({
            "personnel": direction.payroll_details.len(),
            "rent_annual": direction.rent_annual.to_string(),
            "utilities_annual": direction.utilities_annual.to_string(),
            "other_charges_annual": direction.other_charges_annual.to_string()
        }),
        serde_json::json!({
            "payroll_total": direction.payroll_total.to_string(),
            "flat_charges_annual": direction.flat_charges_annual.to_string(),
            "total": direction.total.to_string()
        }),
        format!(
            "Direction payroll {} + flat charges {} = {}",
            direction.payroll_total, direction.flat_charges_annual, direction.total
        ),
    );
}

fn record_service(trace: &mut AuditTrace, budget: &ServiceBudget, activity: &str) {
    trace.record(
        "service_payroll",
        "Service Payroll",
        "641/645",
        serde_json::json!({
            "service_id": budget.service_id,
            "personnel": budget.payroll_details.len(),
            "total_fte": budget.total_fte.to_string()
        }),
        serde_json::json!({
            "gross": budget.payroll_gross.to_string(),
            "charges": budget.payroll_charges.to_string(),
            "total": budget.payroll_total.to_string()
        }),
        format!(
            "'{}': gross {} + charges and premiums {} = {}",
            budget.service_name, budget.payroll_gross, budget.payroll_charges, budget.payroll_total
        ),
    );

    trace.record(
        "service_investments",
        "Service Depreciation and Interest",
        "681/661",
        serde_json::json!({
            "service_id": budget.service_id,
            "total_principal": budget.total_principal.to_string()
        }),
        serde_json::json!({
            "depreciation": budget.depreciation_total.to_string(),
            "interest_by_year": budget
                .interest_by_year
                .iter()
                .map(Decimal::to_string)
                .collect::<Vec<_>>()
        }),
        format!(
            "'{}': depreciation {} and first-year interest {}",
            budget.service_name, budget.depreciation_total, budget.interest_total
        ),
    );

    trace.record(
        "service_total",
        "Service Budget",
        "",
        serde_json::json!({
            "service_id": budget.service_id,
            "activity": activity,
            "payroll": budget.payroll_total.to_string(),
            "operating": budget.operating_total.to_string(),
            "interest": budget.interest_total.to_string(),
            "depreciation": budget.depreciation_total.to_string(),
            "annual_unit_volume": budget.annual_unit_volume.to_string()
        }),
        serde_json::json!({
            "grand_total": budget.grand_total.to_string(),
            "cost_per_unit": budget.cost_per_unit.to_string(),
            "revenue_total": budget.revenue_total.to_string(),
            "balance": budget.balance.to_string()
        }),
        format!(
            "'{}': total {} against revenue {}, balance {}",
            budget.service_name, budget.grand_total, budget.revenue_total, budget.balance
        ),
    );
}

fn warn_service(trace: &mut AuditTrace, budget: &ServiceBudget) {
    if budget.is_deficit() {
        trace.warn(
            "SERVICE_DEFICIT",
            format!("'{}' runs a deficit of {}", budget.service_name, -budget.balance),
            WarningSeverity::Medium,
        );
    }

    match &budget.activity {
        ActivitySummary::Training { stats, .. } => {
            for cohort in stats.cohorts.iter().filter(|c| c.headcount.current < 0) {
                trace.warn(
                    "NEGATIVE_HEADCOUNT",
                    format!(
                        "'{}' cohort '{}' at {} has {} withdrawals for {} trainees",
                        budget.service_name,
                        cohort.name,
                        cohort.site,
                        cohort.headcount.withdrawals,
                        cohort.headcount.initial
                    ),
                    WarningSeverity::Medium,
                );
            }
        }
        _ if budget.annual_unit_volume.is_zero() => {
            trace.warn(
                "ZERO_VOLUME",
                format!(
                    "'{}' has no activity volume; cost per unit is reported as 0",
                    budget.service_name
                ),
                WarningSeverity::Low,
            );
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{
        Activity, Cohort, Direction, Enrollment, GlobalParameters, InvestmentLine, LineItem,
        MonthlyCounts, PersonnelLine, Service,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn reference_snapshot() -> BudgetSnapshot {
        let mut service = Service::new(1, "Accueil de jour");
        service.activity = Activity::Generic {
            unit_count: 10,
            activity_rate: dec("100"),
        };
        service
            .personnel
            .push(PersonnelLine::new(1, "Éducateur", dec("1"), dec("3000"), true));
        service.investments.vehicle = InvestmentLine::new(dec("24000"), 2, Decimal::ZERO);
        service.expenses.push(LineItem {
            id: 1,
            label: "Carburant".to_string(),
            monthly_amount: dec("500"),
        });
        service.revenues.push(LineItem {
            id: 1,
            label: "Subventions".to_string(),
            monthly_amount: dec("2000"),
        });

        BudgetSnapshot::new(GlobalParameters::default(), Direction::default(), vec![service])
    }

    #[test]
    fn test_reference_scenario() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();
        let service = &report.services[0];

        assert_eq!(service.payroll_total, dec("55175.52"));
        assert_eq!(service.depreciation_total, dec("12000"));
        assert_eq!(service.grand_total, dec("73175.52"));
        assert_eq!(service.revenue_total, dec("24000"));
        assert_eq!(service.balance, dec("-49175.52"));
        assert_eq!(service.annual_unit_volume, dec("3650"));
        assert_eq!(report.summary.global_balance, dec("-49175.52"));
    }

    #[test]
    fn test_report_metadata() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();

        assert_eq!(report.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(report.snapshot_version, "2.0");
        assert_eq!(report.organization, "Association");
    }

    #[test]
    fn test_audit_steps_are_numbered() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();
        let steps = &report.audit_trace.steps;

        assert!(!steps.is_empty());
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(steps[0].rule_id, "direction_budget");
        assert!(steps.iter().any(|s| s.rule_id == "service_payroll" && s.account_ref == "641/645"));
        assert!(steps.iter().any(|s| s.rule_id == "projection"));
    }

    #[test]
    fn test_service_total_step_names_activity_kind() {
        let mut snapshot = reference_snapshot();
        snapshot.services[0].activity = Activity::Training {
            activity_rate: dec("100"),
            enrollment: Enrollment::default(),
        };

        let report = compute_budget(&snapshot, &EngineConfig::default()).unwrap();
        let step = report
            .audit_trace
            .steps
            .iter()
            .find(|s| s.rule_id == "service_total")
            .unwrap();
        assert_eq!(step.input["activity"], "training");
        assert_eq!(step.input["service_id"], 1);
    }

    #[test]
    fn test_deficit_is_a_warning_not_an_error() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();
        let codes: Vec<&str> = report
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();

        assert!(codes.contains(&"SERVICE_DEFICIT"));
        assert!(codes.contains(&"ORGANIZATION_DEFICIT"));
    }

    #[test]
    fn test_zero_volume_warning() {
        let mut snapshot = reference_snapshot();
        snapshot.services[0].activity = Activity::default();

        let report = compute_budget(&snapshot, &EngineConfig::default()).unwrap();
        assert!(report.audit_trace.warnings.iter().any(|w| w.code == "ZERO_VOLUME"));
        assert!(!report.audit_trace.warnings.iter().any(|w| w.code == "UNALLOCATED_OVERHEAD"));
    }

    #[test]
    fn test_negative_headcount_warning() {
        let mut enrollment = Enrollment::default();
        enrollment.sites.insert(
            "Metz".to_string(),
            vec![Cohort {
                name: "ES1".to_string(),
                initial_headcount: 1,
                withdrawals: MonthlyCounts::new([3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            }],
        );
        let mut snapshot = reference_snapshot();
        snapshot.services[0].activity = Activity::Training {
            activity_rate: dec("100"),
            enrollment,
        };

        let report = compute_budget(&snapshot, &EngineConfig::default()).unwrap();
        let warning = report
            .audit_trace
            .warnings
            .iter()
            .find(|w| w.code == "NEGATIVE_HEADCOUNT")
            .unwrap();
        assert_eq!(warning.severity, WarningSeverity::Medium);
        assert!(warning.message.contains("ES1"));
    }

    #[test]
    fn test_net_treasury_is_reserve_minus_bfr() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();

        assert_eq!(
            report.net_treasury,
            report.operating_reserve.operating_reserve - report.working_capital.bfr
        );
        assert_eq!(report.operating_reserve.accumulated_depreciation, dec("12000"));
    }

    #[test]
    fn test_invalid_snapshot_is_rejected() {
        let mut snapshot = reference_snapshot();
        snapshot.services[0].investments.works = InvestmentLine::new(dec("1000"), 0, Decimal::ZERO);

        let result = compute_budget(&snapshot, &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::InvalidEntity { .. })));
    }

    #[test]
    fn test_report_serializes() {
        let report = compute_budget(&reference_snapshot(), &EngineConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["services"][0]["service_name"], "Accueil de jour");
        assert_eq!(json["projection"]["years"].as_array().unwrap().len(), 3);
        assert_eq!(json["services"][0]["activity"]["kind"], "generic");
    }
}
