//! Service budget aggregation.
//!
//! Combines payroll, operating expenses, investments and activity volume of
//! one service into its annual cost, cost per unit and balance against
//! revenue.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::models::{Activity, InvestmentCategory, LineItem, Service};

use super::amortization::{AmortizationResult, calculate_amortization};
use super::enrollment::{DeliveryStats, TrainingStats, delivery_stats, enrollment_stats};
use super::payroll::{PayrollCost, summarize_payroll};

/// Number of projection years for which interest is broken out.
pub const PROJECTION_YEARS: usize = 3;

/// Label under which fee-for-service revenue is reported.
pub const DELIVERY_REVENUE_LABEL: &str = "Prestations de services";

/// One monthly line item with its account and annual amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAmount {
    /// Identifier of the source line, 0 for derived lines.
    pub id: u64,
    /// Label.
    pub label: String,
    /// Chart-of-accounts code.
    pub account: String,
    /// Monthly amount.
    pub monthly_amount: Decimal,
    /// `monthly_amount × 12`.
    pub annual_amount: Decimal,
}

impl LineAmount {
    fn from_item(item: &LineItem, account: &str) -> Self {
        Self {
            id: item.id,
            label: item.label.clone(),
            account: account.to_string(),
            monthly_amount: item.monthly_amount,
            annual_amount: item.annual_amount(),
        }
    }
}

/// Amortization of one investment category with its accounting metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentDetail {
    /// Category.
    pub category: InvestmentCategory,
    /// Fixed-asset account code.
    pub account: String,
    /// Account label.
    pub label: String,
    /// Depreciation and loan figures.
    pub amortization: AmortizationResult,
}

/// Activity-specific figures of a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivitySummary {
    /// Capacity at an activity rate.
    Generic {
        /// Number of units.
        unit_count: u32,
        /// Activity rate in percent.
        activity_rate: Decimal,
    },
    /// Training enrollment.
    Training {
        /// Attendance rate in percent.
        activity_rate: Decimal,
        /// Headcount statistics.
        stats: TrainingStats,
    },
    /// Fee-for-service deliveries.
    FeeForService {
        /// Delivery statistics.
        stats: DeliveryStats,
    },
}

/// Annual budget of one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceBudget {
    /// Service identifier.
    pub service_id: u64,
    /// Service name.
    pub service_name: String,
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
    /// Annual operating expenses.
    pub operating_total: Decimal,
    /// Per-line operating expenses.
    pub operating_details: Vec<LineAmount>,
    /// Annual straight-line depreciation across categories.
    pub depreciation_total: Decimal,
    /// First-year interest across categories.
    pub interest_total: Decimal,
    /// Interest for years 1 to 3 across categories.
    pub interest_by_year: [Decimal; PROJECTION_YEARS],
    /// Per-category amortization, in category order.
    pub investment_details: Vec<InvestmentDetail>,
    /// Sum of investment principals.
    pub total_principal: Decimal,
    /// Annual activity volume in units.
    pub annual_unit_volume: Decimal,
    /// `payroll + operating + interest`.
    pub total_before_depreciation: Decimal,
    /// `total_before_depreciation + depreciation`.
    pub grand_total: Decimal,
    /// `grand_total / annual_unit_volume`, 0 when there is no volume or for
    /// training services.
    pub cost_per_unit: Decimal,
    /// Annual revenue.
    pub revenue_total: Decimal,
    /// Per-line revenue.
    pub revenue_details: Vec<LineAmount>,
    /// `revenue_total - grand_total`; negative means a deficit.
    pub balance: Decimal,
    /// Activity-specific figures.
    pub activity: ActivitySummary,
}

impl ServiceBudget {
    /// Whether revenue falls short of cost.
    pub fn is_deficit(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

/// Calculates the annual budget of one service.
///
/// # Arguments
///
/// * `service` - The service to budget
/// * `config` - Payroll constants, calendar and chart of accounts
///
/// # Returns
///
/// A [`ServiceBudget`]. The annual unit volume depends on the activity:
/// - generic: `unit_count × activity_rate / 100 × days_per_year`
/// - training: `current headcount × activity_rate / 100 × days_per_year`,
///   informational only; cost per unit is not defined and reported as 0
/// - fee-for-service: total deliveries, with revenue `deliveries × unit_price`
///   replacing the revenue lines
///
/// `grand_total = payroll + operating + first-year interest + depreciation`.
pub fn calculate_service_budget(service: &Service, config: &EngineConfig) -> ServiceBudget {
    let accounts = config.accounts();
    let payroll = summarize_payroll(&service.personnel, config.payroll());

    let operating_details: Vec<LineAmount> = service
        .expenses
        .iter()
        .map(|item| LineAmount::from_item(item, accounts.expense_account(&item.label)))
        .collect();
    let operating_total: Decimal = operating_details.iter().map(|l| l.annual_amount).sum();

    let mut depreciation_total = Decimal::ZERO;
    let mut interest_by_year = [Decimal::ZERO; PROJECTION_YEARS];
    let mut investment_details = Vec::with_capacity(InvestmentCategory::ALL.len());
    for (category, line) in service.investments.iter() {
        let amortization = calculate_amortization(line);
        depreciation_total += amortization.straight_line_depreciation;
        for (year, slot) in interest_by_year.iter_mut().enumerate() {
            *slot += amortization.interest_for_year(year);
        }
        investment_details.push(InvestmentDetail {
            category,
            account: category.account().to_string(),
            label: category.label().to_string(),
            amortization,
        });
    }
    let interest_total = interest_by_year[0];

    let days = config.days_per_year();
    let (annual_unit_volume, activity, delivery_revenue) = match &service.activity {
        Activity::Generic {
            unit_count,
            activity_rate,
        } => (
            Decimal::from(*unit_count) * (*activity_rate / Decimal::ONE_HUNDRED) * days,
            ActivitySummary::Generic {
                unit_count: *unit_count,
                activity_rate: *activity_rate,
            },
            None,
        ),
        Activity::Training {
            activity_rate,
            enrollment,
        } => {
            let stats = enrollment_stats(enrollment);
            let attending = Decimal::from(stats.overall.current.max(0));
            (
                attending * (*activity_rate / Decimal::ONE_HUNDRED) * days,
                ActivitySummary::Training {
                    activity_rate: *activity_rate,
                    stats,
                },
                None,
            )
        }
        Activity::FeeForService {
            unit_price,
            deliveries,
        } => {
            let stats = delivery_stats(deliveries, *unit_price);
            let revenue = stats.estimated_revenue;
            (
                Decimal::from(stats.total_deliveries),
                ActivitySummary::FeeForService { stats },
                Some(revenue),
            )
        }
    };

    let total_before_depreciation = payroll.total + operating_total + interest_total;
    let grand_total = total_before_depreciation + depreciation_total;
    let cost_per_unit = match &activity {
        ActivitySummary::Training { .. } => Decimal::ZERO,
        _ if annual_unit_volume > Decimal::ZERO => grand_total / annual_unit_volume,
        _ => Decimal::ZERO,
    };

    let revenue_details: Vec<LineAmount> = match delivery_revenue {
        Some(annual) => vec![LineAmount {
            id: 0,
            label: DELIVERY_REVENUE_LABEL.to_string(),
            account: accounts.revenue_account(DELIVERY_REVENUE_LABEL).to_string(),
            monthly_amount: annual / Decimal::from(12),
            annual_amount: annual,
        }],
        None => service
            .revenues
            .iter()
            .map(|item| LineAmount::from_item(item, accounts.revenue_account(&item.label)))
            .collect(),
    };
    let revenue_total: Decimal = revenue_details.iter().map(|l| l.annual_amount).sum();

    ServiceBudget {
        service_id: service.id,
        service_name: service.name.clone(),
        total_fte: payroll.total_fte,
        payroll_total: payroll.total,
        payroll_gross: payroll.total_gross,
        payroll_charges: payroll.total_charges,
        payroll_details: payroll.details,
        operating_total,
        operating_details,
        depreciation_total,
        interest_total,
        interest_by_year,
        investment_details,
        total_principal: service.investments.total_principal(),
        annual_unit_volume,
        total_before_depreciation,
        grand_total,
        cost_per_unit,
        revenue_total,
        revenue_details,
        balance: revenue_total - grand_total,
        activity,
    }
}
