//! Calculation logic for the Budget Engine.
//!
//! This module contains the pure calculators: input clamping, payroll cost,
//! depreciation and loan amortization, enrollment and delivery statistics,
//! service and Direction budgets, provisions, working capital, operating
//! reserve, the three-year projection, the monthly breakdown and the income
//! statement. None of them perform I/O or log.

mod amortization;
mod enrollment;
mod income_statement;
mod monthly_breakdown;
mod organization;
mod payroll;
mod projection;
mod service_budget;
mod validators;

pub use amortization::{AmortizationResult, AmortizationYear, calculate_amortization};
pub use enrollment::{
    CohortStats, DeliveryStats, HeadcountStats, SiteStats, TrainingStats, delivery_stats,
    enrollment_stats,
};
pub use income_statement::{
    DEPRECIATION_ACCOUNT, INTEREST_ACCOUNT, IncomeStatement, OTHER_CHARGES_ACCOUNT,
    PERSONNEL_ACCOUNT, RENT_ACCOUNT, StatementLine, StatementSection, UTILITIES_ACCOUNT,
    build_income_statement,
};
pub use monthly_breakdown::{MonthBudget, MonthlyBreakdown, monthly_breakdown};
pub use organization::{
    DirectionBudget, OperatingReserve, OrganizationSummary, ProvisionAmount, Provisions,
    ServiceBalance, WorkingCapital, calculate_direction_budget, calculate_operating_reserve,
    calculate_provisions, calculate_working_capital, net_treasury, summarize_organization,
    turnover,
};
pub use payroll::{PayrollCost, PayrollSummary, calculate_payroll, summarize_payroll};
pub use projection::{Projection, ServiceProjection, YearProjection, project_three_years};
pub use service_budget::{
    ActivitySummary, DELIVERY_REVENUE_LABEL, InvestmentDetail, LineAmount, PROJECTION_YEARS,
    ServiceBudget, calculate_service_budget,
};
pub use validators::{
    DURATION_RANGE, MAX_AMOUNT, MAX_DAYS, MAX_FTE, MAX_RATE, MAX_SALARY, UNIT_RANGE,
    clamp_decimal, clamp_integer, clamp_number, validate_amount, validate_days,
    validate_duration, validate_fte, validate_rate, validate_salary, validate_units,
};
