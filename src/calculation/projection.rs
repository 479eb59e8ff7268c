//! Three-year cost projection.
//!
//! Payroll and operating costs escalate by the annual growth rate;
//! depreciation and loan interest follow their fixed schedules. The
//! Direction's cost is allocated to services in proportion to their unit
//! volume for reporting, but only counted once in the organization total.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use super::organization::DirectionBudget;
use super::service_budget::{PROJECTION_YEARS, ServiceBudget};

/// One service's figures for a projection year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceProjection {
    /// Service identifier.
    pub service_id: u64,
    /// Service name.
    pub service_name: String,
    /// Escalated payroll and operating cost.
    pub escalated_cost: Decimal,
    /// Depreciation for the year.
    pub depreciation: Decimal,
    /// Interest for the year.
    pub interest: Decimal,
    /// `escalated_cost + depreciation + interest`.
    pub cost_excluding_overhead: Decimal,
    /// Share of the total unit volume, as a fraction.
    pub volume_share: Decimal,
    /// Direction cost allocated by volume share.
    pub allocated_overhead: Decimal,
    /// `cost_excluding_overhead + allocated_overhead`.
    pub fully_loaded_cost: Decimal,
    /// Annual unit volume.
    pub unit_volume: Decimal,
    /// Fully-loaded cost per unit, 0 without volume.
    pub cost_per_unit: Decimal,
    /// Cost per unit before overhead allocation, 0 without volume.
    pub cost_per_unit_excluding_overhead: Decimal,
}

/// Organization figures for one projection year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProjection {
    /// Year number, 1 to 3.
    pub year: u32,
    /// `(1 + growth / 100)^(year - 1)`.
    pub growth_factor: Decimal,
    /// Direction cost plus every service's cost excluding overhead.
    pub total_cost: Decimal,
    /// `total_cost / total_unit_volume`, 0 without volume.
    pub cost_per_unit: Decimal,
    /// Depreciation across services.
    pub total_depreciation: Decimal,
    /// Interest across services for the year.
    pub total_interest: Decimal,
    /// Unit volume across services.
    pub total_unit_volume: Decimal,
    /// Escalated Direction cost.
    pub direction_cost: Decimal,
    /// Direction cost not allocated to any service (all of it when there
    /// is no volume).
    pub unallocated_overhead: Decimal,
    /// Per service, in input order.
    pub services: Vec<ServiceProjection>,
}

/// The three projection years and the evolution between the first and last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Years 1 to 3.
    pub years: Vec<YearProjection>,
    /// `year3.total_cost / year1.total_cost - 1`, 0 when year 1 costs nothing.
    pub evolution: Decimal,
}

/// Projects organization cost over three years.
///
/// # Arguments
///
/// * `direction` - The Direction budget
/// * `services` - Every service budget
/// * `annual_growth_rate` - Escalation of payroll and operating costs, in percent
///
/// # Returns
///
/// A [`Projection`] of three years. For year `y` the growth factor is
/// `(1 + rate/100)^(y-1)`. Each service's volume share is its unit volume
/// over the total (0 when the total is 0) and drives the overhead allocation.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::{DirectionBudget, project_three_years};
/// use rust_decimal::Decimal;
///
/// let direction = DirectionBudget {
///     payroll_total: Decimal::from(100000),
///     total: Decimal::from(100000),
///     ..Default::default()
/// };
/// let projection = project_three_years(&direction, &[], Decimal::from(10));
///
/// assert_eq!(projection.years[1].direction_cost, Decimal::from(110000));
/// assert_eq!(projection.years[2].direction_cost, Decimal::from(121000));
/// ```
pub fn project_three_years(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
    annual_growth_rate: Decimal,
) -> Projection {
    let total_unit_volume: Decimal = services.iter().map(|s| s.annual_unit_volume).sum();
    let growth = Decimal::ONE + annual_growth_rate / Decimal::ONE_HUNDRED;

    let years: Vec<YearProjection> = (0..PROJECTION_YEARS)
        .map(|index| {
            let growth_factor = growth.powi(index as i64);
            project_year(direction, services, index, growth_factor, total_unit_volume)
        })
        .collect();

    let evolution = match (years.first(), years.last()) {
        (Some(first), Some(last)) if first.total_cost > Decimal::ZERO => {
            last.total_cost / first.total_cost - Decimal::ONE
        }
        _ => Decimal::ZERO,
    };

    Projection { years, evolution }
}

fn project_year(
    direction: &DirectionBudget,
    services: &[ServiceBudget],
    index: usize,
    growth_factor: Decimal,
    total_unit_volume: Decimal,
) -> YearProjection {
    let direction_cost = (direction.payroll_total + direction.flat_charges_annual) * growth_factor;

    let details: Vec<ServiceProjection> = services
        .iter()
        .map(|service| {
            let escalated_cost = (service.payroll_total + service.operating_total) * growth_factor;
            let depreciation = service.depreciation_total;
            let interest = service.interest_by_year.get(index).copied().unwrap_or_default();
            let cost_excluding_overhead = escalated_cost + depreciation + interest;

            let volume_share = if total_unit_volume > Decimal::ZERO {
                service.annual_unit_volume / total_unit_volume
            } else {
                Decimal::ZERO
            };
            let allocated_overhead = direction_cost * volume_share;
            let fully_loaded_cost = cost_excluding_overhead + allocated_overhead;
            let unit_volume = service.annual_unit_volume;
            let (cost_per_unit, cost_per_unit_excluding_overhead) = if unit_volume > Decimal::ZERO {
                (
                    fully_loaded_cost / unit_volume,
                    cost_excluding_overhead / unit_volume,
                )
            } else {
                (Decimal::ZERO, Decimal::ZERO)
            };

            ServiceProjection {
                service_id: service.service_id,
                service_name: service.service_name.clone(),
                escalated_cost,
                depreciation,
                interest,
                cost_excluding_overhead,
                volume_share,
                allocated_overhead,
                fully_loaded_cost,
                unit_volume,
                cost_per_unit,
                cost_per_unit_excluding_overhead,
            }
        })
        .collect();

    let total_cost =
        direction_cost + details.iter().map(|d| d.cost_excluding_overhead).sum::<Decimal>();
    let allocated: Decimal = details.iter().map(|d| d.allocated_overhead).sum();

    YearProjection {
        year: index as u32 + 1,
        growth_factor,
        total_cost,
        cost_per_unit: if total_unit_volume > Decimal::ZERO {
            total_cost / total_unit_volume
        } else {
            Decimal::ZERO
        },
        total_depreciation: details.iter().map(|d| d.depreciation).sum(),
        total_interest: details.iter().map(|d| d.interest).sum(),
        total_unit_volume,
        direction_cost,
        unallocated_overhead: (direction_cost - allocated).max(Decimal::ZERO),
        services: details,
    }
}
