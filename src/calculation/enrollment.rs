//! Enrollment and delivery statistics.
//!
//! Headcounts are always derived from the initial headcount and the monthly
//! withdrawals; they are never clamped here, so a cohort with more
//! withdrawals than trainees reports a negative current headcount.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Cohort, Enrollment, MonthlyCounts};

/// Headcount figures for one cohort, one site, or a whole enrollment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadcountStats {
    /// Sum of initial headcounts.
    pub initial: i64,
    /// Sum of withdrawals over the year.
    pub withdrawals: i64,
    /// `initial - withdrawals`.
    pub current: i64,
    /// `current / initial × 100`, 0 when there was nobody to retain.
    pub retention_rate: Decimal,
}

impl HeadcountStats {
    fn from_totals(initial: i64, withdrawals: i64) -> Self {
        let current = initial - withdrawals;
        let retention_rate = if initial > 0 {
            Decimal::from(current) / Decimal::from(initial) * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        Self {
            initial,
            withdrawals,
            current,
            retention_rate,
        }
    }

    fn of_cohorts<'a>(cohorts: impl Iterator<Item = &'a Cohort>) -> Self {
        let (initial, withdrawals) = cohorts.fold((0i64, 0i64), |(i, w), cohort| {
            (
                i + i64::from(cohort.initial_headcount),
                w + cohort.withdrawals.total() as i64,
            )
        });
        Self::from_totals(initial, withdrawals)
    }
}

/// Statistics for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    /// Site the cohort belongs to.
    pub site: String,
    /// Cohort name.
    pub name: String,
    /// Headcount figures.
    pub headcount: HeadcountStats,
}

/// Statistics for one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    /// Site name.
    pub site: String,
    /// Headcount figures across the site's cohorts.
    pub headcount: HeadcountStats,
}

/// Enrollment statistics of a training service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingStats {
    /// Per cohort, grouped by site in site-name order.
    pub cohorts: Vec<CohortStats>,
    /// Per site, in site-name order.
    pub sites: Vec<SiteStats>,
    /// Across every site.
    pub overall: HeadcountStats,
}

/// Computes enrollment statistics per cohort, per site and overall.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::enrollment_stats;
/// use budget_engine::models::{Cohort, Enrollment, MonthlyCounts};
///
/// let mut enrollment = Enrollment::default();
/// enrollment.sites.insert(
///     "Metz".to_string(),
///     vec![Cohort {
///         name: "ES1".to_string(),
///         initial_headcount: 30,
///         withdrawals: MonthlyCounts::new([1, 0, 2, 0, 0, 0, 0, 0, 2, 0, 0, 0]),
///     }],
/// );
///
/// let stats = enrollment_stats(&enrollment);
/// assert_eq!(stats.overall.current, 25);
/// ```
pub fn enrollment_stats(enrollment: &Enrollment) -> TrainingStats {
    let mut cohorts = Vec::new();
    let mut sites = Vec::with_capacity(enrollment.sites.len());

    for (site, site_cohorts) in &enrollment.sites {
        for cohort in site_cohorts {
            cohorts.push(CohortStats {
                site: site.clone(),
                name: cohort.name.clone(),
                headcount: HeadcountStats::of_cohorts(std::iter::once(cohort)),
            });
        }
        sites.push(SiteStats {
            site: site.clone(),
            headcount: HeadcountStats::of_cohorts(site_cohorts.iter()),
        });
    }

    TrainingStats {
        cohorts,
        sites,
        overall: HeadcountStats::of_cohorts(enrollment.cohorts()),
    }
}

/// Delivery statistics of a fee-for-service activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeliveryStats {
    /// Deliveries per month, January first.
    pub monthly_deliveries: Vec<u32>,
    /// Sum of the twelve months.
    pub total_deliveries: u64,
    /// Price per delivery.
    pub unit_price: Decimal,
    /// `total_deliveries × unit_price`.
    pub estimated_revenue: Decimal,
}

/// Computes delivery totals and the revenue they generate.
pub fn delivery_stats(deliveries: &MonthlyCounts, unit_price: Decimal) -> DeliveryStats {
    let total_deliveries = deliveries.total();
    DeliveryStats {
        monthly_deliveries: deliveries.as_array().to_vec(),
        total_deliveries,
        unit_price,
        estimated_revenue: Decimal::from(total_deliveries) * unit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cohort(name: &str, initial: u32, withdrawals: [u32; 12]) -> Cohort {
        Cohort {
            name: name.to_string(),
            initial_headcount: initial,
            withdrawals: MonthlyCounts::new(withdrawals),
        }
    }

    fn sample_enrollment() -> Enrollment {
        let mut enrollment = Enrollment::default();
        enrollment.sites.insert(
            "Metz".to_string(),
            vec![
                cohort("ES1", 30, [0, 1, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0]),
                cohort("ES2", 20, [0; 12]),
            ],
        );
        enrollment.sites.insert(
            "Nancy".to_string(),
            vec![cohort("ME1", 10, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 5])],
        );
        enrollment
    }

    #[test]
    fn test_cohort_with_five_withdrawals() {
        let stats = enrollment_stats(&sample_enrollment());
        let es1 = &stats.cohorts[0];

        assert_eq!(es1.site, "Metz");
        assert_eq!(es1.name, "ES1");
        assert_eq!(es1.headcount.initial, 30);
        assert_eq!(es1.headcount.withdrawals, 5);
        assert_eq!(es1.headcount.current, 25);
    }

    #[test]
    fn test_site_and_overall_totals() {
        let stats = enrollment_stats(&sample_enrollment());

        assert_eq!(stats.sites.len(), 2);
        assert_eq!(stats.sites[0].headcount.initial, 50);
        assert_eq!(stats.sites[0].headcount.current, 45);
        assert_eq!(stats.sites[0].headcount.retention_rate, dec("90"));
        assert_eq!(stats.sites[1].headcount.retention_rate, dec("50"));
        assert_eq!(stats.overall.initial, 60);
        assert_eq!(stats.overall.withdrawals, 10);
        assert_eq!(stats.overall.current, 50);
    }

    #[test]
    fn test_negative_headcount_is_tolerated() {
        let mut enrollment = Enrollment::default();
        enrollment.sites.insert(
            "Thionville".to_string(),
            vec![cohort("X", 2, [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0])],
        );

        let stats = enrollment_stats(&enrollment);
        assert_eq!(stats.overall.current, -1);
        assert_eq!(stats.overall.retention_rate, dec("-50"));
    }

    #[test]
    fn test_empty_cohort_has_zero_retention() {
        let mut enrollment = Enrollment::default();
        enrollment
            .sites
            .insert("Metz".to_string(), vec![cohort("Vide", 0, [0; 12])]);

        let stats = enrollment_stats(&enrollment);
        assert_eq!(stats.overall.retention_rate, Decimal::ZERO);
    }

    #[test]
    fn test_empty_enrollment() {
        let stats = enrollment_stats(&Enrollment::default());
        assert!(stats.cohorts.is_empty());
        assert!(stats.sites.is_empty());
        assert_eq!(stats.overall, HeadcountStats::default());
    }

    #[test]
    fn test_delivery_stats() {
        let deliveries = MonthlyCounts::new([10, 10, 10, 10, 10, 10, 0, 0, 10, 10, 10, 10]);
        let stats = delivery_stats(&deliveries, dec("150"));

        assert_eq!(stats.total_deliveries, 100);
        assert_eq!(stats.estimated_revenue, dec("15000"));
        assert_eq!(stats.monthly_deliveries.len(), 12);
    }
}
