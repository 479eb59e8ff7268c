//! Service model: one budget-owning organizational activity.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExpenseLine, InvestmentPlan, PersonnelLine, RevenueLine};

/// Number of calendar-month slots in a yearly record.
pub const MONTHS_PER_YEAR: usize = 12;

/// Twelve monthly counts, January first.
///
/// # Example
///
/// ```
/// use budget_engine::models::MonthlyCounts;
///
/// let mut counts = MonthlyCounts::default();
/// counts.set(0, 3);
/// counts.set(11, 2);
/// assert_eq!(counts.total(), 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyCounts([u32; MONTHS_PER_YEAR]);

impl MonthlyCounts {
    /// Creates a record from twelve counts.
    pub fn new(counts: [u32; MONTHS_PER_YEAR]) -> Self {
        Self(counts)
    }

    /// Count for a month index (0 = January). Out-of-range indices read as 0.
    pub fn get(&self, month: usize) -> u32 {
        self.0.get(month).copied().unwrap_or(0)
    }

    /// Sets the count for a month index. Out-of-range indices are ignored.
    pub fn set(&mut self, month: usize, count: u32) {
        if let Some(slot) = self.0.get_mut(month) {
            *slot = count;
        }
    }

    /// Sum of the twelve slots.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// The raw slots.
    pub fn as_array(&self) -> &[u32; MONTHS_PER_YEAR] {
        &self.0
    }
}

/// A tracked group of trainees at one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    /// Cohort name (e.g. "ES 1ère année").
    pub name: String,
    /// Headcount at the start of the year.
    #[serde(default)]
    pub initial_headcount: u32,
    /// Withdrawals per calendar month.
    #[serde(default)]
    pub withdrawals: MonthlyCounts,
}

impl Cohort {
    /// Initial headcount minus every withdrawal. Negative when withdrawals
    /// exceed the initial headcount; this is never stored.
    pub fn current_headcount(&self) -> i64 {
        i64::from(self.initial_headcount) - self.withdrawals.total() as i64
    }
}

/// Training enrollment: site name to cohorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enrollment {
    /// Cohorts grouped by site.
    pub sites: BTreeMap<String, Vec<Cohort>>,
}

impl Enrollment {
    /// Iterates every cohort across every site.
    pub fn cohorts(&self) -> impl Iterator<Item = &Cohort> {
        self.sites.values().flatten()
    }
}

/// What a service does, and therefore which volume fields are authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Activity {
    /// Capacity in units (places, beneficiaries) at an activity rate.
    Generic {
        /// Number of units.
        #[serde(default)]
        unit_count: u32,
        /// Activity rate in percent.
        #[serde(default)]
        activity_rate: Decimal,
    },
    /// Training with enrollment tracked by site and cohort.
    Training {
        /// Attendance rate in percent applied to the current headcount.
        #[serde(default)]
        activity_rate: Decimal,
        /// Enrollment by site.
        #[serde(default)]
        enrollment: Enrollment,
    },
    /// Fee-for-service with monthly delivery counts.
    FeeForService {
        /// Price per delivery.
        #[serde(default)]
        unit_price: Decimal,
        /// Deliveries per calendar month.
        #[serde(default)]
        deliveries: MonthlyCounts,
    },
}

impl Default for Activity {
    /// A generic service with no capacity yet.
    fn default() -> Self {
        Activity::Generic {
            unit_count: 0,
            activity_rate: Decimal::ZERO,
        }
    }
}

impl Activity {
    /// Short machine name of the activity type.
    pub fn kind(&self) -> &'static str {
        match self {
            Activity::Generic { .. } => "generic",
            Activity::Training { .. } => "training",
            Activity::FeeForService { .. } => "fee_for_service",
        }
    }
}

/// The budget owner for one organizational activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Identifier, unique across services.
    pub id: u64,
    /// Service name.
    pub name: String,
    /// Activity type and its volume data.
    #[serde(default)]
    pub activity: Activity,
    /// Staff.
    #[serde(default)]
    pub personnel: Vec<PersonnelLine>,
    /// Investments, one per category.
    #[serde(default)]
    pub investments: InvestmentPlan,
    /// Monthly operating expenses.
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
    /// Monthly revenue.
    #[serde(default)]
    pub revenues: Vec<RevenueLine>,
}

impl Service {
    /// Creates an empty generic service.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            activity: Activity::default(),
            personnel: Vec::new(),
            investments: InvestmentPlan::default(),
            expenses: Vec::new(),
            revenues: Vec::new(),
        }
    }

    /// Copies this service as a template for a new one: same structure,
    /// new identifier and name.
    pub fn duplicate_as(&self, id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..self.clone()
        }
    }
}
