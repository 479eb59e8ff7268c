//! Audit trail models.
//!
//! Every figure in a [`crate::engine::BudgetReport`] can be traced back to the
//! step that produced it: which rule ran, with which inputs, and what it
//! concluded.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Chart-of-accounts reference for the figure, empty when not applicable.
    pub account_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Severity of an [`AuditWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Worth a look.
    Medium,
    /// Needs attention before the budget is presented.
    High,
}

/// A warning generated during calculation.
///
/// Warnings never block a calculation: a deficit or a service with no
/// activity yet are valid budget states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use budget_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        account_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            account_ref: account_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: WarningSeverity) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_numbers_steps_sequentially() {
        let mut trace = AuditTrace::default();
        trace.record(
            "payroll",
            "Payroll",
            "641/645",
            serde_json::json!({}),
            serde_json::json!({}),
            "first".to_string(),
        );
        trace.record(
            "amortization",
            "Amortization",
            "681",
            serde_json::json!({}),
            serde_json::json!({}),
            "second".to_string(),
        );

        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.steps[1].step_number, 2);
        assert_eq!(trace.steps[1].account_ref, "681");
    }

    #[test]
    fn test_warning_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&WarningSeverity::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_audit_trace_serialization() {
        let mut trace = AuditTrace::default();
        trace.warn("DEFICIT", "Service A runs a deficit".to_string(), WarningSeverity::Medium);
        trace.duration_us = 42;

        let json = serde_json::to_string(&trace).unwrap();
        let deserialized: AuditTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(trace, deserialized);
    }
}
