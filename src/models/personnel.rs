//! Staffing line model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One staffing position owned by the Direction or by a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelLine {
    /// Identifier, unique within the owning list.
    pub id: u64,
    /// Position title (e.g. "Formateur").
    pub title: String,
    /// Full-time-equivalent count; fractional values allowed.
    #[serde(default)]
    pub fte: Decimal,
    /// Monthly base salary.
    #[serde(default)]
    pub monthly_salary: Decimal,
    /// Whether the position receives the fixed monthly wage premium.
    #[serde(default)]
    pub premium_eligible: bool,
}

impl PersonnelLine {
    /// Creates a personnel line.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        fte: Decimal,
        monthly_salary: Decimal,
        premium_eligible: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            fte,
            monthly_salary,
            premium_eligible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_personnel_line() {
        let json = r#"{
            "id": 2,
            "title": "Formateur",
            "fte": 4,
            "monthlySalary": 3200,
            "premiumEligible": true
        }"#;

        let line: PersonnelLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.id, 2);
        assert_eq!(line.title, "Formateur");
        assert_eq!(line.fte, Decimal::from(4));
        assert_eq!(line.monthly_salary, Decimal::from(3200));
        assert!(line.premium_eligible);
    }

    #[test]
    fn test_fractional_fte_and_missing_flag() {
        let json = r#"{ "id": 4, "title": "Psychologue", "fte": 0.5, "monthlySalary": 3200 }"#;

        let line: PersonnelLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.fte, Decimal::new(5, 1));
        assert!(!line.premium_eligible);
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let json = r#"{ "id": 4, "fte": 1, "monthlySalary": 3200 }"#;

        let err = serde_json::from_str::<PersonnelLine>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `title`"));
    }
}
