//! Budget snapshot: the document the persistence layer hands to the engine.
//!
//! Parsing is done entity by entity so that a structurally broken snapshot
//! is rejected with the offending entity named, rather than with a bare
//! serde position.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

use super::{Direction, GlobalParameters, LineItem, PersonnelLine, Service};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: &str = "2.0";

/// One complete budget document.
///
/// # Example
///
/// ```
/// use budget_engine::models::BudgetSnapshot;
///
/// let snapshot = BudgetSnapshot::from_json(r#"{ "version": "2.0", "services": [] }"#).unwrap();
/// assert!(snapshot.services.is_empty());
/// assert_eq!(snapshot.global_params.client_payment_delay_days, 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSnapshot {
    /// Format version.
    #[serde(default)]
    pub version: String,
    /// When the snapshot was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Document type tag managed by the load/save layer.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Organization-wide assumptions.
    #[serde(default)]
    pub global_params: GlobalParameters,
    /// Central overhead.
    #[serde(default)]
    pub direction: Direction,
    /// Services, in display order.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl BudgetSnapshot {
    /// Builds a snapshot from its three budget parts.
    pub fn new(global_params: GlobalParameters, direction: Direction, services: Vec<Service>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            date: None,
            kind: None,
            global_params,
            direction,
            services,
        }
    }

    /// Parses and validates a snapshot from JSON text.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| EngineError::SnapshotParseError {
                message: e.to_string(),
            })?;
        Self::from_value(value)
    }

    /// Parses and validates a snapshot from a JSON value.
    pub fn from_value(value: Value) -> EngineResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(EngineError::invalid_entity(
                "snapshot",
                "(root)",
                "expected a JSON object",
            ));
        };

        let version: Option<String> = take(&mut root, "snapshot", "version")?;
        let date: Option<DateTime<Utc>> = take(&mut root, "snapshot", "date")?;
        let kind: Option<String> = take(&mut root, "snapshot", "type")?;
        let global_params: Option<GlobalParameters> = take(&mut root, "globalParams", "")?;
        let direction: Option<Direction> = take(&mut root, "direction", "")?;

        let services = match root.remove("services") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    serde_json::from_value::<Service>(item).map_err(|e| {
                        EngineError::invalid_entity(
                            format!("services[{}]", index),
                            field_hint(&e),
                            e.to_string(),
                        )
                    })
                })
                .collect::<EngineResult<Vec<_>>>()?,
            Some(_) => {
                return Err(EngineError::invalid_entity(
                    "snapshot",
                    "services",
                    "expected an array of services",
                ));
            }
        };

        let snapshot = Self {
            version: version.unwrap_or_default(),
            date,
            kind,
            global_params: global_params.unwrap_or_default(),
            direction: direction.unwrap_or_default(),
            services,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks structural invariants serde cannot express.
    ///
    /// Rejects duplicate identifiers within a list, blank service names and
    /// investments outside the accepted duration, principal and rate ranges.
    pub fn validate(&self) -> EngineResult<()> {
        unique_ids(
            self.global_params.provision_rules.iter().map(|r| r.id),
            "globalParams.provisionRules",
        )?;
        unique_ids(
            self.global_params.permanent_capital.iter().map(|c| c.id),
            "globalParams.permanentCapital",
        )?;
        validate_personnel(&self.direction.personnel, "direction.personnel")?;

        unique_ids(self.services.iter().map(|s| s.id), "services")?;
        for (index, service) in self.services.iter().enumerate() {
            let entity = format!("services[{}]", index);

            if service.name.trim().is_empty() {
                return Err(EngineError::invalid_entity(entity, "name", "must not be blank"));
            }
            validate_personnel(&service.personnel, &format!("{}.personnel", entity))?;
            validate_line_items(&service.expenses, &format!("{}.expenses", entity))?;
            validate_line_items(&service.revenues, &format!("{}.revenues", entity))?;

            for (category, line) in service.investments.iter() {
                line.check_ranges(&format!("{}.investments.{}", entity, category.field_name()))?;
            }
        }
        Ok(())
    }
}

/// Removes and deserializes an optional field of the root object.
///
/// With an empty `key_or_field`, the key itself is the entity being parsed.
fn take<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    entity: &str,
    key_or_field: &str,
) -> EngineResult<Option<T>> {
    let key = if key_or_field.is_empty() {
        entity
    } else {
        key_or_field
    };

    match root.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
            let field = if key_or_field.is_empty() {
                field_hint(&e)
            } else {
                key_or_field.to_string()
            };
            EngineError::invalid_entity(entity, field, e.to_string())
        }),
    }
}

/// Extracts the field name serde quotes in missing/unknown field errors.
fn field_hint(error: &serde_json::Error) -> String {
    let message = error.to_string();
    message
        .split('`')
        .nth(1)
        .filter(|_| message.contains("field"))
        .unwrap_or("(value)")
        .to_string()
}

fn unique_ids(ids: impl Iterator<Item = u64>, entity: &str) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::invalid_entity(
                entity,
                "id",
                format!("duplicate identifier {}", id),
            ));
        }
    }
    Ok(())
}

fn validate_personnel(lines: &[PersonnelLine], entity: &str) -> EngineResult<()> {
    unique_ids(lines.iter().map(|p| p.id), entity)
}

fn validate_line_items(lines: &[LineItem], entity: &str) -> EngineResult<()> {
    unique_ids(lines.iter().map(|l| l.id), entity)
}
