//! Error types for the budget engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! The calculators themselves never fail: only configuration loading and
//! snapshot parsing/validation produce errors.

use thiserror::Error;

/// The main error type for the budget engine.
///
/// # Example
///
/// ```
/// use budget_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A budget snapshot could not be parsed at all.
    #[error("Failed to parse budget snapshot: {message}")]
    SnapshotParseError {
        /// A description of the parse error.
        message: String,
    },

    /// An entity in the snapshot is structurally invalid.
    #[error("Invalid {entity} field '{field}': {message}")]
    InvalidEntity {
        /// The offending entity (e.g. `services[1]`, `direction`).
        entity: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidEntity`].
    pub fn invalid_entity(
        entity: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidEntity {
            entity: entity.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_snapshot_parse_error_displays_message() {
        let error = EngineError::SnapshotParseError {
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse budget snapshot: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_invalid_entity_displays_entity_field_and_message() {
        let error =
            EngineError::invalid_entity("services[1].investments.vehicle", "duration_years", "must be at least 1");
        assert_eq!(
            error.to_string(),
            "Invalid services[1].investments.vehicle field 'duration_years': must be at least 1"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
