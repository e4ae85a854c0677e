//! Error types for physverse.
//!
//! Errors only surface at the outer edges of the crate: configuration
//! loading, persistence and the CLI. The per-frame path (engine update and
//! model stepping) never returns an error; it degrades locally and logs.

use thiserror::Error;

/// Result type alias for physverse operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all physverse operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Lookup Errors =====
    /// No simulation is registered under the given id.
    #[error("Unknown simulation '{id}'")]
    UnknownSimulation {
        /// The id that failed to resolve.
        id: String,
    },

    // ===== Parameter Errors =====
    /// A parameter value does not have the declared type.
    #[error("Parameter '{key}' expects a {expected} value")]
    ParameterType {
        /// Parameter key.
        key: String,
        /// Declared parameter type.
        expected: &'static str,
    },

    /// A `key=value` assignment could not be parsed.
    #[error("Invalid parameter assignment '{0}' (expected key=value)")]
    ParameterSyntax(String),

    // ===== Numerical Errors =====
    /// Non-finite value (NaN or Inf) detected.
    #[error("Non-finite value detected at {location}")]
    NonFiniteValue {
        /// Location where the non-finite value was detected.
        location: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown-simulation error.
    #[must_use]
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownSimulation { id: id.into() }
    }

    /// Whether this error came from a lookup miss rather than bad input.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownSimulation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_simulation_display() {
        let err = SimError::unknown("not-a-real-id");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not-a-real-id"));
    }

    #[test]
    fn test_error_config() {
        let err = SimError::config("interval must be positive");
        assert!(!err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("interval must be positive"));
    }

    #[test]
    fn test_parameter_type_display() {
        let err = SimError::ParameterType {
            key: "mass".to_string(),
            expected: "number",
        };
        let msg = err.to_string();
        assert!(msg.contains("mass"));
        assert!(msg.contains("number"));
    }

    #[test]
    fn test_parameter_syntax_display() {
        let err = SimError::ParameterSyntax("mass".to_string());
        assert!(err.to_string().contains("key=value"));
    }

    #[test]
    fn test_error_non_finite_display() {
        let err = SimError::NonFiniteValue {
            location: "bodies[1].velocity".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Non-finite value"));
        assert!(msg.contains("bodies[1].velocity"));
    }

    #[test]
    fn test_error_from_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: SimError = parse.unwrap_err().into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_from_io() {
        let err: SimError = std::io::Error::other("disk gone").into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_debug() {
        let err = SimError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
