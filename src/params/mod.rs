//! Declarative parameter schemas.
//!
//! A model exposes an ordered mapping `key → ParameterDefinition`. The
//! mapping is the only contract a form generator needs (label, type, bounds,
//! default) and is also what seeds the initial condition: values supplied by
//! the caller are [resolved](ParameterSchema::resolve) against it, falling
//! back to the declared default for missing or mistyped keys.
//!
//! Bounds are UI hints. Out-of-range values are accepted as-is; models clamp
//! only where an integration guard needs it (counts, masses, lengths).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::kinematics::Vec3;

/// Caller-supplied parameter values (plain JSON-compatible data).
pub type ParamMap = IndexMap<String, ParamValue>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean toggle.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// 3D vector value.
    Vector(Vec3),
    /// Select option or free text.
    Text(String),
}

impl ParamValue {
    /// Parse a command-line value: `true`/`false`, a number, `x,y,z`, or text.
    #[must_use]
    pub fn parse_cli(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return Self::Boolean(true),
            "false" => return Self::Boolean(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<f64>() {
            return Self::Number(n);
        }
        let parts: Vec<f64> = raw
            .split(',')
            .filter_map(|p| p.trim().parse::<f64>().ok())
            .collect();
        if parts.len() == 3 && raw.split(',').count() == 3 {
            return Self::Vector(Vec3::new(parts[0], parts[1], parts[2]));
        }
        Self::Text(raw.to_string())
    }

    /// Name of the value's type as used in schemas.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::Vector(_) => "vector",
            Self::Text(_) => "select",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Vector(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Parse a `key=value` assignment into a map entry.
///
/// # Errors
///
/// Returns [`SimError::ParameterSyntax`] if there is no `=` or the key is empty.
pub fn parse_assignment(raw: &str) -> SimResult<(String, ParamValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| SimError::ParameterSyntax(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(SimError::ParameterSyntax(raw.to_string()));
    }
    Ok((key.to_string(), ParamValue::parse_cli(value)))
}

/// Type-specific part of a parameter definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterKind {
    /// Numeric slider.
    Number {
        /// Default value.
        default: f64,
        /// Lower bound hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Upper bound hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        /// Slider step hint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// Checkbox.
    Boolean {
        /// Default value.
        default: bool,
    },
    /// Three-component vector input.
    Vector {
        /// Default value.
        default: Vec3,
    },
    /// Drop-down list.
    Select {
        /// Default option.
        default: String,
        /// Allowed options.
        options: Vec<String>,
    },
}

impl ParameterKind {
    /// Schema type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Vector { .. } => "vector",
            Self::Select { .. } => "select",
        }
    }

    /// Default value as a [`ParamValue`].
    #[must_use]
    pub fn default_value(&self) -> ParamValue {
        match self {
            Self::Number { default, .. } => ParamValue::Number(*default),
            Self::Boolean { default } => ParamValue::Boolean(*default),
            Self::Vector { default } => ParamValue::Vector(*default),
            Self::Select { default, .. } => ParamValue::Text(default.clone()),
        }
    }

    /// Whether `value` has the declared type.
    #[must_use]
    pub const fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::Number { .. }, ParamValue::Number(_))
                | (Self::Boolean { .. }, ParamValue::Boolean(_))
                | (Self::Vector { .. }, ParamValue::Vector(_))
                | (Self::Select { .. }, ParamValue::Text(_))
        )
    }
}

/// One tunable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Human-readable label.
    pub label: String,
    /// Type, default and bounds.
    #[serde(flatten)]
    pub kind: ParameterKind,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A value outside its declared bounds (reported, never rejected).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeWarning {
    /// Parameter key.
    pub key: String,
    /// Supplied value.
    pub value: f64,
    /// Declared lower bound.
    pub min: Option<f64>,
    /// Declared upper bound.
    pub max: Option<f64>,
}

impl std::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parameter '{}' = {} is outside [", self.key, self.value)?;
        match self.min {
            Some(min) => write!(f, "{min}")?,
            None => f.write_str("-inf")?,
        }
        f.write_str(", ")?;
        match self.max {
            Some(max) => write!(f, "{max}")?,
            None => f.write_str("inf")?,
        }
        f.write_str("]")
    }
}

/// Ordered mapping from parameter key to definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    entries: IndexMap<String, ParameterDefinition>,
}

impl ParameterSchema {
    /// Empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, key: &str, label: &str, kind: ParameterKind) -> Self {
        self.entries.insert(
            key.to_string(),
            ParameterDefinition {
                label: label.to_string(),
                kind,
                description: None,
            },
        );
        self
    }

    /// Add a numeric parameter.
    #[must_use]
    pub fn number(self, key: &str, label: &str, default: f64, min: f64, max: f64, step: f64) -> Self {
        self.with(
            key,
            label,
            ParameterKind::Number {
                default,
                min: Some(min),
                max: Some(max),
                step: Some(step),
            },
        )
    }

    /// Add a boolean parameter.
    #[must_use]
    pub fn boolean(self, key: &str, label: &str, default: bool) -> Self {
        self.with(key, label, ParameterKind::Boolean { default })
    }

    /// Add a vector parameter.
    #[must_use]
    pub fn vector(self, key: &str, label: &str, default: Vec3) -> Self {
        self.with(key, label, ParameterKind::Vector { default })
    }

    /// Add a select parameter.
    #[must_use]
    pub fn select(self, key: &str, label: &str, default: &str, options: &[&str]) -> Self {
        self.with(
            key,
            label,
            ParameterKind::Select {
                default: default.to_string(),
                options: options.iter().map(|o| (*o).to_string()).collect(),
            },
        )
    }

    /// Attach a description to the most recently added parameter.
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        if let Some((_, def)) = self.entries.last_mut() {
            def.description = Some(description.to_string());
        }
        self
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParameterDefinition> {
        self.entries.get(key)
    }

    /// Iterate definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterDefinition)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All defaults as a parameter map.
    #[must_use]
    pub fn defaults(&self) -> ParamMap {
        self.entries
            .iter()
            .map(|(k, def)| (k.clone(), def.kind.default_value()))
            .collect()
    }

    /// Resolve caller values against the schema.
    ///
    /// Missing keys and values of the wrong type fall back to the default;
    /// keys the schema does not declare are ignored.
    #[must_use]
    pub fn resolve(&self, params: &ParamMap) -> ParamValues {
        for key in params.keys() {
            if !self.entries.contains_key(key) {
                log::debug!("ignoring undeclared parameter '{key}'");
            }
        }

        let values = self
            .entries
            .iter()
            .map(|(key, def)| {
                let value = match params.get(key) {
                    Some(v) if def.kind.accepts(v) => v.clone(),
                    Some(v) => {
                        log::debug!(
                            "parameter '{key}' expects {} but got {}; using default",
                            def.kind.type_name(),
                            v.type_name()
                        );
                        def.kind.default_value()
                    }
                    None => def.kind.default_value(),
                };
                (key.clone(), value)
            })
            .collect();

        ParamValues { values }
    }

    /// Strict type check of caller values (for outer surfaces such as the CLI).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ParameterType`] for the first declared key whose
    /// value has the wrong type.
    pub fn check_types(&self, params: &ParamMap) -> SimResult<()> {
        for (key, value) in params {
            if let Some(def) = self.entries.get(key) {
                if !def.kind.accepts(value) {
                    return Err(SimError::ParameterType {
                        key: key.clone(),
                        expected: def.kind.type_name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Numeric values outside their declared bounds.
    #[must_use]
    pub fn out_of_range(&self, params: &ParamMap) -> Vec<RangeWarning> {
        params
            .iter()
            .filter_map(|(key, value)| {
                let def = self.entries.get(key)?;
                let (ParameterKind::Number { min, max, .. }, ParamValue::Number(v)) =
                    (&def.kind, value)
                else {
                    return None;
                };
                let below = min.is_some_and(|m| *v < m);
                let above = max.is_some_and(|m| *v > m);
                (below || above).then(|| RangeWarning {
                    key: key.clone(),
                    value: *v,
                    min: *min,
                    max: *max,
                })
            })
            .collect()
    }
}

/// Parameters resolved against a schema: every declared key is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamValues {
    values: IndexMap<String, ParamValue>,
}

impl ParamValues {
    fn lookup(&self, key: &str) -> Option<&ParamValue> {
        let value = self.values.get(key);
        if value.is_none() {
            log::warn!("parameter '{key}' is not declared by the schema");
        }
        value
    }

    /// Numeric value (0.0 if undeclared).
    #[must_use]
    pub fn number(&self, key: &str) -> f64 {
        match self.lookup(key) {
            Some(ParamValue::Number(v)) => *v,
            _ => 0.0,
        }
    }

    /// Numeric value clamped from below, for divisors such as masses and lengths.
    #[must_use]
    pub fn positive(&self, key: &str, floor: f64) -> f64 {
        let v = self.number(key);
        if v.is_finite() {
            v.max(floor)
        } else {
            floor
        }
    }

    /// Integer count, rounded and clamped to `[min, max]`.
    #[must_use]
    pub fn count(&self, key: &str, min: usize, max: usize) -> usize {
        let v = self.number(key);
        if !v.is_finite() {
            return min;
        }
        (v.round().max(0.0) as usize).clamp(min, max)
    }

    /// Angle supplied in degrees, returned in radians.
    #[must_use]
    pub fn degrees(&self, key: &str) -> f64 {
        self.number(key).to_radians()
    }

    /// Boolean value (false if undeclared).
    #[must_use]
    pub fn boolean(&self, key: &str) -> bool {
        matches!(self.lookup(key), Some(ParamValue::Boolean(true)))
    }

    /// Vector value (zero if undeclared).
    #[must_use]
    pub fn vector(&self, key: &str) -> Vec3 {
        match self.lookup(key) {
            Some(ParamValue::Vector(v)) => *v,
            _ => Vec3::ZERO,
        }
    }

    /// Select/text value (empty if undeclared).
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        match self.lookup(key) {
            Some(ParamValue::Text(v)) => v.as_str(),
            _ => "",
        }
    }

    /// Back to a plain map (for persistence and the sampler).
    #[must_use]
    pub fn to_map(&self) -> ParamMap {
        self.values.clone()
    }
}
