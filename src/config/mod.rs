//! Configuration system with YAML schema and validation.
//!
//! Mistake-proofing happens in three layers:
//! - typed structs with `deny_unknown_fields` at the top level
//! - `validator` range rules on each section
//! - a semantic pass for cross-field constraints

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SimError, SimResult};
use crate::models::ModelOptions;

/// Top-level configuration.
///
/// Every section has defaults, so an empty document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PhysverseConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Master seed for every stochastic model.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Numerical guard settings.
    #[serde(default)]
    pub guard: GuardConfig,

    /// Chart sampler settings.
    #[validate(nested)]
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Headless run defaults.
    #[validate(nested)]
    #[serde(default)]
    pub run: RunConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

const fn default_seed() -> u64 {
    42
}

impl PhysverseConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        log::debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        // An empty document deserializes as unit, not as an empty map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> PhysverseConfigBuilder {
        PhysverseConfigBuilder::default()
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns a config error describing the first violated constraint.
    pub fn validate_semantic(&self) -> SimResult<()> {
        if !self.run.frame_dt.is_finite() || self.run.frame_dt <= 0.0 {
            return Err(SimError::config("run.frame_dt must be positive"));
        }
        if !self.run.duration.is_finite() || self.run.duration < 0.0 {
            return Err(SimError::config("run.duration must not be negative"));
        }
        if !self.sampler.interval.is_finite() || self.sampler.interval <= 0.0 {
            return Err(SimError::config("sampler.interval must be positive"));
        }
        if self.run.frame_dt > self.run.duration && self.run.duration > 0.0 {
            return Err(SimError::config(format!(
                "run.frame_dt ({}) exceeds run.duration ({})",
                self.run.frame_dt, self.run.duration
            )));
        }
        Ok(())
    }

    /// Options handed to every model the registry creates.
    #[must_use]
    pub const fn model_options(&self) -> ModelOptions {
        ModelOptions {
            seed: self.seed,
            reset_on_non_finite: self.guard.reset_on_non_finite,
        }
    }
}

impl Default for PhysverseConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: default_seed(),
            guard: GuardConfig::default(),
            sampler: SamplerConfig::default(),
            run: RunConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct PhysverseConfigBuilder {
    seed: Option<u64>,
    frame_dt: Option<f64>,
    duration: Option<f64>,
    interval: Option<f64>,
    reset_on_non_finite: Option<bool>,
}

impl PhysverseConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the headless frame step in seconds.
    #[must_use]
    pub const fn frame_dt(mut self, dt: f64) -> Self {
        self.frame_dt = Some(dt);
        self
    }

    /// Set the headless run length in seconds.
    #[must_use]
    pub const fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set the sampler interval in seconds.
    #[must_use]
    pub const fn interval(mut self, seconds: f64) -> Self {
        self.interval = Some(seconds);
        self
    }

    /// Enable or disable the non-finite guard.
    #[must_use]
    pub const fn reset_on_non_finite(mut self, enabled: bool) -> Self {
        self.reset_on_non_finite = Some(enabled);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PhysverseConfig {
        let mut config = PhysverseConfig::default();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dt) = self.frame_dt {
            config.run.frame_dt = dt;
        }
        if let Some(duration) = self.duration {
            config.run.duration = duration;
        }
        if let Some(interval) = self.interval {
            config.sampler.interval = interval;
        }
        if let Some(enabled) = self.reset_on_non_finite {
            config.guard.reset_on_non_finite = enabled;
        }
        config
    }
}

/// Numerical guard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Restore the initial condition when a step produces NaN/Inf.
    #[serde(default = "default_true")]
    pub reset_on_non_finite: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            reset_on_non_finite: true,
        }
    }
}

/// Chart sampler settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SamplerConfig {
    /// Seconds between chart rows.
    #[validate(range(min = 0.001, max = 60.0))]
    #[serde(default = "default_interval")]
    pub interval: f64,
    /// Upper bound on rows per series.
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

const fn default_interval() -> f64 {
    0.1
}

const fn default_max_rows() -> usize {
    10_000
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            max_rows: default_max_rows(),
        }
    }
}

/// Headless run defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    /// Frame step in seconds.
    #[validate(range(min = 0.000_1, max = 1.0))]
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f64,
    /// Simulated seconds per run.
    #[validate(range(min = 0.0, max = 86_400.0))]
    #[serde(default = "default_duration")]
    pub duration: f64,
}

const fn default_frame_dt() -> f64 {
    1.0 / 60.0
}

const fn default_duration() -> f64 {
    10.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_dt: default_frame_dt(),
            duration: default_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = PhysverseConfig::default();

        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.seed, 42);
        assert!(config.guard.reset_on_non_finite);
        assert!((config.run.frame_dt - 1.0 / 60.0).abs() < f64::EPSILON);
        assert_eq!(config.sampler.max_rows, 10_000);
        assert!(config.validate_semantic().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PhysverseConfig::builder()
            .seed(12345)
            .frame_dt(0.01)
            .reset_on_non_finite(false)
            .build();

        assert_eq!(config.seed, 12345);
        assert!((config.run.frame_dt - 0.01).abs() < f64::EPSILON);
        assert_eq!(
            config.model_options(),
            ModelOptions {
                seed: 12345,
                reset_on_non_finite: false,
            }
        );
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
seed: 7
sampler:
  interval: 0.25
run:
  frame_dt: 0.02
";
        let config = PhysverseConfig::from_yaml(yaml);
        assert!(config.is_ok());
        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.seed), Some(7));
        assert_eq!(config.as_ref().map(|c| c.sampler.max_rows), Some(10_000));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = PhysverseConfig::from_yaml("");
        assert_eq!(config.ok(), Some(PhysverseConfig::default()));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let yaml = "seed: 1\njidoka: {}\n";
        assert!(PhysverseConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_validation_fails_negative_frame_dt() {
        let yaml = "run:\n  frame_dt: -0.01\n";
        assert!(PhysverseConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_validation_fails_zero_rows() {
        let yaml = "sampler:\n  max_rows: 0\n";
        assert!(PhysverseConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_semantic_rejects_frame_longer_than_run() {
        let config = PhysverseConfig::builder().frame_dt(0.5).duration(0.1).build();
        assert!(config.validate_semantic().is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "seed: 99\nguard:\n  reset_on_non_finite: false").expect("write");

        let config = PhysverseConfig::load(file.path()).expect("valid config");
        assert_eq!(config.seed, 99);
        assert!(!config.model_options().reset_on_non_finite);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = PhysverseConfig::load(dir.path().join("absent.yaml"));
        assert!(matches!(err, Err(SimError::Io(_))));
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let config = PhysverseConfig::builder().seed(3).interval(0.5).build();
        let yaml = config.to_yaml().expect("serialize");
        let back = PhysverseConfig::from_yaml(&yaml).expect("parse");
        assert_eq!(back, config);
    }
}
