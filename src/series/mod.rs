//! Data-series sampler for charting.
//!
//! Rows are computed from closed-form formulas of `(id, time, parameters)`
//! and never read a running model. For integrated models the chart is an
//! approximation that can visibly diverge from the rendered state over long
//! runs; the chaotic ones use stand-ins.

mod formulas;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::SamplerConfig;
use crate::params::ParamMap;
use crate::registry::SimulationRegistry;

/// One chart row: `{ "time": t, "<series>": value, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// Simulated time in seconds.
    pub time: f64,
    /// Named series values.
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl SeriesRow {
    /// Value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Closed-form sampler bound to a registry's parameter schemas.
#[derive(Debug, Clone, Copy)]
pub struct DataSeriesSampler<'a> {
    registry: &'a SimulationRegistry,
    max_rows: usize,
}

impl<'a> DataSeriesSampler<'a> {
    /// Sampler with the default row cap.
    #[must_use]
    pub fn new(registry: &'a SimulationRegistry) -> Self {
        Self {
            registry,
            max_rows: SamplerConfig::default().max_rows,
        }
    }

    /// Sampler using `config.max_rows`.
    #[must_use]
    pub fn with_config(registry: &'a SimulationRegistry, config: &SamplerConfig) -> Self {
        Self::new(registry).max_rows(config.max_rows)
    }

    /// Cap the number of rows [`Self::series`] returns.
    #[must_use]
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    /// Chart values of `id` at `time`.
    ///
    /// `params` is resolved against the registered schema, so missing keys
    /// take their defaults. Returns `None` for an unknown id. Non-finite
    /// values are reported as 0.
    #[must_use]
    pub fn sample(&self, id: &str, time: f64, params: &ParamMap) -> Option<SeriesRow> {
        let schema = self.registry.schema(id)?;
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        let mut values = formulas::evaluate(id, time, &schema.resolve(params))?;
        for (key, value) in &mut values {
            if !value.is_finite() {
                log::debug!("series '{id}.{key}' is not finite at t = {time}");
                *value = 0.0;
            }
        }
        Some(SeriesRow { time, values })
    }

    /// Rows at `0, interval, 2·interval, …` up to `duration`, capped.
    ///
    /// Empty for an unknown id or a non-positive interval.
    #[must_use]
    pub fn series(&self, id: &str, params: &ParamMap, duration: f64, interval: f64) -> Vec<SeriesRow> {
        if !self.registry.contains(id) || !interval.is_finite() || interval <= 0.0 {
            return Vec::new();
        }
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let wanted = (duration / interval + 1e-9).floor() as usize + 1;
        let rows = wanted.min(self.max_rows);
        if rows < wanted {
            log::debug!("series '{id}' truncated to {rows} of {wanted} rows");
        }
        (0..rows)
            .filter_map(|i| self.sample(id, i as f64 * interval, params))
            .collect()
    }
}
