//! Engine-level simulation state.
//!
//! Distinct from each model's physical state: the engine only tracks time,
//! the pause flag and an auxiliary data bag for the host application.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Engine-owned state handed to every model update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Seconds of simulated time since the last load/reset.
    pub elapsed_time: f64,
    /// Whether stepping is suspended.
    pub is_paused: bool,
    /// Auxiliary values for the host application.
    #[serde(default)]
    pub data: IndexMap<String, serde_json::Value>,
}

impl SimulationState {
    /// Fresh state: `{ elapsed_time: 0, is_paused: true, data: {} }`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed_time: 0.0,
            is_paused: true,
            data: IndexMap::new(),
        }
    }

    /// State at a given time, running. Convenience for driving models directly.
    #[must_use]
    pub fn running_at(elapsed_time: f64) -> Self {
        Self {
            elapsed_time,
            is_paused: false,
            data: IndexMap::new(),
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_paused_at_zero() {
        let state = SimulationState::new();
        assert_eq!(state.elapsed_time, 0.0);
        assert!(state.is_paused);
        assert!(state.data.is_empty());
        assert_eq!(state, SimulationState::default());
    }

    #[test]
    fn test_running_at() {
        let state = SimulationState::running_at(2.5);
        assert!(!state.is_paused);
        assert!((state.elapsed_time - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&SimulationState::new()).expect("serialize");
        assert!(json.contains("elapsedTime"));
        assert!(json.contains("isPaused"));
    }
}
