//! Saved-simulation records.
//!
//! The wire shape is `{ name, type, parameters, isPublic }`: plain data,
//! JSON-serializable, with `parameters` carried through unchanged so unknown
//! keys survive a round trip.

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{SimError, SimResult};
use crate::models::Simulation;
use crate::params::ParamMap;
use crate::registry::SimulationRegistry;

/// A named, shareable parameter set for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SavedSimulation {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Registry id of the simulation.
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub simulation_type: String,
    /// Parameter values as edited by the user.
    #[serde(default)]
    pub parameters: ParamMap,
    /// Whether the record is listed publicly.
    #[serde(default)]
    pub is_public: bool,
}

impl SavedSimulation {
    /// Build a record.
    #[must_use]
    pub fn new(name: &str, simulation_type: &str, parameters: ParamMap, is_public: bool) -> Self {
        Self {
            name: name.to_string(),
            simulation_type: simulation_type.to_string(),
            parameters,
            is_public,
        }
    }

    /// Parse and validate a JSON record.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or a field fails validation.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let saved: Self = serde_json::from_str(json)?;
        saved.validate()?;
        Ok(saved)
    }

    /// Validate and serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns error if a field fails validation.
    pub fn to_json(&self) -> SimResult<String> {
        self.validate()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a record from `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the record is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the record to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if validation or the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Create a fresh, uninitialized model for this record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownSimulation`] if the type is not registered.
    pub fn instantiate(&self, registry: &SimulationRegistry) -> SimResult<Box<dyn Simulation>> {
        registry
            .create(&self.simulation_type)
            .ok_or_else(|| SimError::unknown(&self.simulation_type))
    }

    /// Check the parameter types against the registered schema.
    ///
    /// # Errors
    ///
    /// Returns an unknown-simulation or parameter-type error.
    pub fn check_parameters(&self, registry: &SimulationRegistry) -> SimResult<()> {
        let schema = registry
            .schema(&self.simulation_type)
            .ok_or_else(|| SimError::unknown(&self.simulation_type))?;
        schema.check_types(&self.parameters)
    }
}
