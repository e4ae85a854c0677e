//! Simulation models.
//!
//! Two layers:
//!
//! 1. [`Model`]: pure physics. A model derives its initial condition from
//!    resolved parameters, advances itself by a (pre-clamped) `dt`, and
//!    reports the markers it wants rendered. It knows nothing about scenes,
//!    resets or disposal.
//! 2. [`Simulation`]: the object-safe lifecycle contract the engine talks to
//!    (`initialize → update* → reset* → cleanup`). [`Hosted`] implements it
//!    once for every `Model`, so dt clamping, initial-condition bookkeeping,
//!    scene resources and snapshots live in exactly one place.
//!
//! Integrated models are order-dependent: reaching time `t` requires replay
//! from zero. Analytic models (see [`kinematic`]) are time-indexed and give
//! the same state for any step pattern that sums to the same time.

pub mod chaos;
pub mod gravity;
mod host;
pub mod kinematic;
pub mod mechanics;
pub mod particles;
pub mod scene;

use serde::{Deserialize, Serialize};

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::metadata::SimulationMetadata;
use crate::params::{ParamMap, ParamValues, ParameterSchema};
use scene::{Marker, Scene};

pub use host::Hosted;

/// Gravitational softening floor shared by the multi-body models.
pub const MIN_SOFTENING: f64 = 1e-3;

/// Physics of one scenario.
pub trait Model: Clone + Serialize + 'static {
    /// Largest step the integrator accepts; larger frame deltas are capped.
    const MAX_DT: f64 = 0.05;

    /// Static descriptor.
    fn metadata() -> SimulationMetadata;

    /// Tunable inputs.
    fn parameters() -> ParameterSchema;

    /// Derive the initial condition purely from parameters (and the seeded rng).
    fn from_params(params: &ParamValues, rng: SimRng) -> Self;

    /// Advance by `dt` seconds (already clamped to `(0, MAX_DT]`).
    fn step(&mut self, dt: f64, state: &SimulationState);

    /// Markers to render, one per body or particle. The count must not change
    /// between steps.
    fn markers(&self) -> Vec<Marker>;

    /// Whether every rendered quantity is finite.
    fn is_finite(&self) -> bool {
        self.markers()
            .iter()
            .all(|m| m.position.is_finite() && m.radius.is_finite())
    }
}

/// Object-safe lifecycle contract hosted by the engine.
pub trait Simulation {
    /// Static descriptor.
    fn metadata(&self) -> &SimulationMetadata;

    /// Tunable inputs.
    fn parameters(&self) -> &ParameterSchema;

    /// Derive fresh physical state from `params` and create scene resources.
    /// Safe to call repeatedly; each call fully replaces prior state.
    fn initialize(&mut self, params: &ParamMap, scene: &mut dyn Scene);

    /// Advance by `dt` seconds and re-place the model's markers.
    fn update(&mut self, dt: f64, state: &SimulationState, scene: &mut dyn Scene);

    /// Restore the condition derived at the last `initialize`, keeping resources.
    fn reset(&mut self, scene: &mut dyn Scene);

    /// Release every scene resource. Safe on a model that was never started.
    fn cleanup(&mut self, scene: &mut dyn Scene);

    /// Serializable snapshot of the current physical state (`null` if idle).
    fn export_data(&self) -> serde_json::Value;

    /// Parameters resolved at the last `initialize`, if active.
    fn current_params(&self) -> Option<ParamMap>;

    /// Whether the model holds live state.
    fn is_active(&self) -> bool;
}

/// Host-level options applied to every model a registry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Seed for every stochastic initial condition.
    pub seed: u64,
    /// Restore the initial condition when a step produces NaN/Inf.
    pub reset_on_non_finite: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            reset_on_non_finite: true,
        }
    }
}
