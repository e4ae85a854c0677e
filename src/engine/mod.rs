//! Simulation engine.
//!
//! Hosts exactly one active model and owns the engine-level state:
//! - play/pause and elapsed-time accumulation
//! - forwarding frame updates to the model
//! - parameter changes by full re-initialization of the same model
//! - the scene the model draws into
//!
//! The engine is a two-axis state machine, {empty, loaded} × {paused,
//! running}. Nothing in the frame path returns an error: an empty engine
//! or a paused one simply ignores `update`.

pub mod clock;
pub mod rng;
pub mod state;

use indexmap::IndexMap;

pub use clock::FrameClock;
pub use rng::SimRng;
pub use state::SimulationState;

use crate::models::scene::{HeadlessScene, Scene};
use crate::models::Simulation;
use crate::params::ParamMap;
use crate::persistence::SavedSimulation;
use crate::registry::SimulationRegistry;

/// Single-model simulation host.
pub struct SimulationEngine<S: Scene = HeadlessScene> {
    scene: S,
    model: Option<Box<dyn Simulation>>,
    params: ParamMap,
    state: SimulationState,
}

impl SimulationEngine<HeadlessScene> {
    /// Engine drawing into an in-memory scene.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(HeadlessScene::new())
    }
}

impl<S: Scene> SimulationEngine<S> {
    /// Empty engine bound to `scene`.
    #[must_use]
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            model: None,
            params: ParamMap::new(),
            state: SimulationState::new(),
        }
    }

    /// Attach `model`, disposing any previous one first, and initialize it.
    ///
    /// The engine state is reset to `{0, paused}`.
    pub fn load_simulation(&mut self, mut model: Box<dyn Simulation>, params: ParamMap) {
        self.detach();
        log::info!("loading simulation '{}'", model.metadata().id);
        model.initialize(&params, &mut self.scene);
        self.model = Some(model);
        self.params = params;
        self.state = SimulationState::new();
    }

    /// Create `id` from `registry` and load it.
    ///
    /// An unknown id disposes the current model and leaves the engine empty.
    /// Returns whether a model is now loaded.
    pub fn load_by_id(&mut self, registry: &SimulationRegistry, id: &str, params: ParamMap) -> bool {
        if let Some(model) = registry.create(id) {
            self.load_simulation(model, params);
            true
        } else {
            log::warn!("unknown simulation '{id}'; nothing loaded");
            self.cleanup();
            false
        }
    }

    /// Restore a saved simulation. Same semantics as [`Self::load_by_id`].
    pub fn load_saved(&mut self, registry: &SimulationRegistry, saved: &SavedSimulation) -> bool {
        self.load_by_id(registry, &saved.simulation_type, saved.parameters.clone())
    }

    /// Snapshot the active model as a saveable record.
    #[must_use]
    pub fn to_saved(&self, name: &str, is_public: bool) -> Option<SavedSimulation> {
        let model = self.model.as_ref()?;
        let parameters = model.current_params().unwrap_or_else(|| self.params.clone());
        Some(SavedSimulation::new(name, &model.metadata().id, parameters, is_public))
    }

    /// Restart the active model from `params` (cleanup + initialize on the
    /// same instance). Time goes back to zero; the pause flag is kept.
    pub fn update_parameters(&mut self, params: ParamMap) {
        let Some(model) = self.model.as_mut() else {
            log::debug!("parameter update ignored: no simulation loaded");
            return;
        };
        model.cleanup(&mut self.scene);
        model.initialize(&params, &mut self.scene);
        self.params = params;
        self.state.elapsed_time = 0.0;
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// No-op when nothing is loaded, when paused, or when `dt` is not a
    /// finite non-negative number.
    pub fn update(&mut self, dt: f64) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        if self.state.is_paused {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            log::debug!("ignoring frame with dt = {dt}");
            return;
        }
        self.state.elapsed_time += dt;
        model.update(dt, &self.state, &mut self.scene);
    }

    /// Resume stepping.
    pub fn play(&mut self) {
        self.state.is_paused = false;
    }

    /// Suspend stepping.
    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    /// Back to time zero, paused, with the model at its initial condition.
    pub fn reset(&mut self) {
        self.state.elapsed_time = 0.0;
        self.state.is_paused = true;
        if let Some(model) = self.model.as_mut() {
            model.reset(&mut self.scene);
        }
    }

    /// Dispose the active model and return to the empty state.
    pub fn cleanup(&mut self) {
        self.detach();
        self.params.clear();
        self.state = SimulationState::new();
    }

    fn detach(&mut self) {
        if let Some(mut model) = self.model.take() {
            log::debug!("disposing simulation '{}'", model.metadata().id);
            model.cleanup(&mut self.scene);
        }
    }

    /// Whether a model is attached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Whether stepping is suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    /// Seconds simulated since the last load, parameter change or reset.
    #[must_use]
    pub const fn elapsed_time(&self) -> f64 {
        self.state.elapsed_time
    }

    /// Engine-level state.
    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Auxiliary data bag handed to the model on every update.
    pub fn data_mut(&mut self) -> &mut IndexMap<String, serde_json::Value> {
        &mut self.state.data
    }

    /// The active model.
    #[must_use]
    pub fn active(&self) -> Option<&dyn Simulation> {
        self.model.as_deref()
    }

    /// Id of the active model.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.metadata().id.as_str())
    }

    /// Parameters passed at the last load or parameter update.
    #[must_use]
    pub const fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Snapshot of the active model (`null` when empty).
    #[must_use]
    pub fn export_data(&self) -> serde_json::Value {
        self.model
            .as_ref()
            .map_or(serde_json::Value::Null, |m| m.export_data())
    }

    /// The scene.
    #[must_use]
    pub const fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access for the host renderer.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

impl Default for SimulationEngine<HeadlessScene> {
    fn default() -> Self {
        Self::headless()
    }
}

impl<S: Scene> Drop for SimulationEngine<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelOptions;
    use crate::params::ParamValue;

    fn registry() -> SimulationRegistry {
        SimulationRegistry::with_defaults(ModelOptions::default())
    }

    fn loaded(id: &str) -> SimulationEngine {
        let mut engine = SimulationEngine::headless();
        assert!(engine.load_by_id(&registry(), id, ParamMap::new()));
        engine
    }

    #[test]
    fn test_update_without_model_is_noop() {
        let mut engine = SimulationEngine::headless();
        engine.play();
        engine.update(0.016);
        assert!(!engine.is_loaded());
        assert_eq!(engine.elapsed_time(), 0.0);
        assert_eq!(engine.export_data(), serde_json::Value::Null);
    }

    #[test]
    fn test_load_starts_paused_at_zero() {
        let engine = loaded("projectile");
        assert!(engine.is_paused());
        assert_eq!(engine.elapsed_time(), 0.0);
        assert_eq!(engine.active_id(), Some("projectile"));
        assert_eq!(engine.scene().live_count(), 1);
    }

    #[test]
    fn test_paused_engine_does_not_advance() {
        let mut engine = loaded("spring-mass");
        let before = engine.export_data();
        engine.update(0.016);
        assert_eq!(engine.elapsed_time(), 0.0);
        assert_eq!(engine.export_data(), before);
    }

    #[test]
    fn test_time_accumulates_while_running() {
        let mut engine = loaded("spring-mass");
        engine.play();
        for _ in 0..10 {
            engine.update(0.1);
        }
        assert!((engine.elapsed_time() - 1.0).abs() < 1e-9);

        engine.pause();
        engine.update(0.1);
        assert!((engine.elapsed_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut engine = loaded("pendulum");
        engine.play();
        engine.update(f64::NAN);
        engine.update(-1.0);
        engine.update(f64::INFINITY);
        assert_eq!(engine.elapsed_time(), 0.0);
    }

    #[test]
    fn test_loading_disposes_previous_model() {
        let mut engine = loaded("n-body");
        assert_eq!(engine.scene().live_count(), 50);
        assert!(engine.load_by_id(&registry(), "projectile", ParamMap::new()));
        assert_eq!(engine.scene().live_count(), 1);
    }

    #[test]
    fn test_unknown_id_leaves_engine_empty() {
        let mut engine = loaded("projectile");
        engine.play();
        engine.update(0.1);
        assert!(!engine.load_by_id(&registry(), "not-a-real-id", ParamMap::new()));
        assert!(!engine.is_loaded());
        assert_eq!(engine.scene().live_count(), 0);
        assert_eq!(engine.elapsed_time(), 0.0);
        engine.update(0.1);
    }

    #[test]
    fn test_update_parameters_restarts_same_model() {
        let mut engine = loaded("spring-mass");
        engine.play();
        for _ in 0..20 {
            engine.update(0.05);
        }
        let mut params = ParamMap::new();
        params.insert("displacement".into(), 4.0.into());
        engine.update_parameters(params);

        assert_eq!(engine.elapsed_time(), 0.0);
        assert!(!engine.is_paused());
        assert_eq!(engine.export_data()["position"], 4.0);
        assert_eq!(engine.scene().live_count(), 1);
        assert_eq!(engine.scene().spawned_total(), 2);
    }

    #[test]
    fn test_reset_restores_initial_condition() {
        let mut engine = loaded("double-pendulum");
        let initial = engine.export_data();
        engine.play();
        for _ in 0..60 {
            engine.update(1.0 / 60.0);
        }
        assert_ne!(engine.export_data(), initial);

        engine.reset();
        assert!(engine.is_paused());
        assert_eq!(engine.elapsed_time(), 0.0);
        assert_eq!(engine.export_data(), initial);
        assert_eq!(engine.scene().spawned_total(), 3);
    }

    #[test]
    fn test_cleanup_returns_to_empty() {
        let mut engine = loaded("fluid");
        engine.cleanup();
        assert!(!engine.is_loaded());
        assert_eq!(engine.scene().live_count(), 0);
        assert!(engine.params().is_empty());
        engine.cleanup();
    }

    #[test]
    fn test_data_bag_reaches_state() {
        let mut engine = loaded("projectile");
        engine
            .data_mut()
            .insert("note".into(), serde_json::json!("hello"));
        assert_eq!(engine.state().data["note"], "hello");
    }

    #[test]
    fn test_saved_round_trip() {
        let registry = registry();
        let mut engine = SimulationEngine::headless();
        let mut params = ParamMap::new();
        params.insert("angle".into(), 30.0.into());
        engine.load_by_id(&registry, "projectile", params);

        let saved = engine.to_saved("My shot", true).expect("loaded");
        assert_eq!(saved.simulation_type, "projectile");
        assert_eq!(saved.parameters["angle"], ParamValue::Number(30.0));

        let mut other = SimulationEngine::headless();
        assert!(other.load_saved(&registry, &saved));
        assert_eq!(other.export_data(), engine.export_data());
    }
}
