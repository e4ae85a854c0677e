//! Generic lifecycle host for any [`Model`].

use super::scene::{Scene, SceneResources};
use super::{Model, ModelOptions, Simulation};
use crate::engine::clock::clamp_dt;
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::metadata::SimulationMetadata;
use crate::params::{ParamMap, ParamValues, ParameterSchema};

#[derive(Debug, Clone)]
enum Phase<M> {
    /// Constructed, never initialized.
    Idle,
    /// Live state plus the initial condition it was derived from.
    Active {
        current: M,
        initial: M,
        params: ParamValues,
    },
    /// Cleaned up; only `initialize` brings it back.
    Disposed,
}

/// Lifecycle adapter turning a [`Model`] into a [`Simulation`].
#[derive(Debug, Clone)]
pub struct Hosted<M: Model> {
    metadata: SimulationMetadata,
    schema: ParameterSchema,
    options: ModelOptions,
    phase: Phase<M>,
    resources: SceneResources,
}

impl<M: Model> Hosted<M> {
    /// Fresh, uninitialized host.
    #[must_use]
    pub fn new(options: ModelOptions) -> Self {
        Self {
            metadata: M::metadata(),
            schema: M::parameters(),
            options,
            phase: Phase::Idle,
            resources: SceneResources::new(),
        }
    }

    /// Boxed as a trait object (registry factory signature).
    #[must_use]
    pub fn boxed(options: ModelOptions) -> Box<dyn Simulation> {
        Box::new(Self::new(options))
    }

    /// Typed access to the live model.
    #[must_use]
    pub fn model(&self) -> Option<&M> {
        match &self.phase {
            Phase::Active { current, .. } => Some(current),
            Phase::Idle | Phase::Disposed => None,
        }
    }

    /// Number of scene markers currently owned.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl<M: Model> Simulation for Hosted<M> {
    fn metadata(&self) -> &SimulationMetadata {
        &self.metadata
    }

    fn parameters(&self) -> &ParameterSchema {
        &self.schema
    }

    fn initialize(&mut self, params: &ParamMap, scene: &mut dyn Scene) {
        for warning in self.schema.out_of_range(params) {
            log::debug!(
                "{}: '{}' = {} is outside the suggested range",
                self.metadata.id,
                warning.key,
                warning.value
            );
        }

        let values = self.schema.resolve(params);
        let model = M::from_params(&values, SimRng::new(self.options.seed));
        self.resources.acquire(scene, &model.markers());
        log::debug!(
            "{}: initialized with {} markers",
            self.metadata.id,
            self.resources.len()
        );

        self.phase = Phase::Active {
            current: model.clone(),
            initial: model,
            params: values,
        };
    }

    fn update(&mut self, dt: f64, state: &SimulationState, scene: &mut dyn Scene) {
        let Phase::Active {
            current, initial, ..
        } = &mut self.phase
        else {
            log::debug!("{}: update ignored, not initialized", self.metadata.id);
            return;
        };

        let h = clamp_dt(dt, M::MAX_DT);
        if h <= 0.0 {
            return;
        }

        current.step(h, state);

        if self.options.reset_on_non_finite && !current.is_finite() {
            log::warn!(
                "{}: non-finite state after step (dt = {h}); restoring initial condition",
                self.metadata.id
            );
            *current = initial.clone();
        }

        self.resources.sync(scene, &current.markers());
    }

    fn reset(&mut self, scene: &mut dyn Scene) {
        if let Phase::Active {
            current, initial, ..
        } = &mut self.phase
        {
            *current = initial.clone();
            self.resources.sync(scene, &current.markers());
        }
    }

    fn cleanup(&mut self, scene: &mut dyn Scene) {
        self.resources.release(scene);
        if matches!(self.phase, Phase::Active { .. }) {
            log::debug!("{}: cleaned up", self.metadata.id);
        }
        self.phase = Phase::Disposed;
    }

    fn export_data(&self) -> serde_json::Value {
        let Phase::Active { current, .. } = &self.phase else {
            return serde_json::Value::Null;
        };
        serde_json::to_value(current).unwrap_or_else(|e| {
            log::warn!("{}: snapshot failed: {e}", self.metadata.id);
            serde_json::Value::Null
        })
    }

    fn current_params(&self) -> Option<ParamMap> {
        match &self.phase {
            Phase::Active { params, .. } => Some(params.to_map()),
            Phase::Idle | Phase::Disposed => None,
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Vec3;
    use crate::metadata::Difficulty;
    use crate::models::scene::{HeadlessScene, Marker};
    use crate::params::ParamValue;
    use serde::Serialize;

    /// Constant-velocity particle whose velocity can be poisoned for guard tests.
    #[derive(Debug, Clone, Serialize)]
    struct Drift {
        position: Vec3,
        velocity: Vec3,
    }

    impl Model for Drift {
        const MAX_DT: f64 = 0.1;

        fn metadata() -> SimulationMetadata {
            SimulationMetadata::new("drift", "Drift", "test", "test", Difficulty::Beginner, &[], false)
        }

        fn parameters() -> ParameterSchema {
            ParameterSchema::new().number("speed", "Speed", 1.0, 0.0, 10.0, 0.1)
        }

        fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
            Self {
                position: Vec3::ZERO,
                velocity: Vec3::new(params.number("speed"), 0.0, 0.0),
            }
        }

        fn step(&mut self, dt: f64, _state: &SimulationState) {
            self.position += self.velocity * dt;
        }

        fn markers(&self) -> Vec<Marker> {
            vec![Marker::new(self.position, 1.0)]
        }
    }

    fn speed(v: f64) -> ParamMap {
        let mut p = ParamMap::new();
        p.insert("speed".into(), v.into());
        p
    }

    #[test]
    fn test_update_before_initialize_is_noop() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.update(0.1, &SimulationState::new(), &mut scene);
        assert!(!host.is_active());
        assert_eq!(host.export_data(), serde_json::Value::Null);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.initialize(&speed(1.0), &mut scene);
        host.update(5.0, &SimulationState::running_at(0.0), &mut scene);
        let x = host.model().expect("active").position.x;
        assert!((x - 0.1).abs() < 1e-12, "x = {x}");
    }

    #[test]
    fn test_reset_restores_initial_without_respawning() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.initialize(&speed(2.0), &mut scene);
        for _ in 0..10 {
            host.update(0.05, &SimulationState::running_at(0.0), &mut scene);
        }
        host.reset(&mut scene);
        assert_eq!(host.model().expect("active").position, Vec3::ZERO);
        assert_eq!(scene.spawned_total(), 1);
    }

    #[test]
    fn test_reinitialize_replaces_state_and_resources() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.initialize(&speed(1.0), &mut scene);
        host.update(0.05, &SimulationState::running_at(0.0), &mut scene);
        host.initialize(&speed(3.0), &mut scene);

        let model = host.model().expect("active");
        assert_eq!(model.position, Vec3::ZERO);
        assert!((model.velocity.x - 3.0).abs() < f64::EPSILON);
        assert_eq!(scene.live_count(), 1);
        assert_eq!(
            host.current_params().expect("params")["speed"],
            ParamValue::Number(3.0)
        );
    }

    #[test]
    fn test_cleanup_releases_everything() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.cleanup(&mut scene);
        host.initialize(&speed(1.0), &mut scene);
        host.cleanup(&mut scene);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(host.resource_count(), 0);
        assert!(!host.is_active());
        assert!(host.current_params().is_none());
    }

    #[test]
    fn test_non_finite_guard_restores_initial() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.initialize(&speed(f64::INFINITY), &mut scene);
        host.update(0.05, &SimulationState::running_at(0.0), &mut scene);

        let model = host.model().expect("active");
        assert_eq!(model.position, Vec3::ZERO);
        let (_, marker) = scene.iter().next().expect("marker");
        assert!(marker.position.is_finite());
    }

    #[test]
    fn test_guard_can_be_disabled() {
        let mut scene = HeadlessScene::new();
        let options = ModelOptions {
            reset_on_non_finite: false,
            ..ModelOptions::default()
        };
        let mut host = Hosted::<Drift>::new(options);
        host.initialize(&speed(f64::INFINITY), &mut scene);
        host.update(0.05, &SimulationState::running_at(0.0), &mut scene);
        assert!(!host.model().expect("active").position.is_finite());
    }

    #[test]
    fn test_export_data_is_json_snapshot() {
        let mut scene = HeadlessScene::new();
        let mut host = Hosted::<Drift>::new(ModelOptions::default());
        host.initialize(&speed(1.5), &mut scene);
        let data = host.export_data();
        assert_eq!(data["velocity"]["x"], 1.5);
    }
}
