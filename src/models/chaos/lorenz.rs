//! Lorenz attractor.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::{Trail, Vec3};
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Integration step, independent of the frame delta.
pub const STEP: f64 = 0.005;

const MAX_STEPS_PER_FRAME: usize = 50;
const TRAIL_CAPACITY: usize = 2_000;

/// Render scale applied to the attractor's coordinates.
const DISPLAY_SCALE: f64 = 0.5;

/// Trajectory of the Lorenz system
/// `ẋ = σ(y − x)`, `ẏ = x(ρ − z) − y`, `ż = xy − βz`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LorenzAttractor {
    sigma: f64,
    rho: f64,
    beta: f64,
    steps_per_frame: usize,
    point: Vec3,
    trail: Trail<Vec3>,
}

impl LorenzAttractor {
    /// Current point in phase space.
    #[must_use]
    pub const fn point(&self) -> Vec3 {
        self.point
    }

    /// Recent trajectory.
    #[must_use]
    pub const fn trail(&self) -> &Trail<Vec3> {
        &self.trail
    }

    /// Time derivative at `p`.
    #[must_use]
    pub fn derivative(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.sigma * (p.y - p.x),
            p.x * (self.rho - p.z) - p.y,
            p.x * p.y - self.beta * p.z,
        )
    }

    /// One fixed Euler step.
    pub fn advance(&mut self) {
        self.point += self.derivative(self.point) * STEP;
    }
}

impl Model for LorenzAttractor {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "lorenz-attractor",
            "Lorenz Attractor",
            "The butterfly-shaped strange attractor of a simplified convection model",
            "chaos",
            Difficulty::Advanced,
            &["chaos", "attractor", "ode"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("sigma", "σ (Prandtl)", 10.0, 1.0, 20.0, 0.1)
            .number("rho", "ρ (Rayleigh)", 28.0, 1.0, 50.0, 0.1)
            .number("beta", "β", 8.0 / 3.0, 0.1, 5.0, 0.01)
            .number("stepsPerFrame", "Steps per Frame", 5.0, 1.0, 20.0, 1.0)
            .vector("initialPoint", "Initial Point", Vec3::new(0.1, 0.0, 0.0))
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let point = params.vector("initialPoint");
        let mut trail = Trail::new(TRAIL_CAPACITY);
        trail.push(point);
        Self {
            sigma: params.number("sigma"),
            rho: params.number("rho"),
            beta: params.number("beta"),
            steps_per_frame: params.count("stepsPerFrame", 1, MAX_STEPS_PER_FRAME),
            point,
            trail,
        }
    }

    fn step(&mut self, _dt: f64, _state: &SimulationState) {
        for _ in 0..self.steps_per_frame {
            self.advance();
            self.trail.push(self.point);
        }
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker::new(self.point * DISPLAY_SCALE, 0.3)]
    }
}
