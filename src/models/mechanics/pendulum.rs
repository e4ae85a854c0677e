//! Nonlinear damped simple pendulum.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::{Trail, Vec3};
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

const TRAIL_CAPACITY: usize = 150;

/// Bob on a rigid massless rod, pivot at the origin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pendulum {
    length: f64,
    mass: f64,
    gravity: f64,
    damping: f64,
    /// Angle from the downward vertical (rad).
    angle: f64,
    angular_velocity: f64,
    trail: Trail<Vec3>,
}

impl Pendulum {
    /// Angle from vertical (rad).
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Angular velocity (rad/s).
    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Bob position relative to the pivot.
    #[must_use]
    pub fn bob(&self) -> Vec3 {
        Vec3::new(
            self.length * self.angle.sin(),
            -self.length * self.angle.cos(),
            0.0,
        )
    }

    /// Total mechanical energy (zero potential at the lowest point).
    #[must_use]
    pub fn energy(&self) -> f64 {
        let kinetic = 0.5 * self.mass * (self.length * self.angular_velocity).powi(2);
        let potential = self.mass * self.gravity * self.length * (1.0 - self.angle.cos());
        kinetic + potential
    }

    /// Recent bob positions.
    #[must_use]
    pub const fn trail(&self) -> &Trail<Vec3> {
        &self.trail
    }
}

impl Model for Pendulum {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "pendulum",
            "Simple Pendulum",
            "A swinging bob showing nonlinear oscillation and damping",
            "mechanics",
            Difficulty::Beginner,
            &["oscillation", "gravity", "energy"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("length", "Length (m)", 2.0, 0.5, 5.0, 0.1)
            .number("mass", "Mass (kg)", 1.0, 0.1, 10.0, 0.1)
            .number("gravity", "Gravity (m/s²)", 9.81, 1.0, 20.0, 0.1)
            .number("damping", "Damping", 0.1, 0.0, 1.0, 0.01)
            .number("initialAngle", "Initial Angle (°)", 45.0, -180.0, 180.0, 1.0)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let mut pendulum = Self {
            length: params.positive("length", 0.1),
            mass: params.positive("mass", 0.01),
            gravity: params.number("gravity"),
            damping: params.number("damping").max(0.0),
            angle: params.degrees("initialAngle"),
            angular_velocity: 0.0,
            trail: Trail::new(TRAIL_CAPACITY),
        };
        pendulum.trail.push(pendulum.bob());
        pendulum
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let alpha = -(self.gravity / self.length) * self.angle.sin()
            - self.damping / self.mass * self.angular_velocity;
        self.angular_velocity += alpha * dt;
        self.angle += self.angular_velocity * dt;
        self.trail.push(self.bob());
    }

    fn markers(&self) -> Vec<Marker> {
        vec![
            Marker::new(Vec3::ZERO, 0.1),
            Marker::new(self.bob(), 0.3),
        ]
    }
}
