//! Damped harmonic oscillator: a block on a horizontal spring.

use serde::Serialize;

use crate::engine::clock::substeps;
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Longest inner step; keeps lightly damped runs energy-monotone.
const MAX_SUBSTEP: f64 = 0.005;

/// Mass on a spring with viscous damping, `m·a = −k·x − c·v`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringMass {
    mass: f64,
    spring_constant: f64,
    damping: f64,
    position: f64,
    velocity: f64,
}

impl SpringMass {
    /// Displacement from equilibrium.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Velocity.
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Total mechanical energy `½k·x² + ½m·v²`.
    #[must_use]
    pub fn energy(&self) -> f64 {
        0.5 * self.spring_constant * self.position * self.position
            + 0.5 * self.mass * self.velocity * self.velocity
    }

    /// Undamped angular frequency `√(k/m)`.
    #[must_use]
    pub fn angular_frequency(&self) -> f64 {
        (self.spring_constant / self.mass).sqrt()
    }

    /// Undamped period `2π/ω`.
    #[must_use]
    pub fn period(&self) -> f64 {
        std::f64::consts::TAU / self.angular_frequency()
    }
}

impl Model for SpringMass {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "spring-mass",
            "Spring-Mass System",
            "Simple harmonic motion with adjustable stiffness and damping",
            "mechanics",
            Difficulty::Beginner,
            &["oscillation", "harmonic", "energy"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("mass", "Mass (kg)", 1.0, 0.1, 10.0, 0.1)
            .number("springConstant", "Spring Constant (N/m)", 10.0, 1.0, 50.0, 0.5)
            .number("damping", "Damping (N·s/m)", 0.5, 0.0, 5.0, 0.1)
            .number("displacement", "Initial Displacement (m)", 2.0, -5.0, 5.0, 0.1)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        Self {
            mass: params.positive("mass", 0.01),
            spring_constant: params.number("springConstant").max(0.0),
            damping: params.number("damping").max(0.0),
            position: params.number("displacement"),
            velocity: 0.0,
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let count = ((dt / MAX_SUBSTEP).ceil() as usize).max(1);
        for h in substeps(dt, count) {
            let force = -self.spring_constant * self.position - self.damping * self.velocity;
            self.velocity += force / self.mass * h;
            self.position += self.velocity * h;
        }
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker::new(Vec3::new(self.position, 0.0, 0.0), 0.5)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_energy_non_increasing_when_damped() {
        for damping in [0.1, 0.5, 1.0, 2.0, 5.0] {
            for dt in [0.05, 0.016] {
                let mut s: SpringMass = with(&[("damping", damping.into())]);
                let state = SimulationState::running_at(0.0);
                let mut previous = s.energy();
                for step in 0..1_000 {
                    s.step(dt, &state);
                    let e = s.energy();
                    assert!(
                        e <= previous + 1e-9,
                        "c = {damping}, dt = {dt}, step {step}: {e} > {previous}"
                    );
                    previous = e;
                }
            }
        }
    }

    #[test]
    fn test_undamped_period() {
        let mut s: SpringMass = with(&[("damping", 0.0.into())]);
        let period = s.period();
        assert!((period - 1.987).abs() < 1e-3);

        let dt = period / 1_000.0;
        run(&mut s, dt, 1_000);
        assert!((s.position() - 2.0).abs() < 0.05, "x = {}", s.position());
        assert!(s.velocity().abs() < 0.1, "v = {}", s.velocity());
    }

    #[test]
    fn test_damped_motion_decays() {
        let mut s: SpringMass = defaults();
        run(&mut s, 0.01, 3_000);
        assert!(s.position().abs() < 0.5);
        assert!(s.energy() < 0.05 * 20.0);
    }
}
