//! Double pendulum with exact Lagrangian accelerations.

use serde::Serialize;

use crate::engine::clock::substeps;
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::{Trail, Vec3};
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Sub-steps per frame.
pub const SUBSTEPS: usize = 5;

const MIN_MASS: f64 = 0.1;
const MIN_LENGTH: f64 = 0.1;
const TRAIL_CAPACITY: usize = 500;

/// Two point masses on rigid rods, pivot at the origin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoublePendulum {
    length1: f64,
    length2: f64,
    mass1: f64,
    mass2: f64,
    gravity: f64,
    damping: f64,
    angle1: f64,
    angle2: f64,
    velocity1: f64,
    velocity2: f64,
    trail: Trail<Vec3>,
}

impl DoublePendulum {
    /// Angles `(θ₁, θ₂)` from the downward vertical.
    #[must_use]
    pub const fn angles(&self) -> (f64, f64) {
        (self.angle1, self.angle2)
    }

    /// Angular velocities `(ω₁, ω₂)`.
    #[must_use]
    pub const fn angular_velocities(&self) -> (f64, f64) {
        (self.velocity1, self.velocity2)
    }

    /// Bob positions relative to the pivot.
    #[must_use]
    pub fn bobs(&self) -> (Vec3, Vec3) {
        let first = Vec3::new(
            self.length1 * self.angle1.sin(),
            -self.length1 * self.angle1.cos(),
            0.0,
        );
        let second = first
            + Vec3::new(
                self.length2 * self.angle2.sin(),
                -self.length2 * self.angle2.cos(),
                0.0,
            );
        (first, second)
    }

    /// Total mechanical energy (potential zero at the pivot).
    #[must_use]
    pub fn energy(&self) -> f64 {
        let (m1, m2, l1, l2) = (self.mass1, self.mass2, self.length1, self.length2);
        let (w1, w2) = (self.velocity1, self.velocity2);
        let kinetic = 0.5 * m1 * (l1 * w1).powi(2)
            + 0.5
                * m2
                * ((l1 * w1).powi(2)
                    + (l2 * w2).powi(2)
                    + 2.0 * l1 * l2 * w1 * w2 * (self.angle1 - self.angle2).cos());
        let (b1, b2) = self.bobs();
        kinetic + self.gravity * (m1 * b1.y + m2 * b2.y)
    }

    /// Recent positions of the outer bob.
    #[must_use]
    pub const fn trail(&self) -> &Trail<Vec3> {
        &self.trail
    }

    /// Angular accelerations `(α₁, α₂)` from the Lagrangian equations of motion.
    #[must_use]
    pub fn accelerations(&self) -> (f64, f64) {
        let (m1, m2, l1, l2, g) = (self.mass1, self.mass2, self.length1, self.length2, self.gravity);
        let (t1, t2, w1, w2) = (self.angle1, self.angle2, self.velocity1, self.velocity2);
        let delta = t1 - t2;
        let den = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();

        let num1 = -g * (2.0 * m1 + m2) * t1.sin()
            - m2 * g * (t1 - 2.0 * t2).sin()
            - 2.0 * delta.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos());
        let num2 = 2.0
            * delta.sin()
            * (w1 * w1 * l1 * (m1 + m2) + g * (m1 + m2) * t1.cos() + w2 * w2 * l2 * m2 * delta.cos());

        (
            num1 / (l1 * den) - self.damping * w1,
            num2 / (l2 * den) - self.damping * w2,
        )
    }
}

impl Model for DoublePendulum {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "double-pendulum",
            "Double Pendulum",
            "A pendulum hanging from a pendulum: sensitive dependence on initial conditions",
            "chaos",
            Difficulty::Intermediate,
            &["chaos", "lagrangian", "oscillation"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("length1", "Upper Rod Length (m)", 1.0, 0.5, 3.0, 0.1)
            .number("length2", "Lower Rod Length (m)", 1.0, 0.5, 3.0, 0.1)
            .number("mass1", "Upper Mass (kg)", 1.0, 0.1, 5.0, 0.1)
            .number("mass2", "Lower Mass (kg)", 1.0, 0.1, 5.0, 0.1)
            .number("angle1", "Upper Angle (°)", 120.0, -180.0, 180.0, 1.0)
            .number("angle2", "Lower Angle (°)", -20.0, -180.0, 180.0, 1.0)
            .number("gravity", "Gravity (m/s²)", 9.81, 1.0, 20.0, 0.1)
            .number("damping", "Damping", 0.0, 0.0, 0.5, 0.01)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let mut pendulum = Self {
            length1: params.positive("length1", MIN_LENGTH),
            length2: params.positive("length2", MIN_LENGTH),
            mass1: params.positive("mass1", MIN_MASS),
            mass2: params.positive("mass2", MIN_MASS),
            gravity: params.number("gravity"),
            damping: params.number("damping").max(0.0),
            angle1: params.degrees("angle1"),
            angle2: params.degrees("angle2"),
            velocity1: 0.0,
            velocity2: 0.0,
            trail: Trail::new(TRAIL_CAPACITY),
        };
        pendulum.trail.push(pendulum.bobs().1);
        pendulum
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        for h in substeps(dt, SUBSTEPS) {
            let (a1, a2) = self.accelerations();
            self.velocity1 += a1 * h;
            self.velocity2 += a2 * h;
            self.angle1 += self.velocity1 * h;
            self.angle2 += self.velocity2 * h;
        }
        self.trail.push(self.bobs().1);
    }

    fn markers(&self) -> Vec<Marker> {
        let (first, second) = self.bobs();
        vec![
            Marker::new(Vec3::ZERO, 0.05),
            Marker::new(first, 0.1 * self.mass1.cbrt()),
            Marker::new(second, 0.1 * self.mass2.cbrt()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_hanging_at_rest_stays_at_rest() {
        let mut p: DoublePendulum = with(&[("angle1", 0.0.into()), ("angle2", 0.0.into())]);
        run(&mut p, 0.016, 500);
        let (t1, t2) = p.angles();
        assert!(t1.abs() < 1e-12 && t2.abs() < 1e-12);
    }

    #[test]
    fn test_energy_roughly_conserved_undamped() {
        let mut p: DoublePendulum = defaults();
        let e0 = p.energy();
        let scale = 9.81 * 3.0;
        let state = SimulationState::running_at(0.0);
        for _ in 0..2_000 {
            p.step(0.005, &state);
            assert!((p.energy() - e0).abs() / scale < 0.1, "ΔE = {}", p.energy() - e0);
        }
    }

    #[test]
    fn test_sensitive_to_initial_conditions() {
        let mut a: DoublePendulum = defaults();
        let mut b: DoublePendulum = with(&[("angle1", 120.001.into())]);
        run(&mut a, 0.01, 2_000);
        run(&mut b, 0.01, 2_000);
        let (a1, _) = a.angles();
        let (b1, _) = b.angles();
        assert!((a1 - b1).abs() > 1e-3, "trajectories should separate");
    }

    #[test]
    fn test_degenerate_masses_are_clamped() {
        let mut p: DoublePendulum = with(&[
            ("mass1", 0.0.into()),
            ("mass2", 0.0.into()),
            ("length1", 0.0.into()),
        ]);
        run(&mut p, 0.05, 500);
        let (t1, t2) = p.angles();
        assert!(t1.is_finite() && t2.is_finite());
    }

    #[test]
    fn test_rods_stay_rigid() {
        let mut p: DoublePendulum = defaults();
        run(&mut p, 0.016, 300);
        let (first, second) = p.bobs();
        assert!((first.length() - 1.0).abs() < 1e-9);
        assert!(((second - first).length() - 1.0).abs() < 1e-9);
        assert!(p.trail().len() <= TRAIL_CAPACITY);
    }
}
