//! Two gravitating bodies orbiting their common centre of mass.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::{Trail, Vec3};
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::gravity::circular_speed;
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Below this separation the force contribution is skipped.
pub const MIN_DISTANCE: f64 = 0.1;

const TRAIL_CAPACITY: usize = 300;

#[derive(Debug, Clone, Serialize)]
struct Body {
    mass: f64,
    position: Vec3,
    velocity: Vec3,
    trail: Trail<Vec3>,
}

/// Unsoftened two-body problem in the x-y plane.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoBodyOrbit {
    gravitational_constant: f64,
    bodies: [Body; 2],
}

impl TwoBodyOrbit {
    /// Total linear momentum `m₁v₁ + m₂v₂`.
    #[must_use]
    pub fn momentum(&self) -> Vec3 {
        self.bodies
            .iter()
            .fold(Vec3::ZERO, |acc, b| acc + b.velocity * b.mass)
    }

    /// Kinetic plus gravitational potential energy.
    #[must_use]
    pub fn energy(&self) -> f64 {
        let [a, b] = &self.bodies;
        let kinetic = 0.5 * a.mass * a.velocity.length_squared()
            + 0.5 * b.mass * b.velocity.length_squared();
        let r = self.separation().max(MIN_DISTANCE);
        kinetic - self.gravitational_constant * a.mass * b.mass / r
    }

    /// Distance between the bodies.
    #[must_use]
    pub fn separation(&self) -> f64 {
        (self.bodies[1].position - self.bodies[0].position).length()
    }

    /// Body positions.
    #[must_use]
    pub fn positions(&self) -> [Vec3; 2] {
        [self.bodies[0].position, self.bodies[1].position]
    }

    /// Trail of body `index` (0 or 1).
    #[must_use]
    pub fn trail(&self, index: usize) -> Option<&Trail<Vec3>> {
        self.bodies.get(index).map(|b| &b.trail)
    }
}

impl Model for TwoBodyOrbit {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "two-body-orbit",
            "Two-Body Orbit",
            "Two masses orbiting their common centre of mass under Newtonian gravity",
            "astronomy",
            Difficulty::Intermediate,
            &["gravity", "orbit", "kepler"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("gravitationalConstant", "Gravitational Constant", 1.0, 0.1, 5.0, 0.1)
            .number("mass1", "Mass 1", 10.0, 1.0, 100.0, 1.0)
            .number("mass2", "Mass 2", 1.0, 0.1, 10.0, 0.1)
            .number("distance", "Initial Distance", 5.0, 1.0, 20.0, 0.5)
            .number("velocityFactor", "Velocity Factor", 1.0, 0.0, 1.5, 0.05)
            .describe("Multiple of the circular-orbit speed; 1 gives a circle")
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let g = params.number("gravitationalConstant").max(0.0);
        let m1 = params.positive("mass1", 0.01);
        let m2 = params.positive("mass2", 0.01);
        let distance = params.positive("distance", MIN_DISTANCE);
        let total = m1 + m2;

        let speed = circular_speed(g, total, distance) * params.number("velocityFactor");
        let body = |mass: f64, offset: f64, v: f64| {
            let position = Vec3::new(offset, 0.0, 0.0);
            let mut trail = Trail::new(TRAIL_CAPACITY);
            trail.push(position);
            Body {
                mass,
                position,
                velocity: Vec3::new(0.0, v, 0.0),
                trail,
            }
        };

        Self {
            gravitational_constant: g,
            bodies: [
                body(m1, -distance * m2 / total, -speed * m2 / total),
                body(m2, distance * m1 / total, speed * m1 / total),
            ],
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let [a, b] = &mut self.bodies;
        let delta = b.position - a.position;
        let r = delta.length();
        if r >= MIN_DISTANCE {
            let force = self.gravitational_constant * a.mass * b.mass / (r * r);
            let impulse = delta * (force * dt / r);
            a.velocity += impulse * (1.0 / a.mass);
            b.velocity -= impulse * (1.0 / b.mass);
        }
        for body in &mut self.bodies {
            body.position += body.velocity * dt;
            body.trail.push(body.position);
        }
    }

    fn markers(&self) -> Vec<Marker> {
        self.bodies
            .iter()
            .map(|b| Marker::new(b.position, 0.3 * b.mass.cbrt()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_momentum_is_conserved_every_step() {
        let mut o: TwoBodyOrbit = with(&[("velocityFactor", 0.7.into())]);
        let p0 = o.momentum();
        let state = SimulationState::running_at(0.0);
        for _ in 0..1_000 {
            o.step(0.016, &state);
            assert!((o.momentum() - p0).length() < 1e-9);
        }
    }

    #[test]
    fn test_energy_drift_is_bounded() {
        let mut o: TwoBodyOrbit = defaults();
        let e0 = o.energy();
        let state = SimulationState::running_at(0.0);
        for _ in 0..1_000 {
            o.step(0.016, &state);
            let drift = ((o.energy() - e0) / e0).abs();
            assert!(drift < 0.05, "drift {drift}");
        }
    }

    #[test]
    fn test_circular_orbit_keeps_separation() {
        let mut o: TwoBodyOrbit = defaults();
        run(&mut o, 0.01, 2_000);
        assert!((o.separation() - 5.0).abs() < 0.1, "r = {}", o.separation());
    }

    #[test]
    fn test_coincident_bodies_skip_force() {
        let mut o: TwoBodyOrbit = with(&[("distance", 0.0.into()), ("velocityFactor", 0.0.into())]);
        run(&mut o, 0.016, 100);
        assert!(o.positions().iter().all(Vec3::is_finite));
        assert!(o.energy().is_finite());
    }

    #[test]
    fn test_trails_are_bounded() {
        let mut o: TwoBodyOrbit = defaults();
        run(&mut o, 0.016, 1_000);
        assert_eq!(o.trail(0).map(Trail::len), Some(TRAIL_CAPACITY));
        assert!(o.trail(2).is_none());
    }
}
