//! Softened N-body gravitation around a heavy central body.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::gravity::{circular_speed, softened_accel};
use crate::models::scene::Marker;
use crate::models::{Model, MIN_SOFTENING};
use crate::params::{ParamValues, ParameterSchema};

/// Upper bound on simulated bodies (pairwise cost is O(n²)).
pub const MAX_BODIES: usize = 500;

#[derive(Debug, Clone, Copy, Serialize)]
struct Body {
    mass: f64,
    position: Vec3,
    velocity: Vec3,
}

/// Body 0 is the central mass; the rest start on circular orbits in a disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NBody {
    gravitational_constant: f64,
    softening: f64,
    bodies: Vec<Body>,
    #[serde(skip)]
    accel: Vec<Vec3>,
}

impl NBody {
    /// Number of bodies including the central mass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether there are no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Total linear momentum.
    #[must_use]
    pub fn momentum(&self) -> Vec3 {
        self.bodies
            .iter()
            .fold(Vec3::ZERO, |acc, b| acc + b.velocity * b.mass)
    }

    /// Mass-weighted centre.
    #[must_use]
    pub fn center_of_mass(&self) -> Vec3 {
        let total: f64 = self.bodies.iter().map(|b| b.mass).sum();
        if total <= 0.0 {
            return Vec3::ZERO;
        }
        self.bodies
            .iter()
            .fold(Vec3::ZERO, |acc, b| acc + b.position * b.mass)
            * (1.0 / total)
    }

    /// Body positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.bodies.iter().map(|b| b.position)
    }
}

impl Model for NBody {
    const MAX_DT: f64 = 0.02;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "n-body",
            "N-Body Gravity",
            "Many bodies attracting each other pairwise around a central mass",
            "astronomy",
            Difficulty::Advanced,
            &["gravity", "n-body", "orbit"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("bodyCount", "Number of Bodies", 50.0, 2.0, 200.0, 1.0)
            .number("gravitationalConstant", "Gravitational Constant", 1.0, 0.1, 5.0, 0.1)
            .number("centralMass", "Central Mass", 1000.0, 0.0, 5000.0, 50.0)
            .number("diskRadius", "Disk Radius", 20.0, 5.0, 50.0, 1.0)
            .number("softening", "Softening", 0.5, 0.01, 2.0, 0.01)
            .describe("Added to the squared separation to avoid singular forces")
    }

    fn from_params(params: &ParamValues, mut rng: SimRng) -> Self {
        let g = params.number("gravitationalConstant").max(0.0);
        let count = params.count("bodyCount", 2, MAX_BODIES);
        let central = params.number("centralMass").max(0.0);
        let radius = params.positive("diskRadius", 2.0);

        let mut bodies = Vec::with_capacity(count);
        bodies.push(Body {
            mass: central.max(MIN_SOFTENING),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        });
        for _ in 1..count {
            let r = rng.gen_range_f64(2.0, radius);
            let theta = rng.gen_angle();
            let (sin, cos) = theta.sin_cos();
            let speed = circular_speed(g, central, r);
            bodies.push(Body {
                mass: rng.gen_range_f64(0.5, 2.0),
                position: Vec3::new(r * cos, rng.gen_range_f64(-0.5, 0.5), r * sin),
                velocity: Vec3::new(-speed * sin, 0.0, speed * cos),
            });
        }

        // Zero net momentum so the system does not drift off screen.
        let total: f64 = bodies.iter().map(|b| b.mass).sum();
        let drift = bodies
            .iter()
            .fold(Vec3::ZERO, |acc, b| acc + b.velocity * b.mass)
            * (1.0 / total);
        for body in &mut bodies {
            body.velocity -= drift;
        }

        Self {
            gravitational_constant: g,
            softening: params.number("softening").max(MIN_SOFTENING),
            accel: vec![Vec3::ZERO; bodies.len()],
            bodies,
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let n = self.bodies.len();
        let eps2 = self.softening * self.softening;
        self.accel.clear();
        self.accel.resize(n, Vec3::ZERO);

        for i in 0..n {
            for j in (i + 1)..n {
                let (bi, bj) = (self.bodies[i], self.bodies[j]);
                let unit = softened_accel(bi.position, bj.position, self.gravitational_constant, eps2);
                self.accel[i] += unit * bj.mass;
                self.accel[j] -= unit * bi.mass;
            }
        }

        for (body, a) in self.bodies.iter_mut().zip(&self.accel) {
            body.velocity += *a * dt;
            body.position += body.velocity * dt;
        }
    }

    fn markers(&self) -> Vec<Marker> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let radius = if i == 0 { 1.0 } else { 0.1 * b.mass.cbrt() };
                Marker::new(b.position, radius)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_momentum_conserved() {
        let mut sim: NBody = with(&[("bodyCount", 30.0.into())]);
        let p0 = sim.momentum();
        run(&mut sim, 0.01, 200);
        let scale: f64 = 1000.0;
        assert!((sim.momentum() - p0).length() / scale < 1e-9);
    }

    #[test]
    fn test_starts_with_zero_momentum() {
        let sim: NBody = defaults();
        assert!(sim.momentum().length() < 1e-9);
        assert_eq!(sim.len(), 50);
    }

    #[test]
    fn test_body_count_is_clamped() {
        let sim: NBody = with(&[("bodyCount", 10_000.0.into())]);
        assert_eq!(sim.len(), MAX_BODIES);
    }

    #[test]
    fn test_same_seed_same_disk() {
        let a: NBody = defaults();
        let b: NBody = defaults();
        assert!(a.positions().eq(b.positions()));
    }

    #[test]
    fn test_stays_finite_with_tiny_softening() {
        let mut sim: NBody = with(&[("softening", 0.0.into())]);
        run(&mut sim, 0.02, 200);
        assert!(sim.positions().all(|p| p.is_finite()));
        assert!(sim.center_of_mass().length() < 5.0);
    }
}
