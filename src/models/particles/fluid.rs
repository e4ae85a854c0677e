//! Particle fluid in a damped box.
//!
//! A cheap smoothed-particle model: neighbours closer than the smoothing
//! radius push apart with a linear kernel and exchange momentum through a
//! viscosity term. Both forces are symmetric, so the interaction alone
//! conserves momentum; the walls absorb energy.

use serde::Serialize;

use super::{cloud_markers, Particle, MAX_PARTICLES};
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::mechanics::restitution;
use crate::models::scene::Marker;
use crate::models::{Model, MIN_SOFTENING};
use crate::params::{ParamValues, ParameterSchema};

/// Fluid particles in an open-top box.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fluid {
    particles: Vec<Particle>,
    gravity: f64,
    pressure: f64,
    viscosity: f64,
    smoothing: f64,
    half_size: f64,
    wall_damping: f64,
    #[serde(skip)]
    accel: Vec<Vec3>,
}

impl Fluid {
    /// Particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Half-width of the container.
    #[must_use]
    pub const fn half_size(&self) -> f64 {
        self.half_size
    }

    /// Mean height of the particles.
    #[must_use]
    pub fn mean_height(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.positions().map(|p| p.y).sum::<f64>() / self.particles.len() as f64
    }

    /// Total kinetic energy per unit mass.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.particles
            .iter()
            .map(|p| 0.5 * p.velocity.length_squared())
            .sum()
    }

    fn accumulate_interactions(&mut self) {
        let n = self.particles.len();
        let h = self.smoothing;
        for i in 0..n {
            for j in (i + 1)..n {
                let (pi, pj) = (self.particles[i], self.particles[j]);
                let delta = pj.position - pi.position;
                let dist = delta.length();
                if dist >= h {
                    continue;
                }
                let weight = 1.0 - dist / h;
                let normal = delta * (1.0 / dist.max(MIN_SOFTENING));
                let push = normal * (self.pressure * weight);
                let drag = (pj.velocity - pi.velocity) * (self.viscosity * weight);
                let force = drag - push;
                self.accel[i] += force;
                self.accel[j] -= force;
            }
        }
    }

    fn contain(&mut self) {
        let limit = self.half_size;
        let e = self.wall_damping;
        for p in &mut self.particles {
            if p.position.y < 0.0 {
                p.position.y = 0.0;
                p.velocity.y = p.velocity.y.abs() * e;
            }
            for (x, v) in [
                (&mut p.position.x, &mut p.velocity.x),
                (&mut p.position.z, &mut p.velocity.z),
            ] {
                if *x > limit {
                    *x = limit;
                    *v = -v.abs() * e;
                } else if *x < -limit {
                    *x = -limit;
                    *v = v.abs() * e;
                }
            }
        }
    }
}

impl Model for Fluid {
    const MAX_DT: f64 = 0.02;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "fluid",
            "Fluid Dynamics",
            "A particle fluid sloshing under pressure, viscosity and gravity",
            "fluids",
            Difficulty::Advanced,
            &["fluid", "particles", "viscosity"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("particleCount", "Particles", 200.0, 50.0, 500.0, 10.0)
            .number("viscosity", "Viscosity", 0.5, 0.0, 5.0, 0.1)
            .number("pressure", "Pressure Stiffness", 20.0, 1.0, 100.0, 1.0)
            .number("gravity", "Gravity (m/s²)", 9.81, 0.0, 20.0, 0.1)
            .number("smoothingRadius", "Smoothing Radius", 1.0, 0.3, 3.0, 0.1)
            .number("containerSize", "Container Size", 10.0, 4.0, 30.0, 1.0)
            .number("wallDamping", "Wall Damping", 0.5, 0.0, 0.95, 0.05)
    }

    fn from_params(params: &ParamValues, mut rng: SimRng) -> Self {
        let count = params.count("particleCount", 1, MAX_PARTICLES);
        let half_size = (params.number("containerSize") * 0.5).max(1.0);

        // Drop a block of fluid into one corner of the box.
        let block = half_size * 0.6;
        let particles: Vec<Particle> = (0..count)
            .map(|_| {
                Particle::at(Vec3::new(
                    rng.gen_range_f64(-half_size, -half_size + block),
                    rng.gen_range_f64(0.5, 0.5 + block * 1.5),
                    rng.gen_range_f64(-half_size, half_size),
                ))
            })
            .collect();

        Self {
            accel: vec![Vec3::ZERO; particles.len()],
            particles,
            gravity: params.number("gravity"),
            pressure: params.number("pressure").max(0.0),
            viscosity: params.number("viscosity").max(0.0),
            smoothing: params.positive("smoothingRadius", 0.05),
            half_size,
            wall_damping: restitution(params.number("wallDamping")),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let gravity = Vec3::new(0.0, -self.gravity, 0.0);
        self.accel.clear();
        self.accel.resize(self.particles.len(), gravity);
        self.accumulate_interactions();
        for (p, a) in self.particles.iter_mut().zip(&self.accel) {
            p.integrate(*a, dt);
        }
        self.contain();
    }

    fn markers(&self) -> Vec<Marker> {
        cloud_markers(&self.particles, self.smoothing * 0.25)
    }
}
