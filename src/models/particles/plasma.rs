//! Charged particles in a magnetic confinement field.

use serde::Serialize;

use super::{cloud_markers, Particle, MAX_PARTICLES};
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::{Model, MIN_SOFTENING};
use crate::params::{ParamValues, ParameterSchema};

/// Softening length of the Coulomb repulsion.
const COULOMB_SOFTENING: f64 = 0.5;

/// Unit-mass charges under `a = q(E + v×B) − k·r + Σ repulsion`.
///
/// `B` points along +y and `E` along +x. Particles leaving the containment
/// radius are re-injected near the centre.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plasma {
    particles: Vec<Particle>,
    charges: Vec<f64>,
    magnetic_field: Vec3,
    electric_field: Vec3,
    confinement: f64,
    repulsion: f64,
    containment_radius: f64,
    respawned: u64,
    rng: SimRng,
    #[serde(skip)]
    accel: Vec<Vec3>,
}

impl Plasma {
    /// Particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Particle charges (±1).
    #[must_use]
    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    /// Containment radius.
    #[must_use]
    pub const fn containment_radius(&self) -> f64 {
        self.containment_radius
    }

    /// Particles re-injected so far.
    #[must_use]
    pub const fn respawned(&self) -> u64 {
        self.respawned
    }

    /// Total kinetic energy.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.particles
            .iter()
            .map(|p| 0.5 * p.velocity.length_squared())
            .sum()
    }

    fn spawn(&mut self) -> Particle {
        let r = self.containment_radius * 0.3;
        Particle {
            position: Vec3::new(
                self.rng.gen_range_f64(-r, r),
                self.rng.gen_range_f64(-r, r),
                self.rng.gen_range_f64(-r, r),
            ),
            velocity: Vec3::new(
                self.rng.gen_normal(0.0, 1.0),
                self.rng.gen_normal(0.0, 1.0),
                self.rng.gen_normal(0.0, 1.0),
            ),
        }
    }

    fn accumulate_repulsion(&mut self) {
        let n = self.particles.len();
        let eps2 = COULOMB_SOFTENING * COULOMB_SOFTENING;
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.particles[j].position - self.particles[i].position;
                let r2 = delta.length_squared() + eps2;
                let inv_r3 = 1.0 / (r2 * r2.sqrt()).max(MIN_SOFTENING);
                let force = delta * (self.repulsion * self.charges[i] * self.charges[j] * inv_r3);
                self.accel[i] -= force;
                self.accel[j] += force;
            }
        }
    }
}

impl Model for Plasma {
    const MAX_DT: f64 = 0.02;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "plasma",
            "Plasma Confinement",
            "Charged particles gyrating in magnetic and electric fields",
            "electromagnetism",
            Difficulty::Advanced,
            &["plasma", "lorentz", "electromagnetism"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("particleCount", "Particles", 200.0, 20.0, 500.0, 10.0)
            .number("magneticField", "Magnetic Field", 2.0, 0.0, 10.0, 0.1)
            .number("electricField", "Electric Field", 0.0, -5.0, 5.0, 0.1)
            .number("confinement", "Confinement", 0.5, 0.0, 5.0, 0.1)
            .describe("Spring constant of the central restoring field")
            .number("repulsion", "Coulomb Strength", 0.2, 0.0, 2.0, 0.05)
            .number("containmentRadius", "Containment Radius", 10.0, 3.0, 30.0, 0.5)
    }

    fn from_params(params: &ParamValues, rng: SimRng) -> Self {
        let count = params.count("particleCount", 1, MAX_PARTICLES);
        let mut plasma = Self {
            particles: Vec::with_capacity(count),
            charges: Vec::with_capacity(count),
            magnetic_field: Vec3::new(0.0, params.number("magneticField"), 0.0),
            electric_field: Vec3::new(params.number("electricField"), 0.0, 0.0),
            confinement: params.number("confinement").max(0.0),
            repulsion: params.number("repulsion").max(0.0),
            containment_radius: params.positive("containmentRadius", 1.0),
            respawned: 0,
            rng,
            accel: vec![Vec3::ZERO; count],
        };
        for i in 0..count {
            let particle = plasma.spawn();
            plasma.particles.push(particle);
            plasma.charges.push(if i % 2 == 0 { 1.0 } else { -1.0 });
        }
        plasma
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        self.accel.clear();
        self.accel.resize(self.particles.len(), Vec3::ZERO);
        if self.repulsion > 0.0 {
            self.accumulate_repulsion();
        }

        for i in 0..self.particles.len() {
            let p = self.particles[i];
            let q = self.charges[i];
            let lorentz = (self.electric_field + p.velocity.cross(&self.magnetic_field)) * q;
            let restoring = p.position * -self.confinement;
            self.particles[i].integrate(self.accel[i] + lorentz + restoring, dt);

            if self.particles[i].position.length() > self.containment_radius {
                self.particles[i] = self.spawn();
                self.respawned += 1;
            }
        }
    }

    fn markers(&self) -> Vec<Marker> {
        cloud_markers(&self.particles, 0.1)
    }
}
