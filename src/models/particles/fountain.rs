//! Particle fountain with finite lifetimes.

use serde::Serialize;

use super::{cloud_markers, Particle, MAX_PARTICLES};
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Fixed-size pool of particles emitted from the origin in an upward cone.
///
/// A particle is re-emitted when its age exceeds the lifetime or it falls
/// below the floor. Initial ages are staggered so emission looks continuous.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    ages: Vec<f64>,
    lifetime: f64,
    speed: f64,
    spread: f64,
    gravity: f64,
    emitted: u64,
    rng: SimRng,
}

impl ParticleSystem {
    /// Total number of (re-)emissions since initialization.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Particle ages.
    #[must_use]
    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    fn emit(&mut self) -> Particle {
        let tilt = self.rng.gen_range_f64(0.0, self.spread);
        let heading = self.rng.gen_angle();
        let speed = self.speed * self.rng.gen_range_f64(0.8, 1.2);
        let horizontal = speed * tilt.sin();
        self.emitted += 1;
        Particle {
            position: Vec3::ZERO,
            velocity: Vec3::new(
                horizontal * heading.cos(),
                speed * tilt.cos(),
                horizontal * heading.sin(),
            ),
        }
    }
}

impl Model for ParticleSystem {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "particle-system",
            "Particle Fountain",
            "A fountain of short-lived particles arcing under gravity",
            "particles",
            Difficulty::Beginner,
            &["particles", "gravity", "projectile"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("particleCount", "Particles", 300.0, 10.0, 500.0, 10.0)
            .number("lifetime", "Lifetime (s)", 3.0, 0.5, 10.0, 0.1)
            .number("initialSpeed", "Launch Speed (m/s)", 10.0, 1.0, 30.0, 0.5)
            .number("spread", "Spread (°)", 20.0, 0.0, 90.0, 1.0)
            .number("gravity", "Gravity (m/s²)", 9.81, 0.0, 20.0, 0.1)
    }

    fn from_params(params: &ParamValues, rng: SimRng) -> Self {
        let count = params.count("particleCount", 1, MAX_PARTICLES);
        let lifetime = params.positive("lifetime", 0.05);
        let mut system = Self {
            particles: Vec::with_capacity(count),
            ages: Vec::with_capacity(count),
            lifetime,
            speed: params.number("initialSpeed"),
            spread: params.degrees("spread").clamp(0.0, std::f64::consts::FRAC_PI_2),
            gravity: params.number("gravity"),
            emitted: 0,
            rng,
        };
        for _ in 0..count {
            let particle = system.emit();
            let age = system.rng.gen_range_f64(0.0, lifetime);
            system.particles.push(particle);
            system.ages.push(age);
        }
        system.emitted = 0;
        system
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let gravity = Vec3::new(0.0, -self.gravity, 0.0);
        for i in 0..self.particles.len() {
            self.particles[i].integrate(gravity, dt);
            self.ages[i] += dt;
            if self.ages[i] > self.lifetime || self.particles[i].position.y < 0.0 {
                self.particles[i] = self.emit();
                self.ages[i] = 0.0;
            }
        }
    }

    fn markers(&self) -> Vec<Marker> {
        cloud_markers(&self.particles, 0.08)
    }
}
