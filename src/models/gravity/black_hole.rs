//! Accretion disk around a black hole.
//!
//! Test particles orbit a fixed softened point mass and slowly lose
//! tangential speed, spiralling inward. Particles crossing the event horizon
//! or escaping far beyond the disk are re-injected at the outer edge.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::gravity::{circular_speed, softened_accel};
use crate::models::scene::Marker;
use crate::models::{Model, MIN_SOFTENING};
use crate::params::{ParamValues, ParameterSchema};

const MAX_PARTICLES: usize = 500;

/// Escape radius as a multiple of the disk radius.
const ESCAPE_FACTOR: f64 = 2.5;

#[derive(Debug, Clone, Copy, Serialize)]
struct Particle {
    position: Vec3,
    velocity: Vec3,
}

/// Black hole with a re-injected particle disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackHole {
    g_mass: f64,
    horizon: f64,
    disk_radius: f64,
    softening: f64,
    accretion_rate: f64,
    particles: Vec<Particle>,
    absorbed: u64,
    escaped: u64,
    rng: SimRng,
}

impl BlackHole {
    /// Particles swallowed by the horizon so far.
    #[must_use]
    pub const fn absorbed(&self) -> u64 {
        self.absorbed
    }

    /// Particles that escaped the domain so far.
    #[must_use]
    pub const fn escaped(&self) -> u64 {
        self.escaped
    }

    /// Event horizon radius.
    #[must_use]
    pub const fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    fn spawn(&mut self, r_min: f64) -> Particle {
        let r = self.rng.gen_range_f64(r_min, self.disk_radius);
        let theta = self.rng.gen_angle();
        let (sin, cos) = theta.sin_cos();
        let speed = circular_speed(1.0, self.g_mass, r);
        Particle {
            position: Vec3::new(r * cos, self.rng.gen_range_f64(-0.3, 0.3), r * sin),
            velocity: Vec3::new(-speed * sin, 0.0, speed * cos),
        }
    }
}

impl Model for BlackHole {
    const MAX_DT: f64 = 0.02;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "black-hole",
            "Black Hole Accretion",
            "Matter spiralling into a black hole through an accretion disk",
            "astronomy",
            Difficulty::Advanced,
            &["gravity", "black-hole", "accretion"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("blackHoleMass", "Black Hole Mass", 1000.0, 100.0, 5000.0, 50.0)
            .number("particleCount", "Particles", 200.0, 10.0, 500.0, 10.0)
            .number("diskRadius", "Disk Radius", 30.0, 10.0, 60.0, 1.0)
            .number("eventHorizon", "Event Horizon", 2.0, 0.5, 5.0, 0.1)
            .number("accretionRate", "Accretion Rate", 0.1, 0.0, 1.0, 0.01)
            .describe("Fractional loss of speed per second, driving the inspiral")
            .number("gravitationalConstant", "Gravitational Constant", 1.0, 0.1, 5.0, 0.1)
    }

    fn from_params(params: &ParamValues, rng: SimRng) -> Self {
        let horizon = params.positive("eventHorizon", 0.1);
        let mut hole = Self {
            g_mass: params.number("gravitationalConstant").max(0.0)
                * params.number("blackHoleMass").max(0.0),
            horizon,
            disk_radius: params.number("diskRadius").max(horizon * 4.0),
            softening: (horizon * 0.25).max(MIN_SOFTENING),
            accretion_rate: params.number("accretionRate").clamp(0.0, 10.0),
            particles: Vec::new(),
            absorbed: 0,
            escaped: 0,
            rng,
        };
        let count = params.count("particleCount", 1, MAX_PARTICLES);
        hole.particles = (0..count).map(|_| hole.spawn(horizon * 3.0)).collect();
        hole
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let eps2 = self.softening * self.softening;
        let escape = self.disk_radius * ESCAPE_FACTOR;
        let damping = (1.0 - self.accretion_rate * dt).max(0.0);
        let inner = self.disk_radius * 0.8;

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            let a = softened_accel(p.position, Vec3::ZERO, self.g_mass, eps2);
            p.velocity = (p.velocity + a * dt) * damping;
            p.position += p.velocity * dt;

            let r = p.position.length();
            if r < self.horizon {
                self.absorbed += 1;
                p = self.spawn(inner);
            } else if r > escape {
                self.escaped += 1;
                p = self.spawn(inner);
            }
            self.particles[i] = p;
        }
    }

    fn markers(&self) -> Vec<Marker> {
        std::iter::once(Marker::new(Vec3::ZERO, self.horizon))
            .chain(self.particles.iter().map(|p| Marker::new(p.position, 0.1)))
            .collect()
    }
}
