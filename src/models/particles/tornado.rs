//! Tornado vortex: swirl, inflow and updraft acting on a particle cloud.

use serde::Serialize;

use super::{cloud_markers, Particle, MAX_PARTICLES};
use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Linear air drag on every particle (1/s).
const AIR_DRAG: f64 = 0.5;

/// Escape radius as a multiple of the funnel radius.
const ESCAPE_FACTOR: f64 = 1.5;

/// Particles swept around and up a vertical funnel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tornado {
    particles: Vec<Particle>,
    rotation_speed: f64,
    inflow: f64,
    updraft: f64,
    turbulence: f64,
    height: f64,
    radius: f64,
    respawned: u64,
    rng: SimRng,
}

impl Tornado {
    /// Particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Funnel height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Funnel radius at the ground.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Particles re-injected so far.
    #[must_use]
    pub const fn respawned(&self) -> u64 {
        self.respawned
    }

    /// Mean angular momentum about the vertical axis per unit mass.
    #[must_use]
    pub fn mean_spin(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .particles
            .iter()
            .map(|p| p.position.x * p.velocity.z - p.position.z * p.velocity.x)
            .sum();
        total / self.particles.len() as f64
    }

    fn spawn(&mut self) -> Particle {
        let r = self.rng.gen_range_f64(0.3 * self.radius, self.radius);
        let theta = self.rng.gen_angle();
        Particle::at(Vec3::new(r * theta.cos(), 0.0, r * theta.sin()))
    }

    fn accel(&mut self, p: &Particle) -> Vec3 {
        let pos = p.position;
        let r = pos.horizontal_radius().max(0.1);
        let radial = Vec3::new(pos.x / r, 0.0, pos.z / r);
        let tangent = Vec3::new(-radial.z, 0.0, radial.x);

        let swirl = tangent * (self.rotation_speed * self.radius / (1.0 + r));
        let inflow = radial * (-self.inflow * r);
        let lift = (1.0 - pos.y / self.height).max(0.0);
        let updraft = Vec3::new(0.0, self.updraft * lift, 0.0);
        let jitter = Vec3::new(
            self.rng.gen_standard_normal(),
            self.rng.gen_standard_normal(),
            self.rng.gen_standard_normal(),
        ) * self.turbulence;

        swirl + inflow + updraft + jitter - p.velocity * AIR_DRAG
    }
}

impl Model for Tornado {
    const MAX_DT: f64 = 0.03;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "tornado",
            "Tornado Vortex",
            "Debris spiralling up a rotating funnel of air",
            "fluids",
            Difficulty::Advanced,
            &["vortex", "fluid", "particles"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("particleCount", "Particles", 300.0, 50.0, 500.0, 10.0)
            .number("rotationSpeed", "Rotation Speed", 3.0, 0.5, 10.0, 0.1)
            .number("inflowStrength", "Inflow", 0.5, 0.0, 3.0, 0.1)
            .number("updraftStrength", "Updraft", 6.0, 0.0, 20.0, 0.5)
            .number("turbulence", "Turbulence", 0.5, 0.0, 3.0, 0.1)
            .number("height", "Funnel Height", 20.0, 5.0, 50.0, 1.0)
            .number("radius", "Funnel Radius", 6.0, 1.0, 20.0, 0.5)
    }

    fn from_params(params: &ParamValues, rng: SimRng) -> Self {
        let count = params.count("particleCount", 1, MAX_PARTICLES);
        let height = params.positive("height", 1.0);
        let mut tornado = Self {
            particles: Vec::with_capacity(count),
            rotation_speed: params.number("rotationSpeed"),
            inflow: params.number("inflowStrength").max(0.0),
            updraft: params.number("updraftStrength").max(0.0),
            turbulence: params.number("turbulence").max(0.0),
            height,
            radius: params.positive("radius", 0.5),
            respawned: 0,
            rng,
        };
        for _ in 0..count {
            let mut p = tornado.spawn();
            p.position.y = tornado.rng.gen_range_f64(0.0, height);
            tornado.particles.push(p);
        }
        tornado
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let escape = self.radius * ESCAPE_FACTOR;
        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            let a = self.accel(&p);
            p.integrate(a, dt);
            if p.position.y < 0.0 {
                p.position.y = 0.0;
                p.velocity.y = 0.0;
            }
            if p.position.y > self.height || p.position.horizontal_radius() > escape {
                p = self.spawn();
                self.respawned += 1;
            }
            self.particles[i] = p;
        }
    }

    fn markers(&self) -> Vec<Marker> {
        cloud_markers(&self.particles, 0.12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_particles_stay_in_domain() {
        let mut t: Tornado = defaults();
        let state = SimulationState::running_at(0.0);
        for _ in 0..500 {
            t.step(0.03, &state);
            let escape = t.radius() * ESCAPE_FACTOR;
            assert!(t
                .positions()
                .all(|p| (0.0..=t.height()).contains(&p.y) && p.horizontal_radius() <= escape));
        }
        assert!(t.respawned() > 0);
    }

    #[test]
    fn test_cloud_rotates_counter_clockwise() {
        let mut t: Tornado = with(&[("turbulence", 0.0.into())]);
        run(&mut t, 0.03, 100);
        assert!(t.mean_spin() > 0.0);
    }

    #[test]
    fn test_reset_replays_turbulence() {
        let initial: Tornado = defaults();
        let mut a = initial.clone();
        let mut b = initial;
        run(&mut a, 0.03, 200);
        run(&mut b, 0.03, 200);
        assert!(a.positions().eq(b.positions()));
    }
}
