//! Particle-cloud models.
//!
//! Many independent point masses under gravity plus pairwise or field
//! forces, each advanced by per-particle Euler. The domain is closed by
//! re-injection: a particle leaving its height or radius bound is respawned
//! at a randomized boundary position drawn from the model's own rng.

mod fluid;
mod fountain;
mod plasma;
mod tornado;

pub use fluid::Fluid;
pub use fountain::ParticleSystem;
pub use plasma::Plasma;
pub use tornado::Tornado;

use serde::Serialize;

use crate::kinematics::Vec3;
use crate::models::scene::Marker;

/// Upper bound on particles in any cloud.
pub const MAX_PARTICLES: usize = 500;

/// Point mass shared by the cloud models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    /// Position.
    pub position: Vec3,
    /// Velocity.
    pub velocity: Vec3,
}

impl Particle {
    /// Particle at rest at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// `v += a·dt; x += v·dt`.
    pub fn integrate(&mut self, accel: Vec3, dt: f64) {
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
    }
}

/// One marker per particle.
#[must_use]
pub fn cloud_markers(particles: &[Particle], radius: f64) -> Vec<Marker> {
    particles
        .iter()
        .map(|p| Marker::new(p.position, radius))
        .collect()
}
