//! Gravitational models.
//!
//! Pairwise force `F = G·m₁·m₂ / r²` along the separation unit vector.
//! The two-body model guards with a minimum distance; the multi-body models
//! add a softening term `ε²` to `r²` so near-coincident bodies never produce
//! a singular force. Force accumulation is O(n²) with equal-and-opposite
//! updates, then velocities and positions advance by semi-implicit Euler.

mod black_hole;
mod galaxy_collision;
mod n_body;
mod two_body;

pub use black_hole::BlackHole;
pub use galaxy_collision::GalaxyCollision;
pub use n_body::NBody;
pub use two_body::TwoBodyOrbit;

use crate::kinematics::Vec3;

/// Softened acceleration on a body at `from` due to `mass` at `to`.
///
/// `a = G·m·d / (|d|² + ε²)^{3/2}` with `d = to − from`.
#[must_use]
pub fn softened_accel(from: Vec3, to: Vec3, g_mass: f64, softening_sq: f64) -> Vec3 {
    let d = to - from;
    let r2 = d.length_squared() + softening_sq;
    if r2 <= 0.0 {
        return Vec3::ZERO;
    }
    let inv_r3 = 1.0 / (r2 * r2.sqrt());
    d * (g_mass * inv_r3)
}

/// Speed of a circular orbit of radius `r` around mass `mass`.
#[must_use]
pub fn circular_speed(g: f64, mass: f64, r: f64) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    (g * mass / r).max(0.0).sqrt()
}
