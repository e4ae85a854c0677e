//! Single-body Euler models and the bouncing-ball box.
//!
//! All of them use the same stepping rule, `v += a(state)·dt; x += v·dt`,
//! with a closed-form acceleration and a floor policy that clamps position
//! and damps the normal velocity component.

mod bouncing_balls;
mod pendulum;
mod projectile;
mod rocket;
mod spring_mass;

pub use bouncing_balls::BouncingBalls;
pub use pendulum::Pendulum;
pub use projectile::{Projectile, BALL_RADIUS};
pub use rocket::Rocket;
pub use spring_mass::SpringMass;

/// Largest restitution any bounce applies (every bounce loses energy).
pub const MAX_RESTITUTION: f64 = 0.95;

/// Clamp a restitution coefficient into `[0, MAX_RESTITUTION]`.
#[must_use]
pub fn restitution(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_RESTITUTION)
    } else {
        0.0
    }
}
