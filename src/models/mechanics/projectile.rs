//! Projectile motion with optional quadratic air resistance.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::{Trail, Vec2};
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Display radius of the ball; its centre rests at this height on the ground.
pub const BALL_RADIUS: f64 = 0.5;

const TRAIL_CAPACITY: usize = 200;

/// Ball launched from the ground; freezes once it lands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    gravity: f64,
    /// Quadratic drag coefficient divided by mass (1/m).
    drag: f64,
    flight_time: f64,
    max_height: f64,
    landed: bool,
    trail: Trail<Vec2>,
}

impl Projectile {
    /// Current position (centre of the ball).
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Time spent in the air so far.
    #[must_use]
    pub const fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// Horizontal distance from the launch point.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.position.x
    }

    /// Highest point reached, measured from the ground.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.max_height - BALL_RADIUS
    }

    /// Whether the ball has hit the ground.
    #[must_use]
    pub const fn has_landed(&self) -> bool {
        self.landed
    }

    /// Recent positions.
    #[must_use]
    pub const fn trail(&self) -> &Trail<Vec2> {
        &self.trail
    }
}

impl Model for Projectile {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "projectile",
            "Projectile Motion",
            "Launch a ball and watch gravity and air resistance shape its arc",
            "mechanics",
            Difficulty::Beginner,
            &["kinematics", "gravity", "drag"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("initialVelocity", "Initial Velocity (m/s)", 20.0, 1.0, 50.0, 0.5)
            .number("angle", "Launch Angle (°)", 45.0, 0.0, 90.0, 1.0)
            .number("gravity", "Gravity (m/s²)", 9.81, 1.0, 20.0, 0.1)
            .number("airResistance", "Air Resistance", 0.0, 0.0, 0.5, 0.01)
            .describe("Quadratic drag coefficient; 0 gives the ideal parabola")
            .number("mass", "Mass (kg)", 1.0, 0.1, 10.0, 0.1)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let angle = params.degrees("angle");
        let speed = params.number("initialVelocity");
        let mass = params.positive("mass", 0.01);
        let position = Vec2::new(0.0, BALL_RADIUS);

        let mut trail = Trail::new(TRAIL_CAPACITY);
        trail.push(position);

        Self {
            position,
            velocity: Vec2::from_angle(angle) * speed,
            gravity: params.number("gravity"),
            drag: params.number("airResistance").max(0.0) / mass,
            flight_time: 0.0,
            max_height: position.y,
            landed: false,
            trail,
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        if self.landed {
            return;
        }

        let drag = self.velocity * (-self.drag * self.velocity.length());
        let accel = Vec2::new(0.0, -self.gravity) + drag;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
        self.flight_time += dt;
        self.max_height = self.max_height.max(self.position.y);

        if self.position.y <= BALL_RADIUS && self.velocity.y < 0.0 {
            self.position.y = BALL_RADIUS;
            self.velocity = Vec2::ZERO;
            self.landed = true;
            log::debug!(
                "projectile landed at x = {:.3} after {:.3}s",
                self.position.x,
                self.flight_time
            );
        }
        self.trail.push(self.position);
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker::new(self.position.extend(0.0), BALL_RADIUS)]
    }
}
