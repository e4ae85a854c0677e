//! Rocket launch with finite fuel, quadratic drag and a bouncing landing.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec2;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::mechanics::restitution;
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Ground friction applied to horizontal velocity on each bounce.
const GROUND_FRICTION: f64 = 0.8;

/// Vertical speed below which a bounce comes to rest.
const REST_SPEED: f64 = 0.5;

/// Rocket with a fixed heading; thrust lasts until the fuel is gone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rocket {
    position: Vec2,
    velocity: Vec2,
    heading: Vec2,
    dry_mass: f64,
    fuel: f64,
    thrust: f64,
    burn_rate: f64,
    drag: f64,
    gravity: f64,
    restitution: f64,
    max_altitude: f64,
}

impl Rocket {
    /// Position (y is altitude).
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Remaining fuel mass (kg).
    #[must_use]
    pub const fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Dry plus fuel mass.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.fuel
    }

    /// Highest altitude reached.
    #[must_use]
    pub const fn max_altitude(&self) -> f64 {
        self.max_altitude
    }
}

impl Model for Rocket {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "rocket",
            "Rocket Launch",
            "Thrust, fuel burn and drag lift a rocket until gravity brings it back",
            "mechanics",
            Difficulty::Intermediate,
            &["thrust", "drag", "gravity"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("thrust", "Thrust (N)", 60.0, 0.0, 200.0, 1.0)
            .number("dryMass", "Dry Mass (kg)", 1.0, 0.1, 10.0, 0.1)
            .number("fuelMass", "Fuel Mass (kg)", 2.0, 0.0, 10.0, 0.1)
            .number("burnRate", "Burn Rate (kg/s)", 0.5, 0.01, 5.0, 0.01)
            .number("dragCoefficient", "Drag Coefficient", 0.02, 0.0, 0.5, 0.01)
            .number("launchAngle", "Launch Angle (°)", 85.0, 45.0, 90.0, 1.0)
            .number("gravity", "Gravity (m/s²)", 9.81, 1.0, 20.0, 0.1)
            .number("restitution", "Bounce", 0.3, 0.0, 0.9, 0.05)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            heading: Vec2::from_angle(params.degrees("launchAngle")),
            dry_mass: params.positive("dryMass", 0.01),
            fuel: params.number("fuelMass").max(0.0),
            thrust: params.number("thrust").max(0.0),
            burn_rate: params.number("burnRate").max(0.0),
            drag: params.number("dragCoefficient").max(0.0),
            gravity: params.number("gravity"),
            restitution: restitution(params.number("restitution")),
            max_altitude: 0.0,
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let mass = self.total_mass();
        let mut force = Vec2::new(0.0, -self.gravity * mass);
        if self.fuel > 0.0 {
            force += self.heading * self.thrust;
            self.fuel = (self.fuel - self.burn_rate * dt).max(0.0);
        }
        force += self.velocity * (-self.drag * self.velocity.length());

        self.velocity += force * (dt / mass);
        self.position += self.velocity * dt;

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * self.restitution;
                self.velocity.x *= GROUND_FRICTION;
                if self.velocity.y < REST_SPEED {
                    self.velocity = Vec2::ZERO;
                }
            }
        }
        self.max_altitude = self.max_altitude.max(self.position.y);
    }

    fn markers(&self) -> Vec<Marker> {
        vec![Marker::new(self.position.extend(0.0), 0.5)]
    }
}
