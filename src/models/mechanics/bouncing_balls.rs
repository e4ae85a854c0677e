//! Balls bouncing in an open-top box, colliding with the walls, the floor
//! and each other.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::mechanics::restitution;
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

const MAX_BALLS: usize = 100;

#[derive(Debug, Clone, Copy, Serialize)]
struct Ball {
    position: Vec3,
    velocity: Vec3,
}

/// Equal-mass balls with restitution strictly below one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BouncingBalls {
    balls: Vec<Ball>,
    radius: f64,
    half_size: f64,
    gravity: f64,
    restitution: f64,
}

impl BouncingBalls {
    /// Number of balls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    /// Whether the box is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Ball radius; also the floor height of every ball centre.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Ball centres.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.balls.iter().map(|b| b.position)
    }

    /// Kinetic plus gravitational energy per unit mass.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.balls
            .iter()
            .map(|b| 0.5 * b.velocity.length_squared() + self.gravity * (b.position.y - self.radius))
            .sum()
    }

    fn resolve_pairs(&mut self) {
        let min_dist = 2.0 * self.radius;
        let n = self.balls.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.balls[j].position - self.balls[i].position;
                let dist = delta.length();
                if dist >= min_dist || dist < f64::EPSILON {
                    continue;
                }
                let normal = delta * (1.0 / dist);
                let correction = normal * (0.5 * (min_dist - dist));
                self.balls[i].position -= correction;
                self.balls[j].position += correction;

                let approach = (self.balls[j].velocity - self.balls[i].velocity).dot(&normal);
                if approach < 0.0 {
                    let impulse = normal * (0.5 * (1.0 + self.restitution) * approach);
                    self.balls[i].velocity += impulse;
                    self.balls[j].velocity -= impulse;
                }
            }
        }
    }

    fn resolve_walls(&mut self) {
        let limit = self.half_size - self.radius;
        let floor = self.radius;
        let e = self.restitution;
        for ball in &mut self.balls {
            if ball.position.y < floor {
                ball.position.y = floor;
                if ball.velocity.y < 0.0 {
                    ball.velocity.y = -ball.velocity.y * e;
                }
            }
            for (p, v) in [
                (&mut ball.position.x, &mut ball.velocity.x),
                (&mut ball.position.z, &mut ball.velocity.z),
            ] {
                if *p > limit {
                    *p = limit;
                    *v = -v.abs() * e;
                } else if *p < -limit {
                    *p = -limit;
                    *v = v.abs() * e;
                }
            }
        }
    }
}

impl Model for BouncingBalls {
    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "bouncing-balls",
            "Bouncing Balls",
            "Inelastic collisions between balls, walls and the floor",
            "mechanics",
            Difficulty::Beginner,
            &["collision", "restitution", "momentum"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("ballCount", "Number of Balls", 10.0, 1.0, 50.0, 1.0)
            .number("restitution", "Restitution", 0.8, 0.0, 0.95, 0.05)
            .describe("Fraction of normal velocity kept after a bounce")
            .number("gravity", "Gravity (m/s²)", 9.81, 1.0, 20.0, 0.1)
            .number("ballRadius", "Ball Radius (m)", 0.4, 0.1, 1.0, 0.05)
            .number("boxSize", "Box Size (m)", 10.0, 4.0, 30.0, 1.0)
    }

    fn from_params(params: &ParamValues, mut rng: SimRng) -> Self {
        let count = params.count("ballCount", 1, MAX_BALLS);
        let radius = params.positive("ballRadius", 0.05);
        let half_size = (params.number("boxSize") * 0.5).max(radius * 2.0);
        let spread = half_size - radius;

        let balls = (0..count)
            .map(|_| Ball {
                position: Vec3::new(
                    rng.gen_range_f64(-spread, spread),
                    rng.gen_range_f64(radius + 2.0, radius + 2.0 + half_size),
                    rng.gen_range_f64(-spread, spread),
                ),
                velocity: Vec3::new(
                    rng.gen_range_f64(-3.0, 3.0),
                    rng.gen_range_f64(-1.0, 3.0),
                    rng.gen_range_f64(-3.0, 3.0),
                ),
            })
            .collect();

        Self {
            balls,
            radius,
            half_size,
            gravity: params.number("gravity"),
            restitution: restitution(params.number("restitution")),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        for ball in &mut self.balls {
            ball.velocity.y -= self.gravity * dt;
            ball.position += ball.velocity * dt;
        }
        self.resolve_pairs();
        self.resolve_walls();
    }

    fn markers(&self) -> Vec<Marker> {
        self.balls
            .iter()
            .map(|b| Marker::new(b.position, self.radius))
            .collect()
    }
}
