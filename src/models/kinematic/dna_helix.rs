//! Rotating DNA double helix.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

const MAX_BASE_PAIRS: usize = 100;

/// Two antiparallel strands spun about the vertical axis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaHelix {
    time: f64,
    base_pairs: usize,
    radius: f64,
    rise: f64,
    twist: f64,
    rotation_speed: f64,
}

impl DnaHelix {
    /// Accumulated simulation time.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Number of base pairs.
    #[must_use]
    pub const fn base_pairs(&self) -> usize {
        self.base_pairs
    }

    /// Backbone positions of base pair `index` on both strands.
    #[must_use]
    pub fn pair(&self, index: usize) -> (Vec3, Vec3) {
        let i = index as f64;
        let phase = i * self.twist + self.rotation_speed * self.time;
        let height = (i - (self.base_pairs as f64 - 1.0) * 0.5) * self.rise;
        let strand = |angle: f64| {
            let (sin, cos) = angle.sin_cos();
            Vec3::new(self.radius * cos, height, self.radius * sin)
        };
        (strand(phase), strand(phase + std::f64::consts::PI))
    }
}

impl Model for DnaHelix {
    const MAX_DT: f64 = super::MAX_DT;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "dna-helix",
            "DNA Double Helix",
            "The double-helix geometry of DNA rotating in space",
            "biology",
            Difficulty::Beginner,
            &["biology", "molecule", "geometry"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("basePairs", "Base Pairs", 20.0, 5.0, 50.0, 1.0)
            .number("radius", "Helix Radius", 2.0, 0.5, 5.0, 0.1)
            .number("rise", "Rise per Base Pair", 0.5, 0.1, 2.0, 0.05)
            .number("twist", "Twist per Base Pair (°)", 36.0, 10.0, 90.0, 1.0)
            .number("rotationSpeed", "Rotation Speed (rad/s)", 0.5, 0.0, 5.0, 0.1)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        Self {
            time: 0.0,
            base_pairs: params.count("basePairs", 1, MAX_BASE_PAIRS),
            radius: params.number("radius"),
            rise: params.number("rise"),
            twist: params.degrees("twist"),
            rotation_speed: params.number("rotationSpeed"),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        self.time += dt;
    }

    fn markers(&self) -> Vec<Marker> {
        (0..self.base_pairs)
            .flat_map(|i| {
                let (a, b) = self.pair(i);
                [Marker::new(a, 0.25), Marker::new(b, 0.25)]
            })
            .collect()
    }
}
