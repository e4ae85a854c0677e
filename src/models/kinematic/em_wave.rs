//! Plane electromagnetic wave travelling along +x.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

const MAX_SAMPLES: usize = 200;

/// `E = A·sin(kx − ωt)·ŷ`, `B = A·sin(kx − ωt)·ẑ` (display units, in phase).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmWave {
    time: f64,
    amplitude: f64,
    wave_number: f64,
    angular_frequency: f64,
    length: f64,
    samples: usize,
}

impl EmWave {
    /// Accumulated simulation time.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Electric and magnetic field vectors at `x`.
    #[must_use]
    pub fn field_at(&self, x: f64) -> (Vec3, Vec3) {
        let s = self.amplitude * (self.wave_number * x - self.angular_frequency * self.time).sin();
        (Vec3::new(0.0, s, 0.0), Vec3::new(0.0, 0.0, s))
    }

    /// Phase velocity `ω/k`.
    #[must_use]
    pub fn phase_velocity(&self) -> f64 {
        self.angular_frequency / self.wave_number
    }

    fn sample_x(&self, i: usize) -> f64 {
        if self.samples < 2 {
            return 0.0;
        }
        (i as f64 / (self.samples - 1) as f64 - 0.5) * self.length
    }
}

impl Model for EmWave {
    const MAX_DT: f64 = super::MAX_DT;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "em-wave",
            "Electromagnetic Wave",
            "Perpendicular electric and magnetic fields propagating through space",
            "electromagnetism",
            Difficulty::Intermediate,
            &["electromagnetism", "waves", "light"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("frequency", "Frequency (Hz)", 0.5, 0.1, 3.0, 0.1)
            .number("wavelength", "Wavelength", 5.0, 1.0, 20.0, 0.5)
            .number("amplitude", "Amplitude", 2.0, 0.5, 5.0, 0.1)
            .number("length", "Domain Length", 20.0, 5.0, 50.0, 1.0)
            .number("samples", "Field Samples", 40.0, 10.0, 200.0, 1.0)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        Self {
            time: 0.0,
            amplitude: params.number("amplitude"),
            wave_number: std::f64::consts::TAU / params.positive("wavelength", 1e-3),
            angular_frequency: std::f64::consts::TAU * params.number("frequency"),
            length: params.number("length"),
            samples: params.count("samples", 2, MAX_SAMPLES),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        self.time += dt;
    }

    fn markers(&self) -> Vec<Marker> {
        (0..self.samples)
            .flat_map(|i| {
                let x = self.sample_x(i);
                let base = Vec3::new(x, 0.0, 0.0);
                let (e, b) = self.field_at(x);
                [Marker::new(base + e, 0.1), Marker::new(base + b, 0.1)]
            })
            .collect()
    }
}
