//! Two point sources superposing on a square height field.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

const MAX_GRID: usize = 60;

/// Height field `h(p, t) = Σ A·sin(k·|p − sᵢ| − ω·t)` over two sources.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveInterference {
    time: f64,
    amplitude: f64,
    wave_number: f64,
    angular_frequency: f64,
    separation: f64,
    grid_size: usize,
    spacing: f64,
}

impl WaveInterference {
    /// Accumulated simulation time.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Source positions on the x axis.
    #[must_use]
    pub fn sources(&self) -> [Vec3; 2] {
        let half = self.separation * 0.5;
        [Vec3::new(-half, 0.0, 0.0), Vec3::new(half, 0.0, 0.0)]
    }

    /// Surface height at `(x, z)`.
    #[must_use]
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let p = Vec3::new(x, 0.0, z);
        self.sources()
            .iter()
            .map(|s| {
                let r = (p - *s).length();
                self.amplitude * (self.wave_number * r - self.angular_frequency * self.time).sin()
            })
            .sum()
    }

    /// Grid points per side.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    fn grid_coord(&self, i: usize) -> f64 {
        (i as f64 - (self.grid_size as f64 - 1.0) * 0.5) * self.spacing
    }
}

impl Model for WaveInterference {
    const MAX_DT: f64 = super::MAX_DT;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "wave-interference",
            "Wave Interference",
            "Two coherent sources producing constructive and destructive interference",
            "waves",
            Difficulty::Intermediate,
            &["waves", "interference", "superposition"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("frequency", "Frequency (Hz)", 1.0, 0.1, 5.0, 0.1)
            .number("wavelength", "Wavelength", 4.0, 1.0, 10.0, 0.1)
            .number("amplitude", "Amplitude", 1.0, 0.1, 3.0, 0.1)
            .number("sourceSeparation", "Source Separation", 6.0, 1.0, 15.0, 0.5)
            .number("gridSize", "Grid Resolution", 30.0, 5.0, 60.0, 1.0)
            .number("gridSpacing", "Grid Spacing", 1.0, 0.2, 2.0, 0.1)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        let wavelength = params.positive("wavelength", 1e-3);
        Self {
            time: 0.0,
            amplitude: params.number("amplitude"),
            wave_number: std::f64::consts::TAU / wavelength,
            angular_frequency: std::f64::consts::TAU * params.number("frequency"),
            separation: params.number("sourceSeparation"),
            grid_size: params.count("gridSize", 2, MAX_GRID),
            spacing: params.positive("gridSpacing", 1e-3),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        self.time += dt;
    }

    fn markers(&self) -> Vec<Marker> {
        let n = self.grid_size;
        (0..n * n)
            .map(|idx| {
                let x = self.grid_coord(idx % n);
                let z = self.grid_coord(idx / n);
                Marker::new(Vec3::new(x, self.height_at(x, z), z), self.spacing * 0.2)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_bisector_is_constructive() {
        let mut w: WaveInterference = defaults();
        run(&mut w, 0.05, 7);
        let single = {
            let r: f64 = (3.0f64 * 3.0 + 5.0 * 5.0).sqrt();
            (w.wave_number * r - w.angular_frequency * w.time()).sin()
        };
        assert!((w.height_at(0.0, 5.0) - 2.0 * single).abs() < 1e-9);
    }

    #[test]
    fn test_half_wavelength_path_difference_cancels() {
        // Sources at ±2, λ = 4: at x = 1 the path difference is λ/2.
        let w: WaveInterference = with(&[("sourceSeparation", 4.0.into())]);
        assert!(w.height_at(1.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_amplitude_bound_and_grid() {
        let mut w: WaveInterference = with(&[("gridSize", 10.0.into())]);
        run(&mut w, 0.1, 13);
        let markers = w.markers();
        assert_eq!(markers.len(), 100);
        assert!(markers.iter().all(|m| m.position.y.abs() <= 2.0 + 1e-12));
    }

    #[test]
    fn test_time_indexed() {
        let mut a: WaveInterference = defaults();
        let mut b: WaveInterference = defaults();
        run(&mut a, 0.1, 10);
        run(&mut b, 0.025, 40);
        assert!((a.height_at(2.0, 3.0) - b.height_at(2.0, 3.0)).abs() < 1e-9);
    }
}
