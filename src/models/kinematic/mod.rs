//! Analytic (time-indexed) models.
//!
//! Positions are explicit functions of the model's accumulated time, so any
//! step pattern reaching the same time yields the same state. They still go
//! through the ordinary `step(dt)` contract, but a frame is never capped:
//! the model clock advances by exactly the engine's frame delta and stays
//! equal to the engine's elapsed time.

mod dna_helix;
mod em_wave;
mod solar_system;
mod wave_interference;

pub use dna_helix::DnaHelix;
pub use em_wave::EmWave;
pub use solar_system::{Planet, SolarSystem, PLANETS};
pub use wave_interference::WaveInterference;

/// Analytic models take any finite frame delta whole.
pub const MAX_DT: f64 = f64::INFINITY;
