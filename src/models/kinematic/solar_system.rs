//! Circular-orbit solar system, `θ(t) = θ₀ + ω·t`.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::scene::Marker;
use crate::models::Model;
use crate::params::{ParamValues, ParameterSchema};

/// Simulated seconds per Earth year at time scale 1.
pub const SECONDS_PER_YEAR: f64 = 10.0;

/// Static planet data (display units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Planet {
    /// Name.
    pub name: &'static str,
    /// Orbital radius.
    pub orbit: f64,
    /// Orbital period in Earth years.
    pub period_years: f64,
    /// Display radius.
    pub size: f64,
}

/// The eight planets, innermost first.
pub const PLANETS: [Planet; 8] = [
    Planet { name: "Mercury", orbit: 4.0, period_years: 0.24, size: 0.2 },
    Planet { name: "Venus", orbit: 6.0, period_years: 0.62, size: 0.4 },
    Planet { name: "Earth", orbit: 8.0, period_years: 1.0, size: 0.4 },
    Planet { name: "Mars", orbit: 10.0, period_years: 1.88, size: 0.3 },
    Planet { name: "Jupiter", orbit: 14.0, period_years: 11.86, size: 1.0 },
    Planet { name: "Saturn", orbit: 18.0, period_years: 29.46, size: 0.9 },
    Planet { name: "Uranus", orbit: 22.0, period_years: 84.01, size: 0.6 },
    Planet { name: "Neptune", orbit: 26.0, period_years: 164.8, size: 0.6 },
];

/// Sun plus planets on circular orbits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarSystem {
    time: f64,
    time_scale: f64,
    orbit_scale: f64,
    planet_count: usize,
}

impl SolarSystem {
    /// Accumulated simulation time.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Number of planets shown.
    #[must_use]
    pub const fn planet_count(&self) -> usize {
        self.planet_count
    }

    /// Angular speed of planet `index` (rad/s).
    #[must_use]
    pub fn angular_speed(&self, index: usize) -> f64 {
        PLANETS.get(index).map_or(0.0, |p| {
            std::f64::consts::TAU * self.time_scale / (p.period_years * SECONDS_PER_YEAR)
        })
    }

    /// Orbital angle of planet `index` at the current time.
    #[must_use]
    pub fn angle(&self, index: usize) -> f64 {
        initial_phase(index) + self.angular_speed(index) * self.time
    }

    /// Position of planet `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Vec3 {
        let Some(planet) = PLANETS.get(index) else {
            return Vec3::ZERO;
        };
        let r = planet.orbit * self.orbit_scale;
        let (sin, cos) = self.angle(index).sin_cos();
        Vec3::new(r * cos, 0.0, r * sin)
    }
}

/// Spread the planets around the Sun at `t = 0`.
fn initial_phase(index: usize) -> f64 {
    index as f64 * 0.7
}

impl Model for SolarSystem {
    const MAX_DT: f64 = super::MAX_DT;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "solar-system",
            "Solar System",
            "The planets orbiting the Sun at their relative periods",
            "astronomy",
            Difficulty::Beginner,
            &["orbit", "planets", "kepler"],
            false,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("timeScale", "Time Scale", 1.0, 0.1, 10.0, 0.1)
            .number("orbitScale", "Orbit Scale", 1.0, 0.5, 2.0, 0.1)
            .number("planetCount", "Planets", 8.0, 1.0, 8.0, 1.0)
    }

    fn from_params(params: &ParamValues, _rng: SimRng) -> Self {
        Self {
            time: 0.0,
            time_scale: params.number("timeScale"),
            orbit_scale: params.positive("orbitScale", 0.01),
            planet_count: params.count("planetCount", 1, PLANETS.len()),
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        self.time += dt;
    }

    fn markers(&self) -> Vec<Marker> {
        std::iter::once(Marker::new(Vec3::ZERO, 2.0))
            .chain(
                PLANETS
                    .iter()
                    .take(self.planet_count)
                    .enumerate()
                    .map(|(i, p)| Marker::new(self.position(i), p.size)),
            )
            .collect()
    }
}
