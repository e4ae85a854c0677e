//! Two disk galaxies passing through each other.
//!
//! The cores are massive softened bodies attracting each other; stars are
//! test particles feeling both cores but not each other.

use serde::Serialize;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::kinematics::Vec3;
use crate::metadata::{Difficulty, SimulationMetadata};
use crate::models::gravity::{circular_speed, softened_accel};
use crate::models::scene::Marker;
use crate::models::{Model, MIN_SOFTENING};
use crate::params::{ParamValues, ParameterSchema};

const MAX_STARS_PER_GALAXY: usize = 250;

/// Encounter geometries offered by the `encounter` parameter.
const ENCOUNTERS: [&str; 2] = ["grazing", "head-on"];

/// Offset between the approach lines, as a fraction of the separation.
fn impact_fraction(encounter: &str) -> f64 {
    match encounter {
        "head-on" => 0.0,
        _ => 0.125,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Core {
    mass: f64,
    position: Vec3,
    velocity: Vec3,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Star {
    position: Vec3,
    velocity: Vec3,
}

/// Two cores plus their star disks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxyCollision {
    gravitational_constant: f64,
    softening: f64,
    cores: [Core; 2],
    stars: Vec<Star>,
}

impl GalaxyCollision {
    /// Distance between the two cores.
    #[must_use]
    pub fn core_separation(&self) -> f64 {
        (self.cores[1].position - self.cores[0].position).length()
    }

    /// Momentum of the two cores.
    #[must_use]
    pub fn core_momentum(&self) -> Vec3 {
        self.cores
            .iter()
            .fold(Vec3::ZERO, |acc, c| acc + c.velocity * c.mass)
    }

    /// Number of stars across both galaxies.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Star positions.
    pub fn star_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.stars.iter().map(|s| s.position)
    }

    /// Vertical angular momentum of galaxy `index`'s stars about its core.
    ///
    /// The sign gives the sense of rotation of that disk.
    #[must_use]
    pub fn disk_spin(&self, index: usize) -> f64 {
        let Some(core) = self.cores.get(index) else {
            return 0.0;
        };
        let per_galaxy = self.stars.len() / 2;
        self.stars
            .iter()
            .skip(index * per_galaxy)
            .take(per_galaxy)
            .map(|s| {
                let r = s.position - core.position;
                let v = s.velocity - core.velocity;
                r.z * v.x - r.x * v.z
            })
            .sum()
    }
}

impl Model for GalaxyCollision {
    const MAX_DT: f64 = 0.05;

    fn metadata() -> SimulationMetadata {
        SimulationMetadata::new(
            "galaxy-collision",
            "Galaxy Collision",
            "Two spiral galaxies merging under mutual gravity",
            "astronomy",
            Difficulty::Advanced,
            &["gravity", "galaxy", "n-body"],
            true,
        )
    }

    fn parameters() -> ParameterSchema {
        ParameterSchema::new()
            .number("starsPerGalaxy", "Stars per Galaxy", 100.0, 10.0, 250.0, 10.0)
            .number("galaxyMass", "Galaxy Core Mass", 500.0, 100.0, 2000.0, 50.0)
            .number("separation", "Initial Separation", 40.0, 10.0, 80.0, 1.0)
            .number("relativeVelocity", "Approach Speed", 3.0, 0.0, 10.0, 0.1)
            .number("gravitationalConstant", "Gravitational Constant", 1.0, 0.1, 5.0, 0.1)
            .number("softening", "Softening", 1.0, 0.1, 5.0, 0.1)
            .select("encounter", "Encounter", "grazing", &ENCOUNTERS)
            .describe("Grazing passes offset the cores; head-on aims them at each other")
            .boolean("counterRotating", "Counter-rotating Disks", true)
    }

    fn from_params(params: &ParamValues, mut rng: SimRng) -> Self {
        let g = params.number("gravitationalConstant").max(0.0);
        let mass = params.positive("galaxyMass", 1.0);
        let separation = params.positive("separation", 2.0);
        let approach = params.number("relativeVelocity");
        let per_galaxy = params.count("starsPerGalaxy", 1, MAX_STARS_PER_GALAXY);
        let half = separation * 0.5;
        let impact = separation * impact_fraction(params.text("encounter"));
        let second_spin = if params.boolean("counterRotating") { -1.0 } else { 1.0 };

        let cores = [
            Core {
                mass,
                position: Vec3::new(-half, 0.0, -impact),
                velocity: Vec3::new(approach * 0.5, 0.0, 0.0),
            },
            Core {
                mass,
                position: Vec3::new(half, 0.0, impact),
                velocity: Vec3::new(-approach * 0.5, 0.0, 0.0),
            },
        ];

        let disk = (separation * 0.25).max(1.5);
        let mut stars = Vec::with_capacity(per_galaxy * 2);
        for (core, spin) in cores.iter().zip([1.0, second_spin]) {
            for _ in 0..per_galaxy {
                let r = rng.gen_range_f64(1.0, disk);
                let theta = rng.gen_angle();
                let (sin, cos) = theta.sin_cos();
                let speed = circular_speed(g, core.mass, r) * spin;
                stars.push(Star {
                    position: core.position + Vec3::new(r * cos, rng.gen_range_f64(-0.2, 0.2), r * sin),
                    velocity: core.velocity + Vec3::new(-speed * sin, 0.0, speed * cos),
                });
            }
        }

        Self {
            gravitational_constant: g,
            softening: params.number("softening").max(MIN_SOFTENING),
            cores,
            stars,
        }
    }

    fn step(&mut self, dt: f64, _state: &SimulationState) {
        let eps2 = self.softening * self.softening;
        let g = self.gravitational_constant;

        let [a, b] = &mut self.cores;
        let unit = softened_accel(a.position, b.position, g, eps2);
        a.velocity += unit * (b.mass * dt);
        b.velocity -= unit * (a.mass * dt);

        let cores = self.cores;
        for star in &mut self.stars {
            let accel = cores.iter().fold(Vec3::ZERO, |acc, c| {
                acc + softened_accel(star.position, c.position, g * c.mass, eps2)
            });
            star.velocity += accel * dt;
            star.position += star.velocity * dt;
        }
        for core in &mut self.cores {
            core.position += core.velocity * dt;
        }
    }

    fn markers(&self) -> Vec<Marker> {
        self.cores
            .iter()
            .map(|c| Marker::new(c.position, 1.0))
            .chain(self.stars.iter().map(|s| Marker::new(s.position, 0.08)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::testing::{defaults, run, with};

    #[test]
    fn test_cores_approach() {
        let mut sim: GalaxyCollision = defaults();
        let d0 = sim.core_separation();
        run(&mut sim, 0.05, 100);
        assert!(sim.core_separation() < d0);
    }

    #[test]
    fn test_core_momentum_conserved() {
        let mut sim: GalaxyCollision = defaults();
        let p0 = sim.core_momentum();
        run(&mut sim, 0.05, 500);
        assert!((sim.core_momentum() - p0).length() < 1e-8);
    }

    #[test]
    fn test_star_count_and_finiteness() {
        let mut sim: GalaxyCollision = with(&[("starsPerGalaxy", 30.0.into())]);
        assert_eq!(sim.star_count(), 60);
        run(&mut sim, 0.05, 400);
        assert!(sim.star_positions().all(|p| p.is_finite()));
        assert_eq!(sim.markers().len(), 62);
    }

    #[test]
    fn test_encounter_geometry() {
        let head_on: GalaxyCollision = with(&[("encounter", "head-on".into())]);
        assert!((head_on.core_separation() - 40.0).abs() < 1e-12);

        let grazing: GalaxyCollision = defaults();
        assert!(grazing.core_separation() > 40.0);

        let unknown: GalaxyCollision = with(&[("encounter", "sideways".into())]);
        assert!((unknown.core_separation() - grazing.core_separation()).abs() < 1e-12);
    }

    #[test]
    fn test_disk_rotation_sense() {
        let counter: GalaxyCollision = defaults();
        assert!(counter.disk_spin(0) * counter.disk_spin(1) < 0.0);

        let co: GalaxyCollision = with(&[("counterRotating", false.into())]);
        assert!(co.disk_spin(0) * co.disk_spin(1) > 0.0);
        assert_eq!(co.disk_spin(2), 0.0);
    }
}
