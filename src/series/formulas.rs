//! Closed-form chart formulas, one per simulation id.
//!
//! Analytic models are time-indexed, so their rows come from the model itself
//! built fresh and advanced to `t` in one step. Everything else uses an
//! idealized formula: drag-free flight, linear oscillators, circular orbits.
//! Chaotic and many-body models get stand-ins that only share the model's
//! parameters and will drift away from the integrated state.

use indexmap::IndexMap;

use crate::engine::rng::SimRng;
use crate::engine::SimulationState;
use crate::models::kinematic::{DnaHelix, EmWave, SolarSystem, WaveInterference, PLANETS};
use crate::models::mechanics::BALL_RADIUS;
use crate::models::Model;
use crate::params::ParamValues;

type Values = IndexMap<String, f64>;

/// Bounce limit for the bouncing-ball stand-in.
const MAX_BOUNCES: usize = 1_000;

fn row<const N: usize>(pairs: [(&str, f64); N]) -> Values {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Angle in degrees wrapped to `[0, 360)`.
fn wrapped_degrees(radians: f64) -> f64 {
    radians.to_degrees().rem_euclid(360.0)
}

/// Chart values of `id` at time `t`, or `None` if no formula exists.
pub(crate) fn evaluate(id: &str, t: f64, p: &ParamValues) -> Option<Values> {
    let values = match id {
        "projectile" => projectile(t, p),
        "spring-mass" => spring_mass(t, p),
        "pendulum" => pendulum(t, p),
        "rocket" => rocket(t, p),
        "bouncing-balls" => bouncing_balls(t, p),
        "two-body-orbit" => two_body(t, p),
        "n-body" => n_body(t, p),
        "black-hole" => black_hole(t, p),
        "galaxy-collision" => galaxy_collision(t, p),
        "double-pendulum" => double_pendulum(t, p),
        "lorenz-attractor" => lorenz(t, p),
        "solar-system" => solar_system(t, p),
        "dna-helix" => dna_helix(t, p),
        "wave-interference" => wave_interference(t, p),
        "em-wave" => em_wave(t, p),
        "fluid" => fluid(t, p),
        "particle-system" => fountain(t, p),
        "tornado" => tornado(t, p),
        "plasma" => plasma(t, p),
        _ => return None,
    };
    Some(values)
}

/// Analytic model advanced from zero to `t` in a single step.
fn analytic<M: Model>(t: f64, p: &ParamValues) -> M {
    let mut model = M::from_params(p, SimRng::new(0));
    model.step(t, &SimulationState::running_at(t));
    model
}

/// Linear oscillator `x'' + 2γx' + ω₀²x = 0` released from rest at `x0`.
///
/// Returns `(x, v)`. Covers the under-, critically and over-damped cases.
fn damped_oscillator(x0: f64, omega0_sq: f64, gamma: f64, t: f64) -> (f64, f64) {
    if omega0_sq <= 0.0 {
        return (x0, 0.0);
    }
    let disc = gamma * gamma - omega0_sq;
    let eps = 1e-12 * omega0_sq;
    if disc < -eps {
        let wd = (-disc).sqrt();
        let decay = (-gamma * t).exp();
        let (sin, cos) = (wd * t).sin_cos();
        (
            x0 * decay * (cos + gamma / wd * sin),
            -x0 * decay * omega0_sq / wd * sin,
        )
    } else if disc <= eps {
        let decay = (-gamma * t).exp();
        (x0 * decay * (1.0 + gamma * t), -x0 * gamma * gamma * t * decay)
    } else {
        let s = disc.sqrt();
        let (r1, r2) = (-gamma + s, -gamma - s);
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (
            x0 * (r2 * e1 - r1 * e2) / (r2 - r1),
            x0 * r1 * r2 * (e1 - e2) / (r2 - r1),
        )
    }
}

fn projectile(t: f64, p: &ParamValues) -> Values {
    let speed = p.number("initialVelocity");
    let angle = p.degrees("angle");
    let g = p.number("gravity");
    let (vx, vy) = (speed * angle.cos(), speed * angle.sin());

    let flight = if g > 0.0 { (2.0 * vy / g).max(0.0) } else { f64::INFINITY };
    let landed = t >= flight;
    let t = t.min(flight);
    let (x, y) = (vx * t, BALL_RADIUS + vy * t - 0.5 * g * t * t);
    let speed_now = if landed { 0.0 } else { vx.hypot(vy - g * t) };
    row([("x", x), ("y", y.max(BALL_RADIUS)), ("speed", speed_now)])
}

fn spring_mass(t: f64, p: &ParamValues) -> Values {
    let m = p.positive("mass", 0.01);
    let k = p.number("springConstant").max(0.0);
    let c = p.number("damping").max(0.0);
    let (x, v) = damped_oscillator(p.number("displacement"), k / m, c / (2.0 * m), t);
    row([
        ("position", x),
        ("velocity", v),
        ("energy", 0.5 * k * x * x + 0.5 * m * v * v),
    ])
}

/// Small-angle approximation of the damped pendulum.
fn pendulum(t: f64, p: &ParamValues) -> Values {
    let length = p.positive("length", 0.1);
    let mass = p.positive("mass", 0.01);
    let b = p.number("damping").max(0.0);
    let (theta, omega) = damped_oscillator(
        p.degrees("initialAngle"),
        p.number("gravity") / length,
        b / (2.0 * mass),
        t,
    );
    row([
        ("angle", theta.to_degrees()),
        ("angularVelocity", omega.to_degrees()),
    ])
}

/// Drag-free vertical ascent with a mass-losing burn, then ballistic coast.
fn rocket(t: f64, p: &ParamValues) -> Values {
    let thrust = p.number("thrust").max(0.0);
    let dry = p.positive("dryMass", 0.01);
    let fuel0 = p.number("fuelMass").max(0.0);
    let rate = p.number("burnRate").max(0.0);
    let lift = p.degrees("launchAngle").sin();
    let g = p.number("gravity");
    let m0 = dry + fuel0;

    let burn_time = if rate > 0.0 { fuel0 / rate } else { f64::INFINITY };
    let tb = t.min(burn_time);
    let (fuel, v_burn, h_burn) = if rate > 0.0 {
        let m = m0 - rate * tb;
        let ve = thrust / rate;
        let xlnx = |x: f64| x * x.ln() - x;
        let log_integral = tb * m0.ln() - (xlnx(m0) - xlnx(m)) / rate;
        (
            fuel0 - rate * tb,
            ve * (m0 / m).ln() * lift - g * tb,
            ve * lift * log_integral - 0.5 * g * tb * tb,
        )
    } else {
        let a = thrust / m0 * lift - g;
        (fuel0, a * tb, 0.5 * a * tb * tb)
    };

    let coast = t - tb;
    let v = v_burn - g * coast;
    let h = h_burn + v_burn * coast - 0.5 * g * coast * coast;
    let (altitude, velocity) = if h > 0.0 { (h, v) } else { (0.0, 0.0) };
    row([
        ("altitude", altitude),
        ("verticalVelocity", velocity),
        ("fuel", fuel.max(0.0)),
    ])
}

/// One ball dropped from rest at half the box height, no wall contact.
fn bouncing_balls(t: f64, p: &ParamValues) -> Values {
    let radius = p.positive("ballRadius", 0.05);
    let g = p.number("gravity");
    let e = crate::models::mechanics::restitution(p.number("restitution"));
    let drop = (p.number("boxSize") * 0.5).max(radius * 2.0);

    if g <= 0.0 {
        return row([("height", radius + drop)]);
    }
    let fall = (2.0 * drop / g).sqrt();
    if t < fall {
        return row([("height", radius + drop - 0.5 * g * t * t)]);
    }

    let mut tau = t - fall;
    let mut v = e * g * fall;
    for _ in 0..MAX_BOUNCES {
        let arc = 2.0 * v / g;
        if arc < 1e-6 {
            break;
        }
        if tau < arc {
            return row([("height", radius + v * tau - 0.5 * g * tau * tau)]);
        }
        tau -= arc;
        v *= e;
    }
    row([("height", radius)])
}

/// Circular-orbit approximation; ignores `velocityFactor`.
fn two_body(t: f64, p: &ParamValues) -> Values {
    let g = p.number("gravitationalConstant").max(0.0);
    let total = p.positive("mass1", 0.01) + p.positive("mass2", 0.01);
    let d = p.positive("distance", 0.1);
    let omega = (g * total / d.powi(3)).sqrt();
    row([
        ("separation", d),
        ("angle", wrapped_degrees(omega * t)),
        ("relativeSpeed", omega * d),
    ])
}

/// Keplerian disk rotation at a quarter and at the full disk radius.
fn n_body(t: f64, p: &ParamValues) -> Values {
    let gm = p.number("gravitationalConstant").max(0.0) * p.number("centralMass").max(0.0);
    let radius = p.positive("diskRadius", 1.0);
    let omega = |r: f64| (gm / r.powi(3)).sqrt();
    row([
        ("innerAngle", wrapped_degrees(omega(radius * 0.25) * t)),
        ("outerAngle", wrapped_degrees(omega(radius) * t)),
    ])
}

/// Exponential accretion of the particle disk.
fn black_hole(t: f64, p: &ParamValues) -> Values {
    let count = p.number("particleCount").round().max(0.0);
    let rate = p.number("accretionRate").max(0.0);
    let remaining = count * (-rate * t).exp();
    row([("remaining", remaining), ("absorbed", count - remaining)])
}

/// Cores approaching head-on at constant speed.
fn galaxy_collision(t: f64, p: &ParamValues) -> Values {
    let separation = p.number("separation").max(0.0);
    let speed = p.number("relativeVelocity");
    row([("separation", (separation - speed * t).abs())])
}

/// Stand-in: each arm swings as an independent small-angle pendulum.
fn double_pendulum(t: f64, p: &ParamValues) -> Values {
    let g = p.number("gravity").max(0.0);
    let l1 = p.positive("length1", 0.1);
    let l2 = p.positive("length2", 0.1);
    row([
        ("angle1", p.number("angle1") * ((g / l1).sqrt() * t).cos()),
        ("angle2", p.number("angle2") * ((g / l2).sqrt() * t).cos()),
    ])
}

/// Stand-in: exponential relaxation onto the equilibrium on the side of the
/// initial point.
fn lorenz(t: f64, p: &ParamValues) -> Values {
    let sigma = p.number("sigma").max(0.0);
    let rho = p.number("rho");
    let beta = p.number("beta").max(0.0);
    let start = p.vector("initialPoint");

    let (c, z_eq) = if rho > 1.0 {
        let c = (beta * (rho - 1.0)).sqrt();
        (if start.x < 0.0 { -c } else { c }, rho - 1.0)
    } else {
        (0.0, 0.0)
    };
    let fast = (-sigma * t).exp();
    let slow = (-beta * t).exp();
    row([
        ("x", c + (start.x - c) * fast),
        ("y", c + (start.y - c) * fast),
        ("z", z_eq + (start.z - z_eq) * slow),
    ])
}

fn solar_system(t: f64, p: &ParamValues) -> Values {
    let system: SolarSystem = analytic(t, p);
    PLANETS
        .iter()
        .take(system.planet_count())
        .enumerate()
        .map(|(i, planet)| (planet.name.to_lowercase(), wrapped_degrees(system.angle(i))))
        .collect()
}

fn dna_helix(t: f64, p: &ParamValues) -> Values {
    let helix: DnaHelix = analytic(t, p);
    let (a, _) = helix.pair(0);
    row([("rotation", wrapped_degrees(a.z.atan2(a.x)))])
}

fn wave_interference(t: f64, p: &ParamValues) -> Values {
    let waves: WaveInterference = analytic(t, p);
    row([
        ("midpoint", waves.height_at(0.0, 0.0)),
        ("probe", waves.height_at(1.0, 0.0)),
    ])
}

fn em_wave(t: f64, p: &ParamValues) -> Values {
    let wave: EmWave = analytic(t, p);
    let (e, b) = wave.field_at(0.0);
    row([("electric", e.y), ("magnetic", b.z)])
}

/// Stand-in: the mean height decays from the dropped block towards a layer
/// spread over the whole floor.
fn fluid(t: f64, p: &ParamValues) -> Values {
    let half = (p.number("containerSize") * 0.5).max(1.0);
    let block = half * 0.6;
    let start = 0.5 + block * 0.75;
    let rest = start * block / (2.0 * half);
    let rate = (p.number("viscosity").max(0.0) + p.number("wallDamping").max(0.0)).max(0.1);
    row([("meanHeight", rest + (start - rest) * (-rate * t).exp())])
}

/// Height of a vertically launched particle, re-emitted every cycle.
fn fountain(t: f64, p: &ParamValues) -> Values {
    let speed = p.number("initialSpeed").max(0.0);
    let g = p.number("gravity");
    let lifetime = p.positive("lifetime", 0.05);
    let cycle = if g > 0.0 { lifetime.min(2.0 * speed / g) } else { lifetime };
    let tau = if cycle > 0.0 { t.rem_euclid(cycle) } else { 0.0 };
    row([("height", (speed * tau - 0.5 * g * tau * tau).max(0.0))])
}

/// Stand-in: a debris particle at half the funnel radius, carried by the
/// swirl and lifted at the full updraft speed.
fn tornado(t: f64, p: &ParamValues) -> Values {
    let radius = p.positive("radius", 0.5);
    let height = p.positive("height", 1.0);
    let r = radius * 0.5;
    let swirl = p.number("rotationSpeed") * radius / (1.0 + r);
    let rise = p.number("updraftStrength").max(0.0) * t;
    row([
        ("angle", wrapped_degrees(swirl / r * t)),
        ("height", rise.rem_euclid(height)),
    ])
}

/// Unit-speed positive ion gyrating about B with the E×B drift added.
fn plasma(t: f64, p: &ParamValues) -> Values {
    let b = p.number("magneticField");
    let e = p.number("electricField");
    if b.abs() < 1e-9 {
        return row([("vx", 1.0 + e * t), ("vz", 0.0)]);
    }
    let (sin, cos) = (b * t).sin_cos();
    row([("vx", cos), ("vz", sin + e / b)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_oscillator_regimes_start_from_rest() {
        for gamma in [0.0, 0.5, 3.0, 10.0] {
            let (x, v) = damped_oscillator(2.0, 9.0, gamma, 0.0);
            assert!((x - 2.0).abs() < 1e-12, "gamma {gamma}");
            assert!(v.abs() < 1e-12, "gamma {gamma}");
        }
    }

    #[test]
    fn test_oscillator_velocity_is_derivative() {
        let h = 1e-6;
        for gamma in [0.2, 3.0, 7.0] {
            let t = 0.7;
            let (x1, _) = damped_oscillator(1.5, 9.0, gamma, t - h);
            let (x2, _) = damped_oscillator(1.5, 9.0, gamma, t + h);
            let (_, v) = damped_oscillator(1.5, 9.0, gamma, t);
            assert!(((x2 - x1) / (2.0 * h) - v).abs() < 1e-5, "gamma {gamma}");
        }
    }

    #[test]
    fn test_undamped_oscillator_period() {
        let omega = 10.0_f64.sqrt();
        let (x, v) = damped_oscillator(2.0, 10.0, 0.0, TAU / omega);
        assert!((x - 2.0).abs() < 1e-9);
        assert!(v.abs() < 1e-9);
    }

    #[test]
    fn test_unknown_id_has_no_formula() {
        assert!(evaluate("not-a-real-id", 0.0, &ParamValues::default()).is_none());
    }
}
