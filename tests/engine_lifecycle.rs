//! Engine lifecycle across the whole catalogue.

use physverse::prelude::*;

const FRAME_DT: f64 = 1.0 / 60.0;

fn registry() -> SimulationRegistry {
    SimulationRegistry::with_defaults(ModelOptions::default())
}

fn largest_coordinate(engine: &SimulationEngine) -> f64 {
    engine
        .scene()
        .iter()
        .map(|(_, m)| m.position.length())
        .fold(0.0, f64::max)
}

#[test]
fn registry_signals_not_found() {
    let registry = registry();
    assert!(registry.create("not-a-real-id").is_none());
    let projectile = registry.create("projectile").expect("registered");
    assert_eq!(projectile.metadata().id, "projectile");
}

#[test]
fn update_with_nothing_loaded_is_safe() {
    let mut engine = SimulationEngine::headless();
    engine.play();
    for _ in 0..10 {
        engine.update(FRAME_DT);
    }
    engine.reset();
    engine.cleanup();
    assert!(!engine.is_loaded());
    assert_eq!(engine.elapsed_time(), 0.0);
}

#[test]
fn unknown_id_means_nothing_loaded() {
    let registry = registry();
    let mut engine = SimulationEngine::headless();
    assert!(engine.load_by_id(&registry, "pendulum", ParamMap::new()));
    assert!(!engine.load_by_id(&registry, "warp-drive", ParamMap::new()));
    assert!(!engine.is_loaded());
    assert_eq!(engine.scene().live_count(), 0);
    engine.play();
    engine.update(FRAME_DT);
}

#[test]
fn every_model_replays_identically_after_reset() {
    let registry = registry();
    for id in registry.ids() {
        let mut engine = SimulationEngine::headless();
        assert!(engine.load_by_id(&registry, id, ParamMap::new()));

        engine.play();
        for _ in 0..30 {
            engine.update(FRAME_DT);
        }
        let first = engine.export_data();

        engine.reset();
        engine.play();
        for _ in 0..30 {
            engine.update(FRAME_DT);
        }
        assert_eq!(engine.export_data(), first, "{id} did not replay");
    }
}

#[test]
fn huge_frames_stay_finite_and_bounded() {
    let registry = registry();
    for id in registry.ids() {
        let mut engine = SimulationEngine::headless();
        engine.load_by_id(&registry, id, ParamMap::new());
        let before = largest_coordinate(&engine);

        engine.play();
        for _ in 0..10 {
            engine.update(5.0);
        }
        assert!((engine.elapsed_time() - 50.0).abs() < 1e-9);

        let after = largest_coordinate(&engine);
        assert!(after.is_finite(), "{id} went non-finite");
        assert!(
            after <= 10.0 * before.max(10.0),
            "{id} jumped from {before} to {after}"
        );
    }
}

#[test]
fn analytic_models_follow_engine_time() {
    let registry = registry();
    for id in ["solar-system", "dna-helix", "wave-interference", "em-wave"] {
        let mut dropped = SimulationEngine::headless();
        let mut smooth = SimulationEngine::headless();
        dropped.load_by_id(&registry, id, ParamMap::new());
        smooth.load_by_id(&registry, id, ParamMap::new());
        dropped.play();
        smooth.play();

        dropped.update(5.0);
        for _ in 0..50 {
            smooth.update(0.1);
        }

        for engine in [&dropped, &smooth] {
            let model_time = engine.export_data()["time"].as_f64();
            assert_eq!(model_time, Some(engine.elapsed_time()), "{id} clock drifted");
        }
        assert_eq!(dropped.scene().live_count(), smooth.scene().live_count());
        for ((_, a), (_, b)) in dropped.scene().iter().zip(smooth.scene().iter()) {
            assert!(
                (a.position - b.position).length() < 1e-9,
                "{id}: {:?} vs {:?}",
                a.position,
                b.position
            );
        }
    }
}

#[test]
fn scene_resources_mirror_initialize_and_cleanup() {
    let registry = registry();
    for id in registry.ids() {
        let mut engine = SimulationEngine::headless();
        engine.load_by_id(&registry, id, ParamMap::new());
        let spawned = engine.scene().spawned_total();
        assert!(spawned > 0, "{id} drew nothing");

        engine.play();
        for _ in 0..20 {
            engine.update(FRAME_DT);
        }
        assert_eq!(engine.scene().spawned_total(), spawned, "{id} respawned markers");

        engine.cleanup();
        assert_eq!(engine.scene().live_count(), 0, "{id} leaked markers");
    }
}

#[test]
fn parameter_update_restarts_in_place() {
    let registry = registry();
    let mut engine = SimulationEngine::headless();
    engine.load_by_id(&registry, "bouncing-balls", ParamMap::new());
    assert_eq!(engine.scene().live_count(), 10);

    engine.play();
    engine.update(FRAME_DT);

    let mut params = ParamMap::new();
    params.insert("ballCount".into(), ParamValue::Number(25.0));
    engine.update_parameters(params);
    assert_eq!(engine.scene().live_count(), 25);
    assert_eq!(engine.elapsed_time(), 0.0);
    assert_eq!(engine.active_id(), Some("bouncing-balls"));
}

#[test]
fn seeds_change_stochastic_initial_conditions() {
    let a = SimulationRegistry::with_defaults(ModelOptions {
        seed: 1,
        ..ModelOptions::default()
    });
    let b = SimulationRegistry::with_defaults(ModelOptions {
        seed: 2,
        ..ModelOptions::default()
    });

    let snapshot = |registry: &SimulationRegistry| {
        let mut engine = SimulationEngine::headless();
        engine.load_by_id(registry, "n-body", ParamMap::new());
        engine.export_data()
    };
    assert_eq!(snapshot(&a), snapshot(&a));
    assert_ne!(snapshot(&a), snapshot(&b));
}
