//! CLI module tests.

use std::io::Write;
use std::path::PathBuf;

use super::args::{Args, CatalogueFilter, Command, RunOptions};
use super::commands::{list, params, run, series};
use super::output::{format_catalogue, format_json, version_string};
use crate::error::SimError;
use crate::params::ParamValue;
use crate::registry::SimulationRegistry;

fn options(id: &str) -> RunOptions {
    RunOptions {
        id: id.to_string(),
        ..RunOptions::default()
    }
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["physverse"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_and_version_aliases() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["physverse", flag]).command, Command::Help);
    }
    for flag in ["-V", "--version", "version"] {
        assert_eq!(Args::parse_from(["physverse", flag]).command, Command::Version);
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["physverse", "unknown-cmd"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_list_filters() {
    let cases = [
        (vec!["physverse", "list"], CatalogueFilter::All),
        (vec!["physverse", "list", "--free"], CatalogueFilter::Free),
        (vec!["physverse", "list", "--premium"], CatalogueFilter::Premium),
    ];
    for (argv, filter) in cases {
        assert_eq!(Args::parse_from(argv).command, Command::List { filter });
    }
}

#[test]
fn test_parse_params_requires_id() {
    assert_eq!(
        Args::parse_from(["physverse", "params", "pendulum"]).command,
        Command::Params {
            id: "pendulum".to_string()
        }
    );
    assert_eq!(Args::parse_from(["physverse", "params"]).command, Command::Help);
}

#[test]
fn test_parse_run_command() {
    let args = Args::parse_from([
        "physverse",
        "run",
        "projectile",
        "--seconds",
        "3",
        "--dt",
        "0.01",
        "--set",
        "angle=30",
        "--set",
        "initialPoint=1,2,3",
        "--seed",
        "7",
        "--config",
        "physverse.yaml",
    ]);
    let Command::Run(opts) = args.command else {
        panic!("Expected Run command");
    };
    assert_eq!(opts.id, "projectile");
    assert_eq!(opts.seconds, Some(3.0));
    assert_eq!(opts.step, Some(0.01));
    assert_eq!(opts.seed, Some(7));
    assert_eq!(opts.config, Some(PathBuf::from("physverse.yaml")));
    assert_eq!(opts.params["angle"], ParamValue::Number(30.0));
    assert!(matches!(opts.params["initialPoint"], ParamValue::Vector(_)));
}

#[test]
fn test_parse_run_requires_id() {
    assert_eq!(Args::parse_from(["physverse", "run"]).command, Command::Help);
}

#[test]
fn test_parse_run_skips_bad_values() {
    let args = Args::parse_from([
        "physverse",
        "run",
        "pendulum",
        "--seconds",
        "soon",
        "--set",
        "noequals",
        "--bogus",
        "--dt",
    ]);
    let Command::Run(opts) = args.command else {
        panic!("Expected Run command");
    };
    assert_eq!(opts.seconds, None);
    assert_eq!(opts.step, None);
    assert!(opts.params.is_empty());
}

#[test]
fn test_parse_series_uses_interval_flag() {
    let args = Args::parse_from([
        "physverse",
        "series",
        "spring-mass",
        "--interval",
        "0.25",
        "--dt",
        "0.5",
    ]);
    let Command::Series(opts) = args.command else {
        panic!("Expected Series command");
    };
    assert_eq!(opts.step, Some(0.25));
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_version_string() {
    assert!(version_string().starts_with("physverse "));
    assert!(version_string().contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_catalogue_table() {
    let registry = SimulationRegistry::default();
    let table = format_catalogue(registry.all());
    assert!(table.starts_with("ID"));
    assert!(table.contains("projectile"));
    assert!(table.contains("galaxy-collision"));
    assert!(table.contains("19 simulation(s)"));
}

#[test]
fn test_empty_catalogue_table() {
    let table = format_catalogue(std::iter::empty());
    assert!(table.contains("0 simulation(s)"));
}

#[test]
fn test_format_json_is_pretty() {
    let text = format_json(&serde_json::json!({"a": 1}));
    assert!(text.contains('\n'));
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_list_filters() {
    let free = list(CatalogueFilter::Free);
    let premium = list(CatalogueFilter::Premium);
    assert!(free.contains("projectile"));
    assert!(!free.contains("lorenz-attractor"));
    assert!(premium.contains("lorenz-attractor"));
    assert!(!premium.contains("spring-mass"));
}

#[test]
fn test_params_command() {
    let text = params("spring-mass").expect("known id");
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["simulation"]["id"], "spring-mass");
    assert_eq!(json["parameters"]["springConstant"]["type"], "number");
    assert_eq!(json["parameters"]["springConstant"]["default"], 10.0);

    assert!(params("not-a-real-id").is_err_and(|e| e.is_not_found()));
}

#[test]
fn test_run_command_reports_final_state() {
    let mut opts = options("spring-mass");
    opts.seconds = Some(1.0);
    opts.step = Some(0.1);
    let text = run(&opts).expect("run succeeds");
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["simulation"], "spring-mass");
    assert_eq!(json["frames"], 10);
    assert!((json["elapsedTime"].as_f64().unwrap_or_default() - 1.0).abs() < 1e-9);
    assert!(json["data"]["position"].is_number());
}

#[test]
fn test_run_unknown_id_fails() {
    assert!(run(&options("not-a-real-id")).is_err_and(|e| e.is_not_found()));
}

#[test]
fn test_run_rejects_mistyped_parameter() {
    let mut opts = options("projectile");
    opts.params.insert("angle".into(), ParamValue::Boolean(true));
    assert!(matches!(run(&opts), Err(SimError::ParameterType { .. })));
}

#[test]
fn test_run_with_seed_is_reproducible() {
    let mut opts = options("n-body");
    opts.seconds = Some(0.5);
    opts.seed = Some(9);
    let a = run(&opts).expect("run succeeds");
    let b = run(&opts).expect("run succeeds");
    assert_eq!(a, b);

    opts.seed = Some(10);
    assert_ne!(run(&opts).expect("run succeeds"), a);
}

#[test]
fn test_run_with_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "seed: 5\nrun:\n  frame_dt: 0.05\n  duration: 0.5").expect("write");

    let mut opts = options("pendulum");
    opts.config = Some(file.path().to_path_buf());
    let json: serde_json::Value =
        serde_json::from_str(&run(&opts).expect("run succeeds")).expect("valid json");
    assert_eq!(json["seed"], 5);
    assert_eq!(json["frames"], 10);
}

#[test]
fn test_run_with_bad_config_fails() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "run:\n  frame_dt: -1").expect("write");

    let mut opts = options("pendulum");
    opts.config = Some(file.path().to_path_buf());
    assert!(run(&opts).is_err());
}

#[test]
fn test_run_with_select_and_toggle() {
    let args = Args::parse_from([
        "physverse",
        "run",
        "galaxy-collision",
        "--seconds",
        "0.1",
        "--set",
        "encounter=head-on",
        "--set",
        "counterRotating=false",
    ]);
    let Command::Run(opts) = args.command else {
        panic!("Expected Run command");
    };
    assert_eq!(opts.params["encounter"], ParamValue::Text("head-on".into()));
    assert_eq!(opts.params["counterRotating"], ParamValue::Boolean(false));
    let json: serde_json::Value =
        serde_json::from_str(&run(&opts).expect("run succeeds")).expect("valid json");
    assert_eq!(json["markers"], 202);
}

#[test]
fn test_run_overrides_respect_config_bounds() {
    let mut opts = options("pendulum");
    opts.seconds = Some(1e15);
    assert!(matches!(run(&opts), Err(SimError::Validation(_))));

    let mut opts = options("pendulum");
    opts.step = Some(-0.5);
    assert!(run(&opts).is_err());

    let mut opts = options("pendulum");
    opts.seconds = Some(0.5);
    opts.step = Some(2.0);
    assert!(run(&opts).is_err());
}

#[test]
fn test_series_interval_override_is_validated() {
    let mut opts = options("pendulum");
    opts.step = Some(0.0);
    assert!(series(&opts).is_err());

    opts.step = Some(120.0);
    assert!(matches!(series(&opts), Err(SimError::Validation(_))));
}

#[test]
fn test_series_command_rows() {
    let mut opts = options("pendulum");
    opts.seconds = Some(1.0);
    opts.step = Some(0.25);
    let json: serde_json::Value =
        serde_json::from_str(&series(&opts).expect("series succeeds")).expect("valid json");
    let rows = json.as_array().expect("array of rows");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["time"], 0.0);
    assert!(rows[0]["angle"].is_number());
}

#[test]
fn test_series_unknown_id_fails() {
    assert!(series(&options("not-a-real-id")).is_err_and(|e| e.is_not_found()));
}
