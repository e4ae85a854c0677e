//! CLI command handlers.
//!
//! Each handler renders its output as a string; [`run_cli`] prints it and
//! maps errors to exit code 1.

use std::process::ExitCode;

use serde_json::json;
use validator::Validate;

use super::args::{Args, CatalogueFilter, Command, RunOptions};
use super::output::{format_catalogue, format_json, print_help, print_version};
use crate::config::PhysverseConfig;
use crate::engine::{FrameClock, SimulationEngine};
use crate::error::{SimError, SimResult};
use crate::registry::SimulationRegistry;
use crate::series::DataSeriesSampler;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let rendered = match args.command {
        Command::List { filter } => Ok(list(filter)),
        Command::Params { id } => params(&id),
        Command::Run(options) => run(&options),
        Command::Series(options) => series(&options),
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            print_version();
            return ExitCode::SUCCESS;
        }
    };

    match rendered {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Catalogue table.
#[must_use]
pub fn list(filter: CatalogueFilter) -> String {
    let registry = SimulationRegistry::default();
    match filter {
        CatalogueFilter::All => format_catalogue(registry.all()),
        CatalogueFilter::Free => format_catalogue(registry.free()),
        CatalogueFilter::Premium => format_catalogue(registry.premium()),
    }
}

/// Parameter schema of `id` as JSON.
///
/// # Errors
///
/// Returns [`SimError::UnknownSimulation`] for an unknown id.
pub fn params(id: &str) -> SimResult<String> {
    let registry = SimulationRegistry::default();
    let metadata = registry.metadata(id).ok_or_else(|| SimError::unknown(id))?;
    let schema = registry.schema(id).ok_or_else(|| SimError::unknown(id))?;
    Ok(format_json(&json!({
        "simulation": metadata,
        "parameters": schema,
    })))
}

/// Config field overridden by the step flag (`--dt` or `--interval`).
#[derive(Debug, Clone, Copy)]
enum StepField {
    FrameDt,
    Interval,
}

/// Load the config and fold the command-line overrides into it.
///
/// Overrides go through the same range rules as the file.
fn load_config(options: &RunOptions, step_field: StepField) -> SimResult<PhysverseConfig> {
    let mut config = match &options.config {
        Some(path) => PhysverseConfig::load(path)?,
        None => PhysverseConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if let Some(seconds) = options.seconds {
        config.run.duration = seconds;
    }
    if let Some(step) = options.step {
        match step_field {
            StepField::FrameDt => config.run.frame_dt = step,
            StepField::Interval => config.sampler.interval = step,
        }
    }
    config.validate()?;
    config.validate_semantic()?;
    Ok(config)
}

/// Check `--set` values against the schema of `options.id`.
///
/// Type mismatches are errors; out-of-range numbers are only reported.
fn check_params(registry: &SimulationRegistry, options: &RunOptions) -> SimResult<()> {
    let schema = registry
        .schema(&options.id)
        .ok_or_else(|| SimError::unknown(&options.id))?;
    schema.check_types(&options.params)?;
    for warning in schema.out_of_range(&options.params) {
        eprintln!("Warning: {warning}");
    }
    Ok(())
}

/// Run `options.id` headless and render its final snapshot.
///
/// # Errors
///
/// Returns error on a bad config, unknown id or mistyped parameter.
pub fn run(options: &RunOptions) -> SimResult<String> {
    let config = load_config(options, StepField::FrameDt)?;
    let registry = SimulationRegistry::with_defaults(config.model_options());
    check_params(&registry, options)?;

    let mut engine = SimulationEngine::headless();
    if !engine.load_by_id(&registry, &options.id, options.params.clone()) {
        return Err(SimError::unknown(&options.id));
    }

    let mut clock = FrameClock::new(config.run.frame_dt);
    let frames = clock.frames_for(config.run.duration);
    log::info!(
        "running '{}' for {frames} frames of {}s",
        options.id,
        clock.frame_dt()
    );

    engine.play();
    for _ in 0..frames {
        engine.update(clock.tick());
    }

    Ok(format_json(&json!({
        "simulation": options.id,
        "seed": config.seed,
        "frames": clock.frames(),
        "elapsedTime": engine.elapsed_time(),
        "markers": engine.scene().live_count(),
        "data": engine.export_data(),
    })))
}

/// Render closed-form chart rows of `options.id`.
///
/// # Errors
///
/// Returns error on a bad config, unknown id or mistyped parameter.
pub fn series(options: &RunOptions) -> SimResult<String> {
    let config = load_config(options, StepField::Interval)?;
    let registry = SimulationRegistry::with_defaults(config.model_options());
    check_params(&registry, options)?;

    let sampler = DataSeriesSampler::with_config(&registry, &config.sampler);
    let rows = sampler.series(
        &options.id,
        &options.params,
        config.run.duration,
        config.sampler.interval,
    );
    if rows.is_empty() {
        return Err(SimError::config("series interval must be positive"));
    }
    Ok(format_json(&serde_json::to_value(rows)?))
}
