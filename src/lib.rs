//! # physverse
//!
//! Frame-driven physics simulation core.
//!
//! - A lifecycle [`engine::SimulationEngine`] hosting exactly one model
//!   (`load → (play/pause/update)* → reset? → cleanup`)
//! - Nineteen self-contained [`models`], each with its own integration rule
//!   (explicit Euler, softened N-body, sub-stepped coupled ODEs, fixed-step
//!   chaotic flows, analytic motion and particle clouds)
//! - A name-to-factory [`registry::SimulationRegistry`]
//! - A closed-form [`series::DataSeriesSampler`] for charting
//!
//! ## Example
//!
//! ```rust
//! use physverse::prelude::*;
//!
//! let registry = SimulationRegistry::with_defaults(ModelOptions::default());
//! let mut engine = SimulationEngine::headless();
//! assert!(engine.load_by_id(&registry, "projectile", ParamMap::new()));
//!
//! engine.play();
//! for _ in 0..60 {
//!     engine.update(1.0 / 60.0);
//! }
//! assert!(engine.state().elapsed_time > 0.9);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Formulas are written the way they read on paper
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,   // Pairwise i<j loops read better with indices
    clippy::many_single_char_names,
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod kinematics;
pub mod metadata;
pub mod models;
pub mod params;
pub mod persistence;
pub mod registry;
pub mod series;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PhysverseConfig, PhysverseConfigBuilder};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::{SimulationEngine, SimulationState};
    pub use crate::error::{SimError, SimResult};
    pub use crate::kinematics::{Trail, Vec2, Vec3};
    pub use crate::metadata::{Difficulty, SimulationMetadata};
    pub use crate::models::scene::{HeadlessScene, Marker, MarkerId, Scene};
    pub use crate::models::{Model, ModelOptions, Simulation};
    pub use crate::params::{ParamMap, ParamValue, ParamValues, ParameterSchema};
    pub use crate::persistence::SavedSimulation;
    pub use crate::registry::SimulationRegistry;
    pub use crate::series::{DataSeriesSampler, SeriesRow};
}

/// Re-export for public API
pub use error::{SimError, SimResult};
