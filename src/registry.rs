//! Simulation registry: id → factory.
//!
//! An explicitly constructed composition root. Every `create` call returns a
//! fresh, independent model; nothing is cached. Metadata and schemas are
//! captured at registration so enumeration never instantiates a model.

use indexmap::IndexMap;

use crate::metadata::SimulationMetadata;
use crate::models::chaos::{DoublePendulum, LorenzAttractor};
use crate::models::gravity::{BlackHole, GalaxyCollision, NBody, TwoBodyOrbit};
use crate::models::kinematic::{DnaHelix, EmWave, SolarSystem, WaveInterference};
use crate::models::mechanics::{BouncingBalls, Pendulum, Projectile, Rocket, SpringMass};
use crate::models::particles::{Fluid, ParticleSystem, Plasma, Tornado};
use crate::models::{Hosted, Model, ModelOptions, Simulation};
use crate::params::ParameterSchema;

/// Builds a boxed simulation with the registry's options.
pub type Factory = fn(ModelOptions) -> Box<dyn Simulation>;

struct Entry {
    metadata: SimulationMetadata,
    schema: ParameterSchema,
    factory: Factory,
}

/// Lookup table of available simulations.
pub struct SimulationRegistry {
    options: ModelOptions,
    entries: IndexMap<String, Entry>,
}

impl SimulationRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new(options: ModelOptions) -> Self {
        Self {
            options,
            entries: IndexMap::new(),
        }
    }

    /// Registry holding the full built-in catalogue.
    #[must_use]
    pub fn with_defaults(options: ModelOptions) -> Self {
        let mut registry = Self::new(options);
        registry.register::<Projectile>();
        registry.register::<SpringMass>();
        registry.register::<Pendulum>();
        registry.register::<Rocket>();
        registry.register::<BouncingBalls>();
        registry.register::<TwoBodyOrbit>();
        registry.register::<NBody>();
        registry.register::<BlackHole>();
        registry.register::<GalaxyCollision>();
        registry.register::<DoublePendulum>();
        registry.register::<LorenzAttractor>();
        registry.register::<SolarSystem>();
        registry.register::<DnaHelix>();
        registry.register::<WaveInterference>();
        registry.register::<EmWave>();
        registry.register::<Fluid>();
        registry.register::<ParticleSystem>();
        registry.register::<Tornado>();
        registry.register::<Plasma>();
        registry
    }

    /// Register model `M` under its metadata id, replacing any previous entry.
    pub fn register<M: Model>(&mut self) {
        self.register_factory(M::metadata(), M::parameters(), Hosted::<M>::boxed);
    }

    /// Register an arbitrary factory.
    pub fn register_factory(
        &mut self,
        metadata: SimulationMetadata,
        schema: ParameterSchema,
        factory: Factory,
    ) {
        let id = metadata.id.clone();
        if self
            .entries
            .insert(
                id.clone(),
                Entry {
                    metadata,
                    schema,
                    factory,
                },
            )
            .is_some()
        {
            log::warn!("simulation '{id}' registered twice; keeping the latest");
        }
    }

    /// Fresh instance of `id`, or `None` if unknown.
    #[must_use]
    pub fn create(&self, id: &str) -> Option<Box<dyn Simulation>> {
        self.entries.get(id).map(|e| (e.factory)(self.options))
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Metadata of `id`.
    #[must_use]
    pub fn metadata(&self, id: &str) -> Option<&SimulationMetadata> {
        self.entries.get(id).map(|e| &e.metadata)
    }

    /// Parameter schema of `id`.
    #[must_use]
    pub fn schema(&self, id: &str) -> Option<&ParameterSchema> {
        self.entries.get(id).map(|e| &e.schema)
    }

    /// All metadata in registration order.
    pub fn all(&self) -> impl Iterator<Item = &SimulationMetadata> {
        self.entries.values().map(|e| &e.metadata)
    }

    /// Metadata of the free catalogue.
    pub fn free(&self) -> impl Iterator<Item = &SimulationMetadata> {
        self.all().filter(|m| !m.premium)
    }

    /// Metadata of the premium catalogue.
    pub fn premium(&self) -> impl Iterator<Item = &SimulationMetadata> {
        self.all().filter(|m| m.premium)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered simulations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options passed to every factory.
    #[must_use]
    pub const fn options(&self) -> ModelOptions {
        self.options
    }
}

impl Default for SimulationRegistry {
    fn default() -> Self {
        Self::with_defaults(ModelOptions::default())
    }
}

impl std::fmt::Debug for SimulationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRegistry")
            .field("options", &self.options)
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
