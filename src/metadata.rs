//! Static simulation descriptors.

use serde::{Deserialize, Serialize};

/// Difficulty tier shown in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory mechanics.
    Beginner,
    /// Multi-body or nonlinear systems.
    Intermediate,
    /// Chaotic or many-particle systems.
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.write_str(label)
    }
}

/// Immutable descriptor of one simulation model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMetadata {
    /// Unique registry id (e.g. `"projectile"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-sentence description.
    pub description: String,
    /// Category tag (e.g. `"mechanics"`).
    pub category: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Free-form search tags.
    pub tags: Vec<String>,
    /// Whether the model is part of the premium catalogue.
    pub premium: bool,
}

impl SimulationMetadata {
    /// Build a descriptor; tags are deduplicated and sorted.
    #[must_use]
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        category: &str,
        difficulty: Difficulty,
        tags: &[&str],
        premium: bool,
    ) -> Self {
        let mut tags: Vec<String> = tags.iter().map(|t| (*t).to_string()).collect();
        tags.sort();
        tags.dedup();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            difficulty,
            tags,
            premium,
        }
    }

    /// Whether the descriptor carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }
}
