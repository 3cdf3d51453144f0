pub mod classifier;
pub mod partition;
pub mod tables;

use serde::{Deserialize, Serialize};

use crate::types::Domain;

pub use classifier::Classifier;
pub use partition::{partition, Partitioned};

/// One row in a project type's ranked recommendation list. `name` is a
/// lowercase-comparable label matched against catalog item names; it is not
/// an id and does not need to equal any item name exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationEntry {
    pub name: String,
    pub reason: String,
    pub priority: u32,
}

impl RecommendationEntry {
    pub fn new(name: &str, reason: &str, priority: u32) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.to_string(),
            priority,
        }
    }
}

/// The classifier's output for one matched project type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecommendations {
    pub project_type: String,
    pub context_message: String,
    pub materials: Vec<RecommendationEntry>,
    pub crafts: Vec<RecommendationEntry>,
    pub techniques: Vec<RecommendationEntry>,
}

impl ProjectRecommendations {
    pub fn entries_for(&self, domain: Domain) -> &[RecommendationEntry] {
        match domain {
            Domain::Materials => &self.materials,
            Domain::Crafts => &self.crafts,
            Domain::Techniques => &self.techniques,
            Domain::Artisans => &[],
        }
    }
}

/// One project type: its detection keywords plus the recommendation bundle
/// returned when any keyword matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectProfile {
    pub keywords: Vec<String>,
    pub recommendations: ProjectRecommendations,
}

/// Immutable, declaration-ordered set of project profiles. Order is the
/// classification order: the first profile with a matching keyword wins.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    profiles: Vec<ProjectProfile>,
}

impl KeywordTable {
    pub fn new(profiles: Vec<ProjectProfile>) -> Self {
        Self { profiles }
    }

    pub fn builtin() -> Self {
        Self::new(tables::builtin_profiles())
    }

    pub fn profiles(&self) -> &[ProjectProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
