use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::target::Target, resource_synthesizer::ResourceSynthesizer};

/// A target whose mapping failed without aborting the project pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFailure {
    pub target: String,
    pub reason: String,
}

/// Result of mapping every target of a raw project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub path: PathBuf,
    pub source_root: PathBuf,
    /// Mapped targets, in raw declaration order.
    pub targets: Vec<Target>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<TargetFailure>,
    pub resource_synthesizers: Vec<ResourceSynthesizer>,
}

impl ProjectGraph {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name() == name)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
