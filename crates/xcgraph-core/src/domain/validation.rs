use crate::domain::{entities::ProjectGraph, error::DomainError};

/// Checks that span a whole graph.
///
/// Per-target invariants are checked by [`Target::validate`] whenever a
/// target is built.
///
/// [`Target::validate`]: crate::domain::Target::validate
pub struct DomainValidator;

impl DomainValidator {
    /// No two mapped targets share a name.
    pub fn validate_graph(graph: &ProjectGraph) -> Result<(), DomainError> {
        let mut names = std::collections::BTreeSet::new();
        for target in &graph.targets {
            if !names.insert(target.name()) {
                return Err(DomainError::DuplicateTargetName {
                    name: target.name().to_string(),
                });
            }
        }
        Ok(())
    }
}
