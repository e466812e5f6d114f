//! Project Mapper - maps every target of a raw project.
//!
//! Targets are independent, so they are mapped in parallel with `rayon`
//! unless disabled. A failing target is recorded and skipped. The pass is
//! aborted only by the structural "project objects released" error or when
//! two mapped targets share a name.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, handle::ProjectHandle, services::target_mapper::TargetMapper},
    domain::{DomainValidator, ProjectGraph, RawProject, ResourceSynthesizer, Target, TargetFailure},
    error::{XcGraphError, XcGraphResult},
};

pub struct ProjectMapper {
    mapper: TargetMapper,
    parallel: bool,
}

impl ProjectMapper {
    pub fn new(mapper: TargetMapper) -> Self {
        Self {
            mapper,
            parallel: true,
        }
    }

    /// Map targets one after another instead of on the rayon pool.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn map(&self, project: &Arc<RawProject>) -> XcGraphResult<ProjectGraph> {
        self.map_handle(&ProjectHandle::new(project))
    }

    #[instrument(skip_all, fields(parallel = self.parallel))]
    pub fn map_handle(&self, handle: &ProjectHandle) -> XcGraphResult<ProjectGraph> {
        let project = handle.upgrade()?;
        info!(
            project = %project.path.display(),
            targets = project.targets.len(),
            "Mapping project"
        );

        let results: Vec<_> = if self.parallel {
            project
                .targets
                .par_iter()
                .map(|target| self.mapper.map(target, handle))
                .collect()
        } else {
            project
                .targets
                .iter()
                .map(|target| self.mapper.map(target, handle))
                .collect()
        };

        let mut targets = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (raw, result) in project.targets.iter().zip(results) {
            match result {
                Ok(Some(target)) => targets.push(target),
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(XcGraphError::Application(ApplicationError::TargetMappingFailed {
                    target,
                    reason,
                })) => {
                    warn!(name = %target, error = %reason, "Target mapping failed");
                    failures.push(TargetFailure { target, reason });
                }
                Err(e) => {
                    warn!(name = %raw.name, error = %e, "Target mapping failed");
                    failures.push(TargetFailure {
                        target: raw.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let resource_synthesizers = claimed_synthesizers(&targets);
        info!(
            mapped = targets.len(),
            failed = failures.len(),
            "Project mapped"
        );

        let graph = ProjectGraph {
            path: project.path.clone(),
            source_root: project.source_root.clone(),
            targets,
            failures,
            resource_synthesizers,
        };
        DomainValidator::validate_graph(&graph)?;
        Ok(graph)
    }
}

/// Built-in synthesizers that claim at least one mapped resource.
fn claimed_synthesizers(targets: &[Target]) -> Vec<ResourceSynthesizer> {
    ResourceSynthesizer::defaults()
        .into_iter()
        .filter(|synthesizer| {
            targets
                .iter()
                .flat_map(|t| t.resources())
                .any(|r| synthesizer.claims(r))
        })
        .collect()
}
