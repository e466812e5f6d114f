//! Implementation of the `xcgraph map` command.
//!
//! Responsibility: load the raw project, wire the mapper with the on-disk
//! lister, and display the graph. No classification logic lives here.

use std::sync::Arc;

use tracing::{info, instrument};

use xcgraph_adapters::{LocalDirectoryLister, RawProjectLoader};
use xcgraph_core::{
    application::{FileClassifier, ProjectMapper, TargetMapper},
    domain::{ProjectGraph, Target},
};

use crate::{
    cli::MapArgs,
    commands::{Members, classification_options},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `xcgraph map` command.
///
/// Per-target failures are printed with the graph and turn the exit status
/// into a failure once everything else has been shown.
#[instrument(skip_all, fields(project = %args.project.display()))]
pub fn execute(args: MapArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let raw = RawProjectLoader::new().load(&args.project)?;

    for name in &args.targets {
        if raw.target(name).is_none() {
            return Err(CliError::TargetNotFound {
                name: name.clone(),
                project: args.project.clone(),
            });
        }
    }

    let options = classification_options(config.classification, &args.classification);
    let parallel = config.mapping.parallel && !args.sequential;
    let classifier = FileClassifier::new(Box::new(LocalDirectoryLister::new()), options);
    let mapper = ProjectMapper::new(TargetMapper::new(classifier)).with_parallelism(parallel);

    let mut graph = mapper.map(&Arc::new(raw))?;
    if !args.targets.is_empty() {
        graph.targets.retain(|t| args.targets.iter().any(|n| n == t.name()));
        graph
            .failures
            .retain(|f| args.targets.iter().any(|n| *n == f.target));
    }

    info!(
        targets = graph.targets.len(),
        failures = graph.failures.len(),
        "Graph ready"
    );

    if output.is_json() {
        output.json(&graph)?;
    } else {
        print_graph(&graph, &output)?;
    }

    if graph.is_complete() {
        Ok(())
    } else {
        Err(CliError::PartialMapping {
            count: graph.failures.len(),
        })
    }
}

fn print_graph(graph: &ProjectGraph, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Project {}", graph.path.display()))?;

    for target in &graph.targets {
        print_target(target, graph, output)?;
    }

    if !graph.resource_synthesizers.is_empty() {
        output.print("")?;
        let parsers: Vec<String> = graph
            .resource_synthesizers
            .iter()
            .map(|s| s.parser.to_string())
            .collect();
        output.info(&format!("Resource synthesizers: {}", parsers.join(", ")))?;
    }

    for failure in &graph.failures {
        output.error(&format!("{}: {}", failure.target, failure.reason))?;
    }

    if graph.is_complete() {
        output.success(&format!("Mapped {} target(s)", graph.targets.len()))?;
    } else {
        output.warning(&format!(
            "Mapped {} target(s), {} failed",
            graph.targets.len(),
            graph.failures.len()
        ))?;
    }
    Ok(())
}

fn print_target(target: &Target, graph: &ProjectGraph, output: &OutputManager) -> CliResult<()> {
    output.print("")?;
    output.header(&target.to_string())?;
    output.item("product name", target.product_name())?;

    if let Some(plist) = target.info_plist() {
        let shown = plist
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "generated".into());
        output.item(
            "info plist",
            &format!("{shown} ({})", plist.configuration()),
        )?;
    }
    if let Some(entitlements) = target.entitlements() {
        output.item(
            "entitlements",
            &format!(
                "{} ({})",
                entitlements.path().display(),
                entitlements.configuration()
            ),
        )?;
    }

    Members {
        sources: target.sources(),
        resources: target.resources(),
        headers: target.headers(),
        dependencies: target.dependencies(),
    }
    .print(&graph.source_root, output)?;
    Ok(())
}
