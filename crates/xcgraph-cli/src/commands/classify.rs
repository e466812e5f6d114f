//! Implementation of the `xcgraph classify` command.

use tracing::{debug, instrument};

use xcgraph_adapters::LocalDirectoryLister;
use xcgraph_core::application::FileClassifier;

use crate::{
    cli::ClassifyArgs,
    commands::{Members, classification_options},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Classify a directory as a synchronized group without exceptions.
#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: ClassifyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.dir.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", args.dir.display()),
            source: None,
        });
    }

    let root = std::path::absolute(&args.dir)
        .with_cli_context(|| format!("Failed to resolve '{}'", args.dir.display()))?;
    let target = args.target.clone().unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Target".into())
    });
    debug!(target = %target, root = %root.display(), "Classifying directory");

    let options = classification_options(config.classification, &args.classification);
    let classifier = FileClassifier::new(Box::new(LocalDirectoryLister::new()), options);
    let classification = classifier.classify_directory(&root, &target)?;

    if output.is_json() {
        output.json(&classification)?;
        return Ok(());
    }

    output.header(&format!("{} ({})", target, root.display()))?;
    Members {
        sources: &classification.sources,
        resources: &classification.resources,
        headers: Some(&classification.headers),
        dependencies: &classification.dependencies,
    }
    .print(&root, &output)?;
    output.success(&format!(
        "{} source(s), {} resource(s), {} header(s), {} dependency(ies)",
        classification.sources.len(),
        classification.resources.len(),
        classification.headers.len(),
        classification.dependencies.len()
    ))?;
    Ok(())
}
