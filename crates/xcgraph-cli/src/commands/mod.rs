//! Command handlers, one module per subcommand.

pub mod classify;
pub mod completions;
pub mod config;
pub mod init;
pub mod map;

use std::path::{Path, PathBuf};

use xcgraph_core::{
    application::ClassificationOptions,
    domain::{Headers, SourceFile, TargetDependency},
};

use crate::{cli::ClassificationArgs, output::OutputManager};

/// Config options with the command-line overrides applied.
pub(crate) fn classification_options(
    base: ClassificationOptions,
    args: &ClassificationArgs,
) -> ClassificationOptions {
    ClassificationOptions {
        unlisted_headers: args
            .unlisted_headers
            .map(Into::into)
            .unwrap_or(base.unlisted_headers),
        strict_exceptions: base.strict_exceptions || args.strict,
    }
}

/// Membership lists of one target, printed relative to `root`.
pub(crate) struct Members<'a> {
    pub sources: &'a [SourceFile],
    pub resources: &'a [PathBuf],
    pub headers: Option<&'a Headers>,
    pub dependencies: &'a [TargetDependency],
}

impl Members<'_> {
    pub(crate) fn print(&self, root: &Path, output: &OutputManager) -> std::io::Result<()> {
        let show = |path: &Path| {
            path.strip_prefix(root)
                .unwrap_or(path)
                .display()
                .to_string()
        };

        for source in self.sources {
            let mut line = show(source.path.as_path());
            if let Some(flags) = &source.compiler_flags {
                line.push_str(&format!(" [{flags}]"));
            }
            output.item("source", &line)?;
        }
        for resource in self.resources {
            output.item("resource", &show(resource.as_path()))?;
        }
        if let Some(headers) = self.headers {
            for (visibility, path) in headers.iter() {
                output.item(&format!("{visibility} header"), &show(path))?;
            }
        }
        for dependency in self.dependencies {
            output.item("dependency", &dependency.to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::HeaderPolicy;
    use xcgraph_core::domain::UnlistedHeaders;

    #[test]
    fn flags_override_config() {
        let base = ClassificationOptions::default();
        let args = ClassificationArgs {
            unlisted_headers: Some(HeaderPolicy::Project),
            strict: true,
        };
        let options = classification_options(base, &args);
        assert_eq!(options.unlisted_headers, UnlistedHeaders::Project);
        assert!(options.strict_exceptions);
    }

    #[test]
    fn absent_flags_keep_config() {
        let base = ClassificationOptions {
            unlisted_headers: UnlistedHeaders::Project,
            strict_exceptions: true,
        };
        let args = ClassificationArgs {
            unlisted_headers: None,
            strict: false,
        };
        assert_eq!(classification_options(base, &args), base);
    }
}
