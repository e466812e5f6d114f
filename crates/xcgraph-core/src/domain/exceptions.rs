//! Per-target exception overrides for synchronized groups.
//!
//! Exception sets are declared per synchronized root and scoped to one target.
//! [`ExceptionOverrides`] folds every set that applies to a target into a
//! single lookup keyed by path relative to the root.
//!
//! # Tie-breaks
//!
//! - A membership exception wins over every other override for that path.
//! - A path listed as both public and private is private.
//! - When several sets override the same path, the later set wins for
//!   compiler flags and attributes.
//!
//! In strict mode the last two cases are reported as
//! [`DomainError::ConflictingExceptions`] instead.
//!
//! Absolute keys can never match an entry below the root. They are skipped,
//! except in strict mode where they are [`DomainError::AbsolutePathNotAllowed`].

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    entities::{
        common::RelativePath,
        raw::{ExceptionSet, SynchronizedRootGroup},
    },
    error::DomainError,
    value_objects::{HeaderVisibility, LinkingStatus},
};

/// Everything the exception sets say about a single relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathOverride {
    pub visibility: Option<HeaderVisibility>,
    pub compiler_flags: Option<String>,
    pub attributes: Vec<String>,
}

impl PathOverride {
    /// Linking status implied by the attributes, if any were declared.
    pub fn linking_status(&self) -> Option<LinkingStatus> {
        if self.attributes.is_empty() {
            None
        } else {
            Some(LinkingStatus::from_attributes(&self.attributes))
        }
    }
}

/// Folded exception overrides for one target under one synchronized root.
#[derive(Debug, Clone, Default)]
pub struct ExceptionOverrides {
    excluded: BTreeSet<RelativePath>,
    overrides: BTreeMap<RelativePath, PathOverride>,
    /// Keys that can never name a member, such as absolute paths.
    unusable: Vec<String>,
}

impl ExceptionOverrides {
    /// Fold the exception sets of `group` that are scoped to `target`.
    ///
    /// Keys that are not relative are set aside (see [`Self::unusable_paths`]),
    /// or rejected in strict mode.
    pub fn for_target(
        group: &SynchronizedRootGroup,
        target: &str,
        strict: bool,
    ) -> Result<Self, DomainError> {
        let mut folded = Self::default();
        for set in group.exceptions.iter().filter(|s| s.target == target) {
            folded.apply(set, strict)?;
        }
        Ok(folded)
    }

    fn apply(&mut self, set: &ExceptionSet, strict: bool) -> Result<(), DomainError> {
        for path in &set.membership_exceptions {
            if let Some(key) = self.key(path, strict)? {
                self.excluded.insert(key);
            }
        }

        for path in &set.public_headers {
            let Some(entry) = self.entry(path, strict)? else {
                continue;
            };
            if entry.visibility == Some(HeaderVisibility::Private) {
                if strict {
                    return Err(conflict(path, "listed as both public and private header"));
                }
                continue;
            }
            entry.visibility = Some(HeaderVisibility::Public);
        }

        for path in &set.private_headers {
            let Some(entry) = self.entry(path, strict)? else {
                continue;
            };
            if strict && entry.visibility == Some(HeaderVisibility::Public) {
                return Err(conflict(path, "listed as both public and private header"));
            }
            entry.visibility = Some(HeaderVisibility::Private);
        }

        for (path, flags) in &set.additional_compiler_flags_by_relative_path {
            let Some(entry) = self.entry(path, strict)? else {
                continue;
            };
            if let Some(existing) = &entry.compiler_flags {
                if strict && existing != flags {
                    return Err(conflict(
                        path,
                        &format!("compiler flags '{existing}' and '{flags}'"),
                    ));
                }
            }
            entry.compiler_flags = Some(flags.clone());
        }

        for (path, attributes) in &set.attributes_by_relative_path {
            let Some(entry) = self.entry(path, strict)? else {
                continue;
            };
            if strict && !entry.attributes.is_empty() && &entry.attributes != attributes {
                return Err(conflict(path, "attribute lists differ"));
            }
            entry.attributes = attributes.clone();
        }

        Ok(())
    }

    fn key(&mut self, path: &str, strict: bool) -> Result<Option<RelativePath>, DomainError> {
        match RelativePath::try_new(path) {
            Ok(key) => Ok(Some(key)),
            Err(e) if strict => Err(e),
            Err(_) => {
                if !self.unusable.iter().any(|p| p == path) {
                    self.unusable.push(path.to_string());
                }
                Ok(None)
            }
        }
    }

    fn entry(&mut self, path: &str, strict: bool) -> Result<Option<&mut PathOverride>, DomainError> {
        let Some(key) = self.key(path, strict)? else {
            return Ok(None);
        };
        Ok(Some(self.overrides.entry(key).or_default()))
    }

    /// Whether `path` (or a folder containing it) is a membership exception.
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.excluded.iter().any(|excluded| path.is_within(excluded))
    }

    pub fn get(&self, path: &RelativePath) -> Option<&PathOverride> {
        self.overrides.get(path)
    }

    /// Every relative path mentioned by any override, exclusions included.
    pub fn mentioned_paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.excluded.iter().chain(self.overrides.keys())
    }

    /// Keys that were skipped because they cannot be relative to the root.
    pub fn unusable_paths(&self) -> impl Iterator<Item = &str> {
        self.unusable.iter().map(String::as_str)
    }
}

fn conflict(path: &str, reason: &str) -> DomainError {
    DomainError::ConflictingExceptions {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
