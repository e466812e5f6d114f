//! Build setting lookup with variable expansion.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::{
    entities::raw::{RawBuildConfiguration, RawTarget},
    value_objects::BuildConfiguration,
};

/// A setting value together with the configuration that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSetting {
    pub value: String,
    pub configuration: BuildConfiguration,
}

/// Looks up build settings across a target's configurations.
///
/// The default configuration is consulted first, then the others in
/// declaration order. `$(VAR)` and `${VAR}` references are expanded against
/// the declaring configuration plus a few built-in variables. Each setting
/// is expanded at most once per configuration; a reference back into its
/// own expansion is left verbatim.
#[derive(Debug)]
pub struct SettingsResolver<'a> {
    configurations: Vec<&'a RawBuildConfiguration>,
    builtins: Vec<(&'static str, String)>,
    /// Expanded values keyed by configuration index and setting name.
    expanded: RefCell<HashMap<(usize, String), String>>,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(target: &'a RawTarget, source_root: &Path) -> Self {
        let mut configurations: Vec<&RawBuildConfiguration> = target.configurations.iter().collect();
        if let Some(default) = &target.default_configuration {
            // Stable sort keeps declaration order among the rest.
            configurations.sort_by_key(|c| c.name != *default);
        }

        let root = source_root.display().to_string();
        let product_name = target
            .product_name
            .clone()
            .unwrap_or_else(|| target.name.clone());

        Self {
            configurations,
            builtins: vec![
                ("SRCROOT", root.clone()),
                ("PROJECT_DIR", root),
                ("TARGET_NAME", target.name.clone()),
                ("PRODUCT_NAME", product_name),
            ],
            expanded: RefCell::default(),
        }
    }

    /// First configuration declaring `key`, with its value expanded.
    pub fn lookup(&self, key: &str) -> Option<ResolvedSetting> {
        self.configurations
            .iter()
            .enumerate()
            .find_map(|(index, config)| {
                if !config.build_settings.contains_key(key) {
                    return None;
                }
                let value = self.resolve(index, key, &mut Expansion::default())?;
                Some(ResolvedSetting {
                    value,
                    configuration: BuildConfiguration::from_name(&config.name),
                })
            })
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|s| s.value)
    }

    /// Whether a boolean setting is `YES`.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.value(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("YES") || v == "1")
    }

    /// Expanded value of `name` in configuration `index`, falling back to
    /// the built-ins. `None` when neither defines it or `name` is already
    /// being expanded.
    fn resolve(&self, index: usize, name: &str, expansion: &mut Expansion) -> Option<String> {
        let key = (index, name.to_string());
        if let Some(cached) = self.expanded.borrow().get(&key) {
            return Some(cached.clone());
        }
        if expansion.active.iter().any(|active| active == name) {
            expansion.cyclic = true;
            return None;
        }

        let config = self.configurations.get(index)?;
        let raw = match config.build_settings.get(name) {
            Some(setting) => setting.as_string(),
            None => self
                .builtins
                .iter()
                .find(|(builtin, _)| *builtin == name)
                .map(|(_, v)| v.clone())?,
        };

        expansion.active.push(key.1.clone());
        let value = self.expand(&raw, index, expansion);
        expansion.active.pop();

        // A value cut short by a cycle depends on where expansion started.
        if !expansion.cyclic {
            self.expanded.borrow_mut().insert(key, value.clone());
        }
        Some(value)
    }

    fn expand(&self, value: &str, index: usize, expansion: &mut Expansion) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let close = match after.chars().next() {
                Some('(') => ')',
                Some('{') => '}',
                _ => {
                    out.push('$');
                    rest = after;
                    continue;
                }
            };
            let Some(end) = after.find(close) else {
                out.push_str(&rest[start..]);
                return out;
            };

            let reference = &after[1..end];
            match self.reference(reference, index, expansion) {
                Some(expanded) => out.push_str(&expanded),
                None => out.push_str(&rest[start..start + end + 2]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn reference(&self, reference: &str, index: usize, expansion: &mut Expansion) -> Option<String> {
        let mut parts = reference.split(':');
        let name = parts.next()?;
        let mut value = self.resolve(index, name, expansion)?;
        for modifier in parts {
            if modifier == "rfc1034identifier" {
                value = rfc1034_identifier(&value);
            }
        }
        Some(value)
    }
}

/// State of one top-level expansion.
#[derive(Default)]
struct Expansion {
    /// Names currently being expanded, outermost first.
    active: Vec<String>,
    /// Set once a reference back into `active` was left verbatim.
    cyclic: bool,
}

/// Replace every character outside `[A-Za-z0-9.-]` with `-`.
pub fn rfc1034_identifier(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
