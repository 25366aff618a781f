// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use diagnostics::*;

use super::glob::{SEPARATOR, SearchPattern, WildcardComponent};
use super::PathProvider;
use crate::error::Result;

/// Provider backed by the host filesystem
///
/// Absolute patterns are walked from `/`, relative ones from the base
/// directory (the process working directory unless set). Matches are
/// spelled the way the pattern is: relative patterns yield relative paths.
/// Wildcards skip hidden entries unless the component itself starts with a
/// dot.
#[derive(Debug, Clone, Default)]
pub struct HostProvider {
    base_dir: Option<PathBuf>,
}

impl HostProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative patterns against `base_dir`
    #[must_use]
    pub fn with_base_dir<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl PathProvider for HostProvider {
    fn find_matches(&self, pattern: &str) -> Result<Vec<String>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        let search = SearchPattern::parse(pattern);
        let mut components = search.components();
        let dirs_only = pattern.len() > 1 && pattern.ends_with(SEPARATOR);

        let (root, prefix) = if pattern.starts_with(SEPARATOR) {
            components = &components[1..];
            (PathBuf::from(SEPARATOR.to_string()), SEPARATOR.to_string())
        } else {
            let base = self.base_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            (base, String::new())
        };
        if dirs_only && let Some((_, rest)) = components.split_last() {
            components = rest;
        }

        let mut results = Vec::new();
        visit_host(&root, &prefix, components, dirs_only, &mut results)?;

        debug!(
            "Host glob {pattern} matched {count} path(s)",
            pattern: pattern,
            count: results.len()
        );
        Ok(results)
    }
}

/// Recursively walk `dir` matching the remaining pattern components
fn visit_host(
    dir: &Path,
    shown: &str,
    pattern: &[WildcardComponent],
    dirs_only: bool,
    results: &mut Vec<String>,
) -> Result<()> {
    let Some((head, tail)) = pattern.split_first() else {
        return Ok(());
    };
    let is_last = tail.is_empty();

    let names = match head {
        // "a//b": an empty component stays in the same directory
        WildcardComponent::Normal(name) if name.is_empty() && !is_last => {
            return visit_host(dir, &format!("{}{}", shown, SEPARATOR), tail, dirs_only, results);
        }
        WildcardComponent::Normal(name) => {
            if dir.join(name).exists() {
                vec![name.clone()]
            } else {
                vec![]
            }
        }
        WildcardComponent::Wildcard { .. } => read_host_dir(dir)?
            .into_iter()
            .filter(|name| head.matches_hidden() || !name.starts_with('.'))
            .filter(|name| head.matches(name))
            .collect(),
    };

    for name in names {
        let child = dir.join(&name);
        let child_shown = format!("{}{}", shown, name);

        if is_last {
            if !dirs_only {
                results.push(child_shown);
            } else if child.is_dir() {
                results.push(format!("{}{}", child_shown, SEPARATOR));
            }
        } else if child.is_dir() {
            visit_host(
                &child,
                &format!("{}{}", child_shown, SEPARATOR),
                tail,
                dirs_only,
                results,
            )?;
        }
    }

    Ok(())
}

/// Read directory entry names; unreadable directories contribute nothing
fn read_host_dir(path: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            let reason = e.to_string();
            debug!(
                "Skipping unreadable directory {path}: {reason}",
                path: path.display().to_string(),
                reason: reason
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
