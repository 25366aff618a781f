// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use super::glob::{SEPARATOR, SearchPattern};
use super::PathProvider;
use crate::error::Result;

/// Provider over a fixed list of paths, for tests and dry runs
///
/// A directory-level pattern (one ending in `/`) is matched against the
/// parent directory of every listed path, so file paths stand in for the
/// directories that contain them.
#[derive(Debug, Clone, Default)]
pub struct ListProvider {
    paths: Vec<String>,
}

impl ListProvider {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parent directory of `path` with a trailing separator
fn parent_dir(path: &str) -> String {
    match path.rfind(SEPARATOR) {
        Some(at) => format!("{}{}", &path[..at], SEPARATOR),
        None => SEPARATOR.to_string(),
    }
}

impl PathProvider for ListProvider {
    fn find_matches(&self, pattern: &str) -> Result<Vec<String>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        let search = SearchPattern::parse(pattern);

        let candidates: Vec<String> = if pattern.ends_with(SEPARATOR) {
            let mut seen = HashSet::new();
            self.paths
                .iter()
                .map(|p| parent_dir(p))
                .filter(|dir| seen.insert(dir.clone()))
                .collect()
        } else {
            self.paths.clone()
        };

        Ok(candidates
            .into_iter()
            .filter(|candidate| search.matches(candidate))
            .collect())
    }
}
