// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Discovery: expand a query, collect paths, parse them into a table
//!
//! A discovery call runs its stages strictly in sequence. Every concrete
//! pattern is produced before the provider is consulted, the provider is
//! called once per pattern in expansion order, and the concatenated
//! results are parsed and assembled into a fresh table whose metadata must
//! be unique.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use diagnostics::*;

use crate::error::{Error, Result};
use crate::parser::parse_paths;
use crate::policy::{OnEmpty, OnParseError};
use crate::provider::{HostProvider, PathProvider};
use crate::query::{Query, expand};
use crate::sort::natural_sort;
use crate::table::FileTable;
use crate::template::CompiledTemplate;

/// Policies applied while discovering paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindOptions {
    #[serde(default)]
    pub on_parse_error: OnParseError,
    #[serde(default)]
    pub on_empty: OnEmpty,
}

impl FindOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_parse_error(mut self, policy: OnParseError) -> Self {
        self.on_parse_error = policy;
        self
    }

    #[must_use]
    pub fn on_empty(mut self, policy: OnEmpty) -> Self {
        self.on_empty = policy;
        self
    }
}

/// A compiled template bound to a path provider
///
/// The template is immutable and shared; one finder may serve any number of
/// discovery calls.
#[derive(Clone)]
pub struct Finder {
    template: Arc<CompiledTemplate>,
    suffix: String,
    provider: Arc<dyn PathProvider>,
}

impl Finder {
    /// Finder over the host filesystem
    pub fn new<S: Into<String>>(pattern: S) -> Result<Self> {
        Ok(Self::from_template(CompiledTemplate::compile(pattern)?))
    }

    #[must_use]
    pub fn from_template(template: CompiledTemplate) -> Self {
        Self {
            template: Arc::new(template),
            suffix: String::new(),
            provider: Arc::new(HostProvider::new()),
        }
    }

    /// Append `suffix` to the path of every discovered row
    #[must_use]
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn PathProvider>) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn template(&self) -> &CompiledTemplate {
        &self.template
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Discover every path matching `query`
    pub fn find(&self, query: &Query, options: FindOptions) -> Result<FileTable> {
        let pattern = self.template.pattern();

        let patterns = expand(&self.template, query)?;
        debug!(
            "Expanded {pattern} into {count} search pattern(s)",
            pattern: pattern,
            count: patterns.len()
        );

        let paths = self.collect(&patterns)?;

        if paths.is_empty() {
            let err = Error::EmptyResult { patterns };
            match options.on_empty {
                OnEmpty::Raise => return Err(err),
                OnEmpty::Warn => {
                    let message = err.to_string();
                    warn!("{message}", message: message);
                }
                OnEmpty::Allow => {
                    debug!("No paths found for {pattern}", pattern: pattern);
                }
            }
            return Ok(FileTable::new(self.template.fields().to_vec()));
        }

        let rows = parse_paths(&self.template, &paths, &self.suffix, options.on_parse_error)?;
        debug!(
            "Parsed {rows} of {paths} path(s)",
            rows: rows.len(),
            paths: paths.len()
        );

        let table = FileTable::from_rows(self.template.fields().to_vec(), rows)?;
        table.ensure_unique()?;

        info!(
            "Found {count} path(s) for {pattern}",
            count: table.len(),
            pattern: pattern
        );
        Ok(table)
    }

    /// Query the provider once per pattern, naturally sorting each result
    fn collect(&self, patterns: &[String]) -> Result<Vec<String>> {
        let mut all_paths = Vec::new();
        for search in patterns {
            let mut paths = self.provider.find_matches(search)?;
            natural_sort(&mut paths);
            debug!(
                "Collected {count} path(s) for {search}",
                count: paths.len(),
                search: search
            );
            all_paths.extend(paths);
        }
        Ok(all_paths)
    }
}

impl fmt::Debug for Finder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finder")
            .field("pattern", &self.template.pattern())
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::field_map;
    use crate::provider::ListProvider;

    fn finder(pattern: &str, paths: &[&str]) -> Finder {
        Finder::new(pattern)
            .unwrap()
            .with_provider(Arc::new(ListProvider::new(paths.iter().copied())))
    }

    #[test]
    fn test_end_to_end() {
        let finder = finder("{a}/{b}", &["x/foo", "y/foo", "y/bar"]);
        let query = Query::new().with("b", "foo");
        assert_eq!(expand(finder.template(), &query).unwrap(), vec!["*/foo"]);

        let table = finder.find(&query, FindOptions::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.meta(),
            vec![
                field_map([("a", "x"), ("b", "foo")]),
                field_map([("a", "y"), ("b", "foo")]),
            ]
        );
    }

    #[test]
    fn test_results_sorted_per_pattern() {
        let finder = finder("{a}/{b}", &["a10/foo", "a2/bar", "a1/foo", "a2/foo"]);
        let query = Query::new().with("b", ["foo", "bar"]);
        let table = finder.find(&query, FindOptions::default()).unwrap();
        assert_eq!(table.paths(), vec!["a1/foo", "a2/foo", "a10/foo", "a2/bar"]);
    }

    #[test]
    fn test_duplicate_metadata() {
        // overlapping candidates collect the same path twice
        let finder = finder("{a}/{b}", &["x/foo", "y/bar"]);
        let query = Query::new().with("b", ["foo", "f*"]);
        let err = finder.find(&query, FindOptions::default()).unwrap_err();
        match err {
            Error::NonUniqueMetadata { duplicates } => {
                assert_eq!(duplicates, vec!["x/foo: a=x, b=foo"]);
            }
            other => panic!("expected NonUniqueMetadata, got {:?}", other),
        }
    }

    #[test]
    fn test_on_empty() {
        let finder = finder("{a}/{b}", &["x/foo"]);
        let query = Query::new().with("b", ["bar", "baz"]);

        match finder.find(&query, FindOptions::default()) {
            Err(Error::EmptyResult { patterns }) => assert_eq!(patterns, vec!["*/bar", "*/baz"]),
            other => panic!("expected EmptyResult, got {:?}", other),
        }

        for policy in [OnEmpty::Warn, OnEmpty::Allow] {
            let table = finder
                .find(&query, FindOptions::new().on_empty(policy))
                .unwrap();
            assert!(table.is_empty());
            assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        }
    }

    #[test]
    fn test_on_parse_error() {
        let finder = finder("{a}_{a}/{b}", &["x_x/foo", "x_y/foo"]);
        let err = finder.find(&Query::new(), FindOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ParseFailure { .. }));

        let table = finder
            .find(&Query::new(), FindOptions::new().on_parse_error(OnParseError::Ignore))
            .unwrap();
        assert_eq!(table.paths(), vec!["x_x/foo"]);
    }

    #[test]
    fn test_runaway_backtracking_is_a_parse_failure() {
        let long = format!("{}_x.nc", "a_".repeat(120));
        let finder = finder(
            "{a}_{b}_{c}_{d}_{e}_{f}_{a}_{b}_{c}_{d}_{e}_{f}.nc",
            &["1_2_3_4_5_6_1_2_3_4_5_6.nc", &long],
        );

        let table = finder
            .find(&Query::new(), FindOptions::new().on_parse_error(OnParseError::Ignore))
            .unwrap();
        assert_eq!(table.paths(), vec!["1_2_3_4_5_6_1_2_3_4_5_6.nc"]);

        let err = finder.find(&Query::new(), FindOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ParseFailure { ref path, .. } if *path == long));
    }

    #[test]
    fn test_unknown_query_field() {
        let finder = finder("{a}/{b}", &["x/foo"]);
        let err = finder
            .find(&Query::new().with("c", "1"), FindOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_suffix() {
        let finder = finder("{a}/", &["x/foo", "y/bar"]).with_suffix("*");
        assert_eq!(finder.suffix(), "*");
        let table = finder.find(&Query::new(), FindOptions::default()).unwrap();
        assert_eq!(table.paths(), vec!["x/*", "y/*"]);
    }
}
