// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Finder composed of a directory template and a file name template

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::finder::{FindOptions, Finder};
use crate::name::FieldMap;
use crate::provider::{ListProvider, PathProvider, SEPARATOR};
use crate::query::Query;
use crate::table::FileTable;
use crate::template::CompiledTemplate;

/// Rows found by [`FileFinder::find_paths`] stand for every file below them
const PATH_SUFFIX: &str = "*";

/// Find and create file names from a path (folder) and a file pattern
///
/// ```
/// use filefinder::{FileFinder, FindOptions, Query, field_map};
///
/// let finder = FileFinder::new("/root/{category}", "{var}_{model}.nc")?
///     .with_test_paths(["/root/a/x_m1.nc", "/root/a/y_m1.nc", "/root/b/x_m2.nc"]);
///
/// assert_eq!(finder.keys(), &["category", "var", "model"]);
/// assert_eq!(
///     finder.create_full_name(&field_map([("category", "a"), ("var", "x"), ("model", "m1")]))?,
///     "/root/a/x_m1.nc"
/// );
///
/// let files = finder.find_files(&Query::new().with("var", "x"), FindOptions::default())?;
/// assert_eq!(files.paths(), vec!["/root/a/x_m1.nc", "/root/b/x_m2.nc"]);
/// # Ok::<(), filefinder::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileFinder {
    path: Finder,
    file: CompiledTemplate,
    full: Finder,
}

impl FileFinder {
    pub fn new<P: AsRef<str>, F: AsRef<str>>(path_pattern: P, file_pattern: F) -> Result<Self> {
        let file_pattern = file_pattern.as_ref();
        if file_pattern.contains(SEPARATOR) {
            return Err(Error::invalid_template(
                file_pattern,
                format!("file_pattern cannot contain '{}'", SEPARATOR),
            ));
        }

        let path_pattern = normalize_path_pattern(path_pattern.as_ref());
        let full_pattern = format!("{}{}", path_pattern, file_pattern);

        Ok(Self {
            path: Finder::new(path_pattern)?.with_suffix(PATH_SUFFIX),
            file: CompiledTemplate::compile(file_pattern)?,
            full: Finder::new(full_pattern)?,
        })
    }

    /// Resolve searches against a fixed list of paths instead of the filesystem
    #[must_use]
    pub fn with_test_paths<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_provider(Arc::new(ListProvider::new(paths)))
    }

    #[must_use]
    pub fn with_provider(self, provider: Arc<dyn PathProvider>) -> Self {
        Self {
            path: self.path.with_provider(provider.clone()),
            file: self.file,
            full: self.full.with_provider(provider),
        }
    }

    #[must_use]
    pub fn path_pattern(&self) -> &str {
        self.path.template().pattern()
    }

    #[must_use]
    pub fn file_pattern(&self) -> &str {
        self.file.pattern()
    }

    #[must_use]
    pub fn full_pattern(&self) -> &str {
        self.full.template().pattern()
    }

    /// Fields of the combined pattern, in order of first occurrence
    #[must_use]
    pub fn keys(&self) -> &[String] {
        self.full.template().fields()
    }

    #[must_use]
    pub fn keys_path(&self) -> &[String] {
        self.path.template().fields()
    }

    #[must_use]
    pub fn keys_file(&self) -> &[String] {
        self.file.fields()
    }

    /// Build a directory name; combine maps with [`crate::merged`] to override values
    pub fn create_path_name(&self, fields: &FieldMap) -> Result<String> {
        self.path.template().build(fields)
    }

    pub fn create_file_name(&self, fields: &FieldMap) -> Result<String> {
        self.file.build(fields)
    }

    pub fn create_full_name(&self, fields: &FieldMap) -> Result<String> {
        self.full.template().build(fields)
    }

    /// Find directories matching the path pattern
    ///
    /// Each row's path ends in `*`, standing for the files it contains.
    pub fn find_paths(&self, query: &Query, options: FindOptions) -> Result<FileTable> {
        self.path.find(query, options)
    }

    /// Find files matching the combined pattern
    pub fn find_files(&self, query: &Query, options: FindOptions) -> Result<FileTable> {
        self.full.find(query, options)
    }
}

/// End a non-empty path pattern with exactly one separator
fn normalize_path_pattern(path_pattern: &str) -> String {
    let trimmed = path_pattern.trim_end_matches(SEPARATOR);
    if path_pattern.is_empty() {
        String::new()
    } else {
        format!("{}{}", trimmed, SEPARATOR)
    }
}

impl fmt::Display for FileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().iter().map(String::as_str).collect();
        keys.sort_unstable();

        writeln!(f, "<FileFinder>")?;
        writeln!(f, "path_pattern: '{}'", self.path_pattern())?;
        writeln!(f, "file_pattern: '{}'", self.file_pattern())?;
        writeln!(f)?;
        write!(f, "keys: '{}'", keys.join("', '"))
    }
}
