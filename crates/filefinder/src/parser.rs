// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Recovering field values from literal paths

use diagnostics::*;

use crate::error::{Error, Result};
use crate::name::FieldMap;
use crate::policy::OnParseError;
use crate::table::Row;
use crate::template::CompiledTemplate;

impl CompiledTemplate {
    /// Field values captured from `path`
    ///
    /// Fails with `ParseFailure` when the path does not match, including when
    /// the occurrences of a repeated field disagree.
    pub fn parse(&self, path: &str) -> Result<FieldMap> {
        let values = self.parse_values(path)?;
        Ok(self.fields().iter().cloned().zip(values).collect())
    }

    /// Like [`CompiledTemplate::parse`], values aligned with
    /// [`CompiledTemplate::fields`]
    pub fn parse_values(&self, path: &str) -> Result<Vec<String>> {
        self.grammar()
            .captures(path)?
            .ok_or_else(|| Error::parse_failure(path, self.pattern()))
    }
}

/// Parse every path into a row, applying `policy` to paths that do not match
///
/// `suffix` is appended to the stored path of each row (directory-level
/// finders store `dir/*`). Relaxed failures are dropped, never kept with
/// partial data.
pub fn parse_paths<S: AsRef<str>>(
    template: &CompiledTemplate,
    paths: &[S],
    suffix: &str,
    policy: OnParseError,
) -> Result<Vec<Row>> {
    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        match template.parse_values(path) {
            Ok(values) => rows.push(Row::new(format!("{}{}", path, suffix), values)),
            Err(err @ Error::ParseFailure { .. }) => match policy {
                OnParseError::Raise => return Err(err),
                OnParseError::Warn => {
                    let message = err.to_string();
                    warn!("{message}", message: message);
                }
                OnParseError::Ignore => {
                    debug!("Skipping unparsable path {path}", path: path);
                }
            },
            Err(err) => return Err(err),
        }
    }
    Ok(rows)
}
