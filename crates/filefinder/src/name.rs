// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Name construction from field values

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::template::{CompiledTemplate, Segment};

/// Ordered mapping from field name to its string value
pub type FieldMap = IndexMap<String, String>;

/// Build a [`FieldMap`] from `(name, value)` pairs
///
/// ```
/// let fields = filefinder::field_map([("model", "CESM2"), ("year", "2020")]);
/// assert_eq!(fields["year"], "2020");
/// ```
pub fn field_map<I, K, V>(pairs: I) -> FieldMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// `base` updated with `overrides`; entries of `overrides` win
#[must_use]
pub fn merged(base: &FieldMap, overrides: &FieldMap) -> FieldMap {
    let mut out = base.clone();
    for (k, v) in overrides {
        _ = out.insert(k.clone(), v.clone());
    }
    out
}

impl CompiledTemplate {
    /// Substitute raw values into the construction form
    ///
    /// Extra entries in `fields` are ignored. Format hints are never
    /// re-applied: `{year:4d}` with `year = "7"` builds `7`.
    pub fn build(&self, fields: &FieldMap) -> Result<String> {
        let mut out = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { name, .. } => {
                    let value = fields
                        .get(name)
                        .ok_or_else(|| Error::missing_field(name, self.pattern()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
