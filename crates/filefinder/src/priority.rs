// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Priority-based deduplication
//!
//! Rows that agree on every grouping column but differ in one priority
//! column (a grid or resolution tag, say) are collapsed to a single row: the
//! one whose priority value comes first in the caller's preference order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use diagnostics::*;

use crate::error::{Error, Result};
use crate::policy::OnMissing;
use crate::table::FileTable;

/// Settings for [`priority_filter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityFilter {
    /// Column whose values are ranked
    pub column: String,
    /// Preferred values, most preferred first
    pub order: Vec<String>,
    /// Grouping columns; defaults to every column except `column`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default)]
    pub on_missing: OnMissing,
}

impl PriorityFilter {
    pub fn new<C, I, S>(column: C, order: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            order: order.into_iter().map(Into::into).collect(),
            group_by: None,
            on_missing: OnMissing::default(),
        }
    }

    #[must_use]
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn on_missing(mut self, policy: OnMissing) -> Self {
        self.on_missing = policy;
        self
    }

    pub fn apply(&self, table: &FileTable) -> Result<FileTable> {
        priority_filter(
            table,
            &self.column,
            &self.order,
            self.group_by.as_deref(),
            self.on_missing,
        )
    }
}

/// Partition row indices by their values over `group_cols`, in order of first appearance
fn partition(table: &FileTable, group_cols: &[usize]) -> IndexMap<Vec<String>, Vec<usize>> {
    let mut groups: IndexMap<Vec<String>, Vec<usize>> = IndexMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        let key: Vec<String> = group_cols.iter().map(|&c| row.values()[c].clone()).collect();
        groups.entry(key).or_default().push(i);
    }
    groups
}

fn describe_group(table: &FileTable, members: &[usize]) -> String {
    members
        .iter()
        .map(|&i| table.describe_row(&table.rows()[i]))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep one row per group of rows that agree on `group_by`
///
/// Groups of one row are kept unchanged. Otherwise the first value of
/// `order` present in the group's `column` selects the row; if several rows
/// share that value the group is not a duplicate-on-one-column group and the
/// call fails with `AmbiguousPriorityMatch`. Groups holding none of the
/// values follow `on_missing` and are dropped unless it is `Raise`.
///
/// The result lists the kept rows in order of each group's first row.
pub fn priority_filter<S: AsRef<str>>(
    table: &FileTable,
    column: &str,
    order: &[S],
    group_by: Option<&[String]>,
    on_missing: OnMissing,
) -> Result<FileTable> {
    let priority_col = table.column_index(column).map_err(|_| {
        Error::invalid_query(format!("column ('{}') must be available in the table", column))
    })?;

    let group_cols: Vec<usize> = match group_by {
        Some(names) => {
            if names.iter().any(|n| n == column) {
                return Err(Error::invalid_query(format!(
                    "`group_by` may not contain column ('{}')",
                    column
                )));
            }
            names
                .iter()
                .map(|n| table.column_index(n))
                .collect::<Result<_>>()?
        }
        None => (0..table.columns().len())
            .filter(|&c| c != priority_col)
            .collect(),
    };

    let groups = partition(table, &group_cols);
    let mut kept = Vec::with_capacity(groups.len());

    for members in groups.values() {
        if let [only] = members.as_slice() {
            kept.push(*only);
            continue;
        }

        let value_of = |i: usize| table.rows()[i].values()[priority_col].as_str();
        let selected = order.iter().map(|s| s.as_ref()).find_map(|preferred| {
            let hits: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&i| value_of(i) == preferred)
                .collect();
            (!hits.is_empty()).then_some((preferred, hits))
        });

        match selected {
            Some((_, hits)) if hits.len() == 1 => kept.push(hits[0]),
            Some((value, _)) => {
                return Err(Error::AmbiguousPriorityMatch {
                    column: column.to_string(),
                    value: value.to_string(),
                    group: describe_group(table, members),
                });
            }
            None => {
                let group = describe_group(table, members);
                match on_missing {
                    OnMissing::Raise => return Err(Error::MissingPriorityMatch { group }),
                    OnMissing::Warn => {
                        warn!(
                            "Did not find any element from the priority list for {group}",
                            group: group
                        );
                    }
                    OnMissing::Ignore => {}
                }
            }
        }
    }

    let result = table.select(&kept);

    let regrouped = partition(&result, &group_cols);
    if regrouped.len() != result.len() {
        return Err(Error::internal(format!(
            "priority filter on '{}' left duplicate groups",
            column
        )));
    }

    Ok(result)
}
