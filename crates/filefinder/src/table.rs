// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Metadata table of discovered paths
//!
//! A [`FileTable`] is an ordered list of rows, each a path plus one value
//! per column. Columns are fixed when the table is built (normally the
//! distinct fields of a template) and shared by all rows. Every operation
//! that selects or reshapes rows returns a new table; row storage is never
//! shared between a table and the tables derived from it.

use std::collections::HashSet;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use crate::error::{Error, Result};
use crate::name::FieldMap;
use crate::query::Query;

/// Number of offending rows reported by `NonUniqueMetadata`
const DUPLICATES_REPORTED: usize = 5;

/// One discovered path with its field values, aligned with the table columns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    path: String,
    values: Vec<String>,
}

impl Row {
    pub fn new<P: Into<String>>(path: P, values: Vec<String>) -> Self {
        Self {
            path: path.into(),
            values,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl FileTable {
    /// An empty table with the given columns
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build from rows whose values are aligned with `columns`
    pub fn from_rows<I>(columns: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(Error::invalid_query(format!(
                    "duplicate column '{}'",
                    column
                )));
            }
        }

        let rows: Vec<Row> = rows.into_iter().collect();
        if let Some(bad) = rows.iter().find(|r| r.values.len() != columns.len()) {
            return Err(Error::invalid_query(format!(
                "row '{}' has {} values, expected {} ({})",
                bad.path,
                bad.values.len(),
                columns.len(),
                columns.join(", ")
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Build from `(path, field-map)` records
    ///
    /// Every record must carry exactly the given columns, in any order.
    pub fn from_records<I, P>(columns: Vec<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, FieldMap)>,
        P: Into<String>,
    {
        let mut rows = Vec::new();
        for (path, fields) in records {
            let path = path.into();
            if fields.len() != columns.len() {
                return Err(Error::invalid_query(format!(
                    "record '{}' has fields ({}), expected ({})",
                    path,
                    fields.keys().cloned().collect::<Vec<_>>().join(", "),
                    columns.join(", ")
                )));
            }
            let values = columns
                .iter()
                .map(|c| {
                    fields.get(c).cloned().ok_or_else(|| {
                        Error::invalid_query(format!("record '{}' lacks field '{}'", path, c))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(Row::new(path, values));
        }
        Self::from_rows(columns, rows)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn column_index(&self, name: &str) -> Result<usize> {
        self.columns.iter().position(|c| c == name).ok_or_else(|| {
            Error::invalid_query(format!(
                "unknown column '{}' (columns: {})",
                name,
                self.columns.join(", ")
            ))
        })
    }

    fn field_map(&self, row: &Row) -> FieldMap {
        self.columns
            .iter()
            .cloned()
            .zip(row.values.iter().cloned())
            .collect()
    }

    /// `(path, field-map)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldMap)> + '_ {
        self.rows.iter().map(|row| (row.path(), self.field_map(row)))
    }

    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.rows.iter().map(Row::path).collect()
    }

    #[must_use]
    pub fn meta(&self) -> Vec<FieldMap> {
        self.rows.iter().map(|row| self.field_map(row)).collect()
    }

    /// Values of one column in row order
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r.values[idx].as_str()).collect())
    }

    /// Row at `index`; negative indices count from the end
    #[must_use]
    pub fn get(&self, index: isize) -> Option<(&str, FieldMap)> {
        let idx = if index < 0 {
            self.rows.len().checked_sub(index.unsigned_abs())?
        } else {
            usize::try_from(index).ok()?
        };
        self.rows
            .get(idx)
            .map(|row| (row.path(), self.field_map(row)))
    }

    /// New table over the rows in `range`; out-of-range bounds are clamped
    #[must_use]
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> FileTable {
        let len = self.rows.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);

        FileTable {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// New table with the rows at `indices`, in that order
    pub(crate) fn select(&self, indices: &[usize]) -> FileTable {
        FileTable {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Rows matching every constraint of `query`
    ///
    /// Constraints on different columns combine with AND, candidates for one
    /// column with OR. An empty query selects nothing: the result is an empty
    /// table with the same columns. Unknown columns fail with `InvalidQuery`.
    pub fn search(&self, query: &Query) -> Result<FileTable> {
        if query.is_empty() {
            return Ok(FileTable::new(self.columns.clone()));
        }

        let conditions = query
            .iter()
            .map(|(field, candidates)| Ok((self.column_index(field)?, candidates)))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .filter(|row| {
                conditions
                    .iter()
                    .all(|(idx, candidates)| candidates.contains(&row.values[*idx]))
            })
            .cloned()
            .collect();

        Ok(FileTable {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Per row, the named columns (default: all) joined with `sep`
    pub fn combine_columns(&self, names: Option<&[&str]>, sep: &str) -> Result<Vec<String>> {
        let indices: Vec<usize> = match names {
            Some(names) => names
                .iter()
                .map(|n| self.column_index(n))
                .collect::<Result<_>>()?,
            None => (0..self.columns.len()).collect(),
        };

        Ok(self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.values[i].as_str())
                    .collect::<Vec<_>>()
                    .join(sep)
            })
            .collect())
    }

    /// Fail with `NonUniqueMetadata` if two rows carry the same field values
    ///
    /// Paths are not part of the comparison: two different files decoding to
    /// the same metadata are exactly the condition being reported.
    pub fn ensure_unique(&self) -> Result<()> {
        let mut seen: HashSet<&[String]> = HashSet::with_capacity(self.rows.len());
        let duplicates: Vec<String> = self
            .rows
            .iter()
            .filter(|row| !seen.insert(row.values.as_slice()))
            .take(DUPLICATES_REPORTED)
            .map(|row| self.describe_row(row))
            .collect();

        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(Error::NonUniqueMetadata { duplicates })
        }
    }

    /// New table with an extra column
    pub fn with_column<S: Into<String>>(&self, name: S, values: Vec<String>) -> Result<FileTable> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(Error::invalid_query(format!(
                "column '{}' already exists",
                name
            )));
        }
        if values.len() != self.rows.len() {
            return Err(Error::invalid_query(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        let mut columns = self.columns.clone();
        columns.push(name);
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut values = row.values.clone();
                values.push(value);
                Row::new(row.path.clone(), values)
            })
            .collect();

        Ok(FileTable { columns, rows })
    }

    pub(crate) fn describe_row(&self, row: &Row) -> String {
        let fields: Vec<String> = self
            .columns
            .iter()
            .zip(&row.values)
            .map(|(c, v)| format!("{}={}", c, v))
            .collect();
        format!("{}: {}", row.path, fields.join(", "))
    }
}

impl<'a> IntoIterator for &'a FileTable {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for FileTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = std::iter::once("path")
            .chain(self.columns.iter().map(String::as_str))
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            let cells = std::iter::once(&row.path).chain(&row.values);
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[&str]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_line(f, &header)?;
        for row in &self.rows {
            let cells: Vec<&str> = std::iter::once(row.path.as_str())
                .chain(row.values.iter().map(String::as_str))
                .collect();
            write_line(f, &cells)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::field_map;

    fn example() -> FileTable {
        let columns = vec!["model".to_string(), "scen".to_string(), "res".to_string()];
        let rows = [
            ("file0", "a", "d", "r"),
            ("file1", "a", "h", "r"),
            ("file2", "b", "h", "r"),
            ("file3", "b", "d", "r"),
            ("file4", "c", "d", "r"),
        ]
        .into_iter()
        .map(|(p, m, s, r)| Row::new(p, vec![m.into(), s.into(), r.into()]));
        FileTable::from_rows(columns, rows).unwrap()
    }

    #[test]
    fn test_empty_table() {
        let table = FileTable::new(vec!["cat".to_string()]);
        assert_eq!(table.len(), 0);
        assert!(table.iter().next().is_none());
        assert_eq!(table.columns(), &["cat".to_string()]);
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let table = example();
        let (path, meta) = table.iter().next().unwrap();
        assert_eq!(path, "file0");
        assert_eq!(meta, field_map([("model", "a"), ("scen", "d"), ("res", "r")]));
        assert_eq!(
            table.paths(),
            vec!["file0", "file1", "file2", "file3", "file4"]
        );
        assert_eq!(table.meta()[4], field_map([("model", "c"), ("scen", "d"), ("res", "r")]));
    }

    #[test]
    fn test_get_with_negative_index() {
        let table = example();
        assert_eq!(table.get(0).unwrap().0, "file0");
        let (path, meta) = table.get(-1).unwrap();
        assert_eq!(path, "file4");
        assert_eq!(meta["model"], "c");
        assert!(table.get(5).is_none());
        assert!(table.get(-6).is_none());
    }

    #[test]
    fn test_slice() {
        let table = example();
        let first = table.slice(0..1);
        assert_eq!(first.paths(), vec!["file0"]);
        assert_eq!(first.columns(), table.columns());

        let empty = table.slice(0..0);
        assert!(empty.is_empty());
        assert_eq!(empty.columns(), table.columns());

        assert_eq!(table.slice(3..).len(), 2);
        assert_eq!(table.slice(..=10).len(), 5);
    }

    #[test]
    fn test_search_conjunction_and_disjunction() {
        let table = example();

        let result = table.search(&Query::new().with("model", "a")).unwrap();
        assert_eq!(result.paths(), vec!["file0", "file1"]);

        let result = table
            .search(&Query::new().with("model", ["a", "b"]).with("scen", "d"))
            .unwrap();
        assert_eq!(result.paths(), vec!["file0", "file3"]);
    }

    #[test]
    fn test_search_without_constraints_is_empty() {
        let table = example();
        let result = table.search(&Query::new()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns(), table.columns());
    }

    #[test]
    fn test_search_absent_value_is_empty() {
        let table = example();
        assert!(table.search(&Query::new().with("model", "d")).unwrap().is_empty());
        assert!(table.search(&Query::new().with("model", 0)).unwrap().is_empty());
    }

    #[test]
    fn test_search_unknown_column() {
        let err = example()
            .search(&Query::new().with("not_in_table", "a"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn test_search_does_not_alias_parent() {
        let table = example();
        let subset = table.search(&Query::new().with("model", "a")).unwrap();
        let augmented = subset
            .with_column("extra", vec!["1".into(), "2".into()])
            .unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(subset.columns().len(), 3);
        assert_eq!(augmented.columns().len(), 4);
    }

    #[test]
    fn test_combine_columns() {
        let table = example();
        let all = table.combine_columns(None, ".").unwrap();
        assert_eq!(all[0], "a.d.r");
        let some = table.combine_columns(Some(["scen", "model"].as_slice()), "_").unwrap();
        assert_eq!(some[2], "h_b");
        assert!(table.combine_columns(Some(["nope"].as_slice()), ".").is_err());
    }

    #[test]
    fn test_ensure_unique() {
        assert!(example().ensure_unique().is_ok());

        let columns = vec!["a".to_string()];
        let rows = vec![
            Row::new("x/1", vec!["1".into()]),
            Row::new("y/1", vec!["1".into()]),
        ];
        let table = FileTable::from_rows(columns, rows).unwrap();
        match table.ensure_unique() {
            Err(Error::NonUniqueMetadata { duplicates }) => {
                assert_eq!(duplicates, vec!["y/1: a=1".to_string()]);
            }
            other => panic!("expected NonUniqueMetadata, got {:?}", other),
        }
    }

    #[test]
    fn test_from_rows_width_mismatch() {
        let rows = vec![Row::new("p", vec!["1".into()])];
        assert!(FileTable::from_rows(vec!["a".into(), "b".into()], rows).is_err());
        assert!(FileTable::from_rows(vec!["a".into(), "a".into()], vec![]).is_err());
    }

    #[test]
    fn test_from_records() {
        let table = FileTable::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![("p0", field_map([("b", "2"), ("a", "1")]))],
        )
        .unwrap();
        assert_eq!(table.rows()[0].values(), &["1".to_string(), "2".to_string()]);

        let err = FileTable::from_records(
            vec!["a".to_string(), "b".to_string()],
            vec![("p0", field_map([("a", "1"), ("c", "2")]))],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_with_column_validation() {
        let table = example();
        assert!(table.with_column("model", vec!["x".into(); 5]).is_err());
        assert!(table.with_column("new", vec!["x".into(); 4]).is_err());
        let augmented = table.with_column("new", vec!["x".into(); 5]).unwrap();
        assert_eq!(augmented.column("new").unwrap(), vec!["x"; 5]);
    }

    #[test]
    fn test_display_aligns_columns() {
        let table = example().slice(0..2);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "path   model  scen  res");
        assert_eq!(lines[1], "file0  a      d     r");
    }
}
