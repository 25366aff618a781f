// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Field constraints and their expansion into concrete search patterns

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::name::FieldMap;
use crate::template::CompiledTemplate;

/// Placeholder substituted for fields a query leaves unconstrained
pub const WILDCARD: &str = "*";

/// Accepted values for one field
///
/// A string is always a single candidate, never a sequence of characters.
/// Only the `List` form carries several candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    One(String),
    List(Vec<String>),
}

impl Candidates {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Candidates::One(value) => std::slice::from_ref(value),
            Candidates::List(values) => values,
        }
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.as_slice().iter().any(|v| v == value)
    }
}

impl From<&str> for Candidates {
    fn from(value: &str) -> Self {
        Candidates::One(value.to_string())
    }
}

impl From<String> for Candidates {
    fn from(value: String) -> Self {
        Candidates::One(value)
    }
}

impl From<&String> for Candidates {
    fn from(value: &String) -> Self {
        Candidates::One(value.clone())
    }
}

macro_rules! scalar_candidates {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Candidates {
                fn from(value: $t) -> Self {
                    Candidates::One(value.to_string())
                }
            }
        )*
    };
}

scalar_candidates!(i32, i64, u32, u64, usize);

impl<T: ToString> From<Vec<T>> for Candidates {
    fn from(values: Vec<T>) -> Self {
        Candidates::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for Candidates {
    fn from(values: &[T]) -> Self {
        Candidates::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Candidates {
    fn from(values: [T; N]) -> Self {
        Candidates::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered field constraints: `name -> value | [values]`
///
/// Different fields combine with AND, candidates of one field with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    constraints: IndexMap<String, Candidates>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the constraint on `field`
    #[must_use]
    pub fn with<K: Into<String>, C: Into<Candidates>>(mut self, field: K, candidates: C) -> Self {
        self.set(field, candidates);
        self
    }

    pub fn set<K: Into<String>, C: Into<Candidates>>(&mut self, field: K, candidates: C) {
        _ = self.constraints.insert(field.into(), candidates.into());
    }

    /// `self` updated with `overrides`; constraints of `overrides` win
    #[must_use]
    pub fn merged(&self, overrides: &Query) -> Query {
        let mut out = self.clone();
        for (field, candidates) in &overrides.constraints {
            _ = out.constraints.insert(field.clone(), candidates.clone());
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn get(&self, field: &str) -> Option<&Candidates> {
        self.constraints.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Candidates)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    /// Number of combinations [`Query::combinations`] yields
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.constraints
            .values()
            .map(|c| c.as_slice().len())
            .product()
    }

    /// Cartesian product of the candidate lists
    ///
    /// Fields keep their insertion order and the last field varies
    /// fastest: `{a: [1, 2], b: [3, 4]}` yields `(1,3) (1,4) (2,3) (2,4)`.
    /// An empty query yields one empty combination.
    #[must_use]
    pub fn combinations(&self) -> Vec<FieldMap> {
        let lists: Vec<(&String, &[String])> = self
            .constraints
            .iter()
            .map(|(k, v)| (k, v.as_slice()))
            .collect();

        if lists.iter().any(|(_, values)| values.is_empty()) {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(self.cardinality());
        let mut odometer = vec![0usize; lists.len()];
        loop {
            out.push(
                lists
                    .iter()
                    .zip(&odometer)
                    .map(|((field, values), &i)| ((*field).clone(), values[i].clone()))
                    .collect(),
            );

            // Advance from the last position
            let mut pos = lists.len();
            loop {
                if pos == 0 {
                    return out;
                }
                pos -= 1;
                odometer[pos] += 1;
                if odometer[pos] < lists[pos].1.len() {
                    break;
                }
                odometer[pos] = 0;
            }
        }
    }

    /// Fail with `InvalidQuery` if a constrained field is not in `fields`
    pub fn validate_fields(&self, fields: &[String], context: &str) -> Result<()> {
        for field in self.fields() {
            if !fields.iter().any(|f| f == field) {
                return Err(Error::invalid_query(format!(
                    "'{}' is not a field of '{}' (fields: {})",
                    field,
                    context,
                    fields.join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, C: Into<Candidates>> FromIterator<(K, C)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (field, candidates) in iter {
            query.set(field, candidates);
        }
        query
    }
}

/// Concrete search patterns for `query`, one per combination
///
/// Constrained fields receive their combination value and every other field
/// receives [`WILDCARD`]. Duplicate patterns are kept.
pub fn expand(template: &CompiledTemplate, query: &Query) -> Result<Vec<String>> {
    query.validate_fields(template.fields(), template.pattern())?;

    query
        .combinations()
        .into_iter()
        .map(|combination| {
            let filled: FieldMap = template
                .fields()
                .iter()
                .map(|field| {
                    let value = combination
                        .get(field)
                        .cloned()
                        .unwrap_or_else(|| WILDCARD.to_string());
                    (field.clone(), value)
                })
                .collect();
            template.build(&filled)
        })
        .collect()
}
