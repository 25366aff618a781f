// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Filefinder
//!
//! Find files by a placeholder template, build file names from field
//! values and collect the metadata of discovered paths into a table.
//!
//! A template such as `/data/{model}/{exp}/{varn}_{year:4d}.nc` is compiled
//! once into a [`CompiledTemplate`]. It builds names, expands a [`Query`]
//! into wildcard search patterns and parses discovered paths back into
//! their field values. A [`Finder`] runs the whole discovery against a
//! [`PathProvider`]; a [`FileFinder`] combines a directory template with a
//! file name template.

pub mod cmip;
mod config;
mod error;
mod file_finder;
mod finder;
mod name;
mod parser;
mod policy;
mod priority;
pub mod provider;
mod query;
mod sort;
mod table;
pub mod template;

pub use config::FinderConfig;
pub use error::{Error, Result};
pub use file_finder::FileFinder;
pub use finder::{FindOptions, Finder};
pub use name::{FieldMap, field_map, merged};
pub use parser::parse_paths;
pub use policy::{OnEmpty, OnMissing, OnParseError};
pub use priority::{PriorityFilter, priority_filter};
pub use provider::{HostProvider, ListProvider, PathProvider};
pub use query::{Candidates, Query, WILDCARD, expand};
pub use sort::{natural_cmp, natural_sort};
pub use table::{FileTable, Row};
pub use template::{CompiledTemplate, FormatHint, Segment};
