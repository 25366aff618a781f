// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Path providers turn a concrete search pattern into matching paths
//!
//! Patterns use `*` for unconstrained placeholders. A pattern ending in `/`
//! asks for directories; matches are then returned with a trailing `/`.

pub mod glob;
mod host;
mod memory;

pub use glob::{SEPARATOR, SearchPattern, WildcardComponent};
pub use host::HostProvider;
pub use memory::ListProvider;

use crate::error::Result;

/// Source of literal paths matching a search pattern
///
/// Calls are made one pattern at a time, in query-expansion order. The
/// order of the returned paths does not matter; the caller sorts them.
pub trait PathProvider: Send + Sync {
    fn find_matches(&self, pattern: &str) -> Result<Vec<String>>;
}
