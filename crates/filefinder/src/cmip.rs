// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Helpers for CMIP-style climate model archives

use std::collections::HashMap;

use crate::error::Result;
use crate::policy::OnMissing;
use crate::priority::priority_filter;
use crate::table::FileTable;
use crate::template::CompiledTemplate;

/// Grid labels in order of preference: native, regridded, regridded to a
/// second grid, global mean
pub const VALID_GRIDS: &[&str] = &["gn", "gr", "gr1", "gm"];

/// Columns that identify one simulation
pub const SIMULATION_KEYS: &[&str] = &["exp", "table", "varn", "model", "ens"];

/// Default grouping for [`create_ensnumber`]
pub const ENSEMBLE_KEYS: &[&str] = &["exp", "table", "varn", "model"];

const ENS_COLUMN: &str = "ens";
const CMIP5_ENS: &str = "r{r:d}i{i:d}p{p:d}";
const CMIP6_ENS: &str = "r{r:d}i{i:d}p{p:d}f{f:d}";

/// Split the ensemble member label (`r1i1p1` or `r1i1p1f1`) into columns
///
/// The format is chosen from the first row; every member must follow it.
pub fn parse_ens(table: &FileTable) -> Result<FileTable> {
    let members = table.column(ENS_COLUMN)?;
    let Some(first) = members.first() else {
        return Ok(table.clone());
    };

    let template = CompiledTemplate::compile(if first.contains('f') {
        CMIP6_ENS
    } else {
        CMIP5_ENS
    })?;

    let parsed = members
        .iter()
        .map(|member| template.parse_values(member))
        .collect::<Result<Vec<_>>>()?;

    let mut result = table.clone();
    for (idx, field) in template.fields().iter().enumerate() {
        let values = parsed.iter().map(|values| values[idx].clone()).collect();
        result = result.with_column(field.as_str(), values)?;
    }
    Ok(result)
}

/// Number ensemble members from 0 within each group of `keys`
///
/// Adds an `ensnumber` column; `keys` defaults to [`ENSEMBLE_KEYS`].
pub fn create_ensnumber(table: &FileTable, keys: Option<&[&str]>) -> Result<FileTable> {
    let keys = keys.unwrap_or(ENSEMBLE_KEYS);
    let columns = keys
        .iter()
        .map(|key| table.column(key))
        .collect::<Result<Vec<_>>>()?;

    let mut counters: HashMap<Vec<&str>, usize> = HashMap::new();
    let numbers = (0..table.len())
        .map(|row| {
            let group: Vec<&str> = columns.iter().map(|column| column[row]).collect();
            let counter = counters.entry(group).or_default();
            let number = *counter;
            *counter += 1;
            number.to_string()
        })
        .collect();

    table.with_column("ensnumber", numbers)
}

/// Keep one grid per simulation, preferring grids in [`VALID_GRIDS`] order
pub fn ensure_unique_grid(table: &FileTable) -> Result<FileTable> {
    let group_by: Vec<String> = SIMULATION_KEYS.iter().map(|k| k.to_string()).collect();
    priority_filter(
        table,
        "grid",
        VALID_GRIDS,
        Some(group_by.as_slice()),
        OnMissing::Raise,
    )
}
