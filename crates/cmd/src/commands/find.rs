// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Args;
use diagnostics::*;
use filefinder::{FileTable, OnEmpty, OnMissing, OnParseError, PriorityFilter};
use serde_json::{Map, Value};

use crate::common::{FinderArgs, parse_assignment, parse_query};

#[derive(Args, Debug, Clone, Default)]
pub struct FindArgs {
    #[command(flatten)]
    pub finder: FinderArgs,

    /// Field constraints as KEY=V1,V2
    pub constraints: Vec<String>,

    /// Search directories (the path pattern) instead of files
    #[arg(long)]
    pub paths: bool,

    /// raise, warn or ignore
    #[arg(long)]
    pub on_parse_error: Option<OnParseError>,

    /// raise, warn or allow
    #[arg(long)]
    pub on_empty: Option<OnEmpty>,

    /// Keep one row per group, preferring values in order: COLUMN=V1,V2
    #[arg(long)]
    pub priority: Option<String>,

    /// raise, warn or ignore; for groups without a preferred value
    #[arg(long)]
    pub on_missing: Option<OnMissing>,

    /// Print one JSON object per row
    #[arg(long)]
    pub json: bool,
}

impl FindArgs {
    fn priority_filter(
        &self,
        configured: Option<&PriorityFilter>,
    ) -> Result<Option<PriorityFilter>> {
        let filter = match &self.priority {
            Some(arg) => {
                let (column, order) = parse_assignment(arg)?;
                Some(PriorityFilter::new(column, order))
            }
            None => configured.cloned(),
        };
        Ok(filter.map(|filter| match self.on_missing {
            Some(policy) => filter.on_missing(policy),
            None => filter,
        }))
    }
}

/// Discover files (or directories) and hand each output line to `output`
pub fn find_command<F>(args: &FindArgs, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let config = args.finder.resolve()?;
    let finder = config.build()?;
    let query = parse_query(&args.constraints)?;

    let mut options = config.find_options();
    if let Some(policy) = args.on_parse_error {
        options.on_parse_error = policy;
    }
    if let Some(policy) = args.on_empty {
        options.on_empty = policy;
    }

    let mut table = if args.paths {
        finder.find_paths(&query, options)?
    } else {
        finder.find_files(&query, options)?
    };

    if let Some(filter) = args.priority_filter(config.priority())? {
        let before = table.len();
        table = filter.apply(&table)?;
        debug!(
            "Priority filter on {column} kept {after} of {before} rows",
            column: filter.column.as_str(),
            after: table.len(),
            before: before
        );
    }

    if args.json {
        for line in json_lines(&table)? {
            output(line);
        }
    } else {
        for line in table.to_string().lines() {
            output(line.to_string());
        }
    }
    Ok(())
}

fn json_lines(table: &FileTable) -> Result<Vec<String>> {
    table
        .iter()
        .map(|(path, fields)| -> Result<String> {
            let mut object = Map::new();
            object.insert("path".to_string(), Value::String(path.to_string()));
            for (key, value) in fields {
                object.insert(key, Value::String(value));
            }
            Ok(serde_json::to_string(&Value::Object(object))?)
        })
        .collect()
}
