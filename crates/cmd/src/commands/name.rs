// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use filefinder::FieldMap;

use crate::common::{FinderArgs, parse_assignment};

/// Which pattern a name is built from
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameLevel {
    Path,
    File,
    #[default]
    Full,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NameArgs {
    #[command(flatten)]
    pub finder: FinderArgs,

    #[arg(long, value_enum, default_value_t = NameLevel::Full)]
    pub level: NameLevel,

    /// Field values as KEY=VALUE
    pub fields: Vec<String>,
}

pub fn name_command<F>(args: &NameArgs, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let finder = args.finder.finder()?;

    let mut fields = FieldMap::new();
    for arg in &args.fields {
        let (key, mut values) = parse_assignment(arg)?;
        let value = match values.len() {
            1 => values.remove(0),
            _ => return Err(anyhow!("Expected a single value for '{}'", key)),
        };
        fields.insert(key, value);
    }

    let name = match args.level {
        NameLevel::Path => finder.create_path_name(&fields)?,
        NameLevel::File => finder.create_file_name(&fields)?,
        NameLevel::Full => finder.create_full_name(&fields)?,
    };
    output(name);
    Ok(())
}
