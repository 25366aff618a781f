// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;

use crate::common::FinderArgs;

/// Describe the finder: its patterns and the fields they define
pub fn keys_command<F>(args: &FinderArgs, mut output: F) -> Result<()>
where
    F: FnMut(String),
{
    let finder = args.finder()?;
    for line in finder.to_string().lines() {
        output(line.to_string());
    }
    Ok(())
}
