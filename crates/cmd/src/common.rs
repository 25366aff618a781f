// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use filefinder::{FileFinder, FinderConfig, Query};

/// Options shared by every command that needs a finder
#[derive(Args, Debug, Clone, Default)]
pub struct FinderArgs {
    /// Path (folder) pattern, e.g. "/data/{model}/{exp}"
    #[arg(short = 'p', long)]
    pub path_pattern: Option<String>,

    /// File name pattern, e.g. "{varn}_{model}_{exp}.nc"
    #[arg(short = 'f', long)]
    pub file_pattern: Option<String>,

    /// YAML file describing the finder; -p and -f take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl FinderArgs {
    /// Load the configuration file, if any, with command-line patterns applied
    pub fn resolve(&self) -> Result<FinderConfig> {
        let mut config = match &self.config {
            Some(path) => FinderConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => {
                let (Some(path_pattern), Some(file_pattern)) =
                    (&self.path_pattern, &self.file_pattern)
                else {
                    return Err(anyhow!(
                        "Both --path-pattern and --file-pattern are required without --config"
                    ));
                };
                FinderConfig {
                    path_pattern: path_pattern.clone(),
                    file_pattern: file_pattern.clone(),
                    on_parse_error: Default::default(),
                    on_empty: Default::default(),
                    priority: None,
                    test_paths: None,
                }
            }
        };

        if let Some(path_pattern) = &self.path_pattern {
            config.path_pattern = path_pattern.clone();
        }
        if let Some(file_pattern) = &self.file_pattern {
            config.file_pattern = file_pattern.clone();
        }
        Ok(config)
    }

    pub fn finder(&self) -> Result<FileFinder> {
        Ok(self.resolve()?.build()?)
    }
}

/// Split `KEY=V1,V2` into the key and its values
pub fn parse_assignment(arg: &str) -> Result<(String, Vec<String>)> {
    let (key, values) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", arg))?;
    if key.is_empty() {
        return Err(anyhow!("Missing key in '{}'", arg));
    }
    Ok((
        key.to_string(),
        values.split(',').map(str::to_string).collect(),
    ))
}

/// Build a query from `KEY=V1,V2` arguments
pub fn parse_query<S: AsRef<str>>(args: &[S]) -> Result<Query> {
    let mut query = Query::new();
    for arg in args {
        let (key, values) = parse_assignment(arg.as_ref())?;
        match <[String; 1]>::try_from(values) {
            Ok([value]) => query.set(key, value),
            Err(values) => query.set(key, values),
        }
    }
    Ok(query)
}
