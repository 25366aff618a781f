// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! YAML description of a finder
//!
//! ```yaml
//! path_pattern: /data/{model}/{exp}
//! file_pattern: "{varn}_{model}_{exp}_{ens}_{grid}.nc"
//! on_parse_error: warn
//! on_empty: raise
//! priority:
//!   column: grid
//!   order: [gn, gr]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use diagnostics::*;

use crate::error::{Error, Result};
use crate::file_finder::FileFinder;
use crate::finder::FindOptions;
use crate::policy::{OnEmpty, OnParseError};
use crate::priority::PriorityFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinderConfig {
    pub path_pattern: String,
    pub file_pattern: String,
    #[serde(default)]
    pub on_parse_error: OnParseError,
    #[serde(default)]
    pub on_empty: OnEmpty,
    /// Applied to discovered tables by callers that deduplicate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityFilter>,
    /// Search these paths instead of the filesystem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_paths: Option<Vec<String>>,
}

impl FinderConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FinderConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse YAML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded finder config from {path}", path: path.display().to_string());
        Self::from_yaml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.path_pattern.is_empty() && self.file_pattern.is_empty() {
            return Err(Error::Config(
                "path_pattern and file_pattern cannot both be empty".to_string(),
            ));
        }
        if let Some(priority) = &self.priority
            && priority.order.is_empty()
        {
            return Err(Error::Config(format!(
                "priority order for column '{}' cannot be empty",
                priority.column
            )));
        }
        Ok(())
    }

    /// Compile the configured finder
    pub fn build(&self) -> Result<FileFinder> {
        let finder = FileFinder::new(&self.path_pattern, &self.file_pattern)?;
        Ok(match &self.test_paths {
            Some(paths) => finder.with_test_paths(paths.iter().cloned()),
            None => finder,
        })
    }

    #[must_use]
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            on_parse_error: self.on_parse_error,
            on_empty: self.on_empty,
        }
    }

    #[must_use]
    pub fn priority(&self) -> Option<&PriorityFilter> {
        self.priority.as_ref()
    }
}
