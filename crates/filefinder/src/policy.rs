// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error policies for the recoverable failure kinds
//!
//! Only per-item failures (an unparsable path, a priority group without a
//! preferred value) and the empty-result condition can be relaxed. Each
//! policy parses from the lowercase names used in configuration files and on
//! the command line.

use std::fmt;
use std::str::FromStr;

use diagnostics::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do with a collected path that does not match the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OnParseError {
    #[default]
    Raise,
    Warn,
    Ignore,
}

/// What to do when no path was collected for any search pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OnEmpty {
    #[default]
    Raise,
    Warn,
    Allow,
}

/// What to do with a priority group that holds none of the preferred values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OnMissing {
    #[default]
    Raise,
    Warn,
    Ignore,
}

fn unknown_value(option: &str, value: &str, accepted: &str) -> Error {
    Error::invalid_query(format!(
        "Unknown value for '{}': '{}'. Must be one of {}.",
        option, value, accepted
    ))
}

impl FromStr for OnParseError {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(OnParseError::Raise),
            "warn" => Ok(OnParseError::Warn),
            "ignore" => Ok(OnParseError::Ignore),
            _ => Err(unknown_value(
                "on_parse_error",
                s,
                "'raise', 'warn' or 'ignore'",
            )),
        }
    }
}

impl FromStr for OnEmpty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(OnEmpty::Raise),
            "warn" => Ok(OnEmpty::Warn),
            "allow" => Ok(OnEmpty::Allow),
            _ => Err(unknown_value("on_empty", s, "'raise', 'warn' or 'allow'")),
        }
    }
}

impl FromStr for OnMissing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(OnMissing::Raise),
            "error" => {
                warn!("on_missing value 'error' has been renamed to 'raise'");
                Ok(OnMissing::Raise)
            }
            "warn" => Ok(OnMissing::Warn),
            "ignore" => Ok(OnMissing::Ignore),
            _ => Err(unknown_value(
                "on_missing",
                s,
                "'raise', 'warn' or 'ignore'",
            )),
        }
    }
}

impl TryFrom<String> for OnParseError {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<String> for OnEmpty {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<String> for OnMissing {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for OnParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnParseError::Raise => "raise",
            OnParseError::Warn => "warn",
            OnParseError::Ignore => "ignore",
        })
    }
}

impl fmt::Display for OnEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnEmpty::Raise => "raise",
            OnEmpty::Warn => "warn",
            OnEmpty::Allow => "allow",
        })
    }
}

impl fmt::Display for OnMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnMissing::Raise => "raise",
            OnMissing::Warn => "warn",
            OnMissing::Ignore => "ignore",
        })
    }
}
