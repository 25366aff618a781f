// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while compiling templates, discovering paths and
/// manipulating metadata tables
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed placeholder, reserved field name or bad format hint
    #[error("Invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A name was built without a value for one of its fields
    #[error("Missing value for field '{field}' in template '{template}'")]
    MissingField { field: String, template: String },

    /// A path did not match the grammar of its template
    #[error(
        "Could not parse '{path}' with the pattern '{pattern}' - are there contradictory values?"
    )]
    ParseFailure { path: String, pattern: String },

    /// No path matched any of the expanded search patterns
    #[error(
        "Found no files matching criteria. Tried the following pattern(s):{}",
        list_patterns(.patterns)
    )]
    EmptyResult { patterns: Vec<String> },

    /// Two rows carry the same metadata
    #[error(
        "This query leads to non-unique metadata. Please adjust your query.\nFirst duplicates:\n{}",
        .duplicates.join("\n")
    )]
    NonUniqueMetadata { duplicates: Vec<String> },

    /// More than one row of a group carries the selected priority value
    #[error("Found more than one `{column} == '{value}'` for\n{group}")]
    AmbiguousPriorityMatch {
        column: String,
        value: String,
        group: String,
    },

    /// No row of a group carries any value of the priority order
    #[error("Did not find any element from the priority list for\n{group}")]
    MissingPriorityMatch { group: String },

    /// Unknown policy value, unknown column or otherwise malformed arguments
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration file could not be decoded
    #[error("Configuration error: {0}")]
    Config(String),

    /// A post-condition that should hold by construction was violated
    #[error("Internal error: {0}")]
    Internal(String),

    /// Grammar construction or execution failed
    #[error("Regex error: {0}")]
    Regex(#[from] fancy_regex::Error),

    /// IO error from a path provider
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn list_patterns(patterns: &[String]) -> String {
    patterns
        .iter()
        .map(|pattern| format!("\n- '{}'", pattern))
        .collect()
}

impl Error {
    pub fn invalid_template<T: AsRef<str>, R: Into<String>>(template: T, reason: R) -> Self {
        Error::InvalidTemplate {
            template: template.as_ref().to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing_field<F: AsRef<str>, T: AsRef<str>>(field: F, template: T) -> Self {
        Error::MissingField {
            field: field.as_ref().to_string(),
            template: template.as_ref().to_string(),
        }
    }

    pub fn parse_failure<P: AsRef<str>, T: AsRef<str>>(path: P, pattern: T) -> Self {
        Error::ParseFailure {
            path: path.as_ref().to_string(),
            pattern: pattern.as_ref().to_string(),
        }
    }

    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        Error::InvalidQuery(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
