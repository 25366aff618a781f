// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Wildcard patterns as produced by query expansion
//!
//! A search pattern is split on `/` into components. A component holding
//! `*` is split further into the literal segments between wildcards, which
//! must appear in order; `*` matches any run of characters within one
//! component and never crosses a separator.

use crate::query::WILDCARD;

/// Path separator used by templates and search patterns
pub const SEPARATOR: char = '/';

/// One `/`-delimited component of a search pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardComponent {
    /// A component with no wildcards
    Normal(String),
    /// Literal segments separated by wildcards
    ///
    /// - `*` -> `["", ""]`
    /// - `file*.txt` -> `["file", ".txt"]`
    /// - `*_x_*` -> `["", "_x_", ""]`
    Wildcard { segments: Vec<String> },
}

impl WildcardComponent {
    #[must_use]
    pub fn parse(component: &str) -> Self {
        if component.contains(WILDCARD) {
            WildcardComponent::Wildcard {
                segments: component.split(WILDCARD).map(str::to_string).collect(),
            }
        } else {
            WildcardComponent::Normal(component.to_string())
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, WildcardComponent::Wildcard { .. })
    }

    /// Whether a glob over this component should list hidden entries
    #[must_use]
    pub fn matches_hidden(&self) -> bool {
        match self {
            WildcardComponent::Normal(name) => name.starts_with('.'),
            WildcardComponent::Wildcard { segments } => {
                segments.first().is_some_and(|s| s.starts_with('.'))
            }
        }
    }

    /// Check if this component matches the given name
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, name: S) -> bool {
        let name = name.as_ref();
        match self {
            WildcardComponent::Normal(literal) => name == literal,
            WildcardComponent::Wildcard { segments } => match_segments(segments, name),
        }
    }
}

/// Match `name` against literal segments separated by wildcards
///
/// Interior segments are placed at their leftmost occurrence; that choice
/// never loses a match because the wildcards around them absorb any text.
fn match_segments(segments: &[String], name: &str) -> bool {
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return name.is_empty();
    };
    if segments.len() == 1 {
        return name == first;
    }
    if name.len() < first.len() + last.len()
        || !name.starts_with(first.as_str())
        || !name.ends_with(last.as_str())
    {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for segment in &segments[1..segments.len() - 1] {
        match rest.find(segment.as_str()) {
            Some(at) => rest = &rest[at + segment.len()..],
            None => return false,
        }
    }
    true
}

/// A full search pattern, one entry per `/`-delimited component
///
/// A leading `/` yields an empty first component and a trailing `/` an
/// empty last one, so absolute and directory-level patterns round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    components: Vec<WildcardComponent>,
}

impl SearchPattern {
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        Self {
            components: pattern.split(SEPARATOR).map(WildcardComponent::parse).collect(),
        }
    }

    #[must_use]
    pub fn components(&self) -> &[WildcardComponent] {
        &self.components
    }

    /// Match a candidate component by component
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let parts: Vec<&str> = candidate.split(SEPARATOR).collect();
        parts.len() == self.components.len()
            && self
                .components
                .iter()
                .zip(parts)
                .all(|(component, part)| component.matches(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_exact() {
        let comp = WildcardComponent::parse("file.txt");
        assert!(comp.matches("file.txt"));
        assert!(!comp.matches("other.txt"));
    }

    #[test]
    fn test_match_wildcard() {
        let comp = WildcardComponent::parse("file*.txt");
        assert_eq!(
            comp,
            WildcardComponent::Wildcard {
                segments: vec!["file".to_string(), ".txt".to_string()]
            }
        );
        assert!(comp.matches("file1.txt"));
        assert!(comp.matches("file.txt"));
        assert!(!comp.matches("other.txt"));
    }

    #[test]
    fn test_match_needs_backtracking() {
        // the first "_x" is not the one the suffix anchors to
        let comp = WildcardComponent::parse("*_x");
        assert!(comp.matches("a_x_x"));
        let comp = WildcardComponent::parse("*_*_*");
        assert!(comp.matches("a_b_c"));
        assert!(comp.matches("a__"));
        assert!(!comp.matches("a_b"));
    }

    #[test]
    fn test_prefix_and_suffix_do_not_overlap() {
        let comp = WildcardComponent::parse("ab*ba");
        assert!(!comp.matches("aba"));
        assert!(comp.matches("abba"));
    }

    #[test]
    fn test_star_matches_everything_in_component() {
        let comp = WildcardComponent::parse("*");
        assert!(comp.matches(""));
        assert!(comp.matches("anything"));
    }

    #[test]
    fn test_hidden() {
        assert!(!WildcardComponent::parse("*").matches_hidden());
        assert!(WildcardComponent::parse(".*").matches_hidden());
    }

    #[test]
    fn test_search_pattern_does_not_cross_separator() {
        let pattern = SearchPattern::parse("*/foo/*");
        assert!(pattern.matches("a1/foo/file"));
        assert!(!pattern.matches("a1/b/foo/file"));
        assert!(!pattern.matches("a1/foo"));
    }

    #[test]
    fn test_search_pattern_absolute_and_directory() {
        let pattern = SearchPattern::parse("/root/*/");
        let wildcards: Vec<bool> = pattern
            .components()
            .iter()
            .map(WildcardComponent::is_wildcard)
            .collect();
        assert_eq!(wildcards, vec![false, false, true, false]);
        assert!(pattern.matches("/root/a/"));
        assert!(!pattern.matches("/root/a"));
        assert!(!pattern.matches("root/a/"));
    }
}
