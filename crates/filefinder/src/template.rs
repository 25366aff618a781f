// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Template compilation
//!
//! A template is literal text interleaved with `{name}` or `{name:hint}`
//! placeholders; `{{` and `}}` stand for literal braces. Compiling a template
//! yields three artifacts:
//!
//! - the distinct field names in first-occurrence order,
//! - the construction form (format hints stripped) used to build names,
//! - a grammar that matches candidate paths and captures one value per field.
//!
//! A field may appear more than once. The grammar then requires every
//! occurrence to capture the identical text: the first occurrence is a named
//! group and later occurrences are backreferences to it, so a candidate like
//! `ab_cd` never matches `{x}_{x}`.

use std::fmt;
use std::sync::LazyLock;

use diagnostics::*;
use regex::Regex;

use crate::error::{Error, Result};

/// Names that collide with the control arguments of a discovery call
pub const RESERVED_NAMES: &[&str] = &["keys", "on_parse_error", "on_empty", "_allow_empty"];

/// `{{`, `}}`, a placeholder, or a stray brace
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap()
});

static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z0-9_]+$").unwrap()
});

static HINT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^(\d+)?([dlwWSx])?$").unwrap()
});

/// Character class a format hint narrows a placeholder to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Any,
    /// `d`
    Digits,
    /// `l`
    Letters,
    /// `w`
    Word,
    /// `W`
    NonWord,
    /// `S`
    NonSpace,
    /// `x`
    Hex,
}

impl CharClass {
    fn regex(self) -> &'static str {
        match self {
            CharClass::Any => ".",
            CharClass::Digits => "[0-9]",
            CharClass::Letters => "[a-zA-Z]",
            CharClass::Word => "[a-zA-Z0-9_]",
            CharClass::NonWord => "[^a-zA-Z0-9_]",
            CharClass::NonSpace => r"\S",
            CharClass::Hex => "[0-9a-fA-F]",
        }
    }
}

/// The `spec` part of `{name:spec}`
///
/// Hints only change what a placeholder accepts while matching. They never
/// change the identity of the field, and they are dropped from the
/// construction form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatHint {
    raw: String,
    width: Option<usize>,
    class: CharClass,
}

impl FormatHint {
    /// Parse `[width][type]`; `None` when the spec is not understood
    pub fn parse(spec: &str) -> Option<Self> {
        let caps = HINT.captures(spec)?;
        let width = match caps.get(1) {
            Some(m) => Some(m.as_str().parse::<usize>().ok().filter(|w| *w > 0)?),
            None => None,
        };
        let class = match caps.get(2).map(|m| m.as_str()) {
            None => CharClass::Any,
            Some("d") => CharClass::Digits,
            Some("l") => CharClass::Letters,
            Some("w") => CharClass::Word,
            Some("W") => CharClass::NonWord,
            Some("S") => CharClass::NonSpace,
            Some("x") => CharClass::Hex,
            Some(_) => return None,
        };
        Some(Self {
            raw: spec.to_string(),
            width,
            class,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    #[must_use]
    pub fn class(&self) -> CharClass {
        self.class
    }

    fn regex(&self) -> String {
        let class = self.class.regex();
        match (self.width, self.class) {
            (Some(width), _) => format!("{}{{{}}}", class, width),
            (None, CharClass::Any) => format!("{}+?", class),
            (None, _) => format!("{}+", class),
        }
    }
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field {
        name: String,
        hint: Option<FormatHint>,
    },
}

/// Split a template into literal and placeholder segments
///
/// Adjacent literal pieces (including unescaped braces) are merged.
pub fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in TOKEN.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        literal.push_str(&template[last..whole.start()]);
        last = whole.end();

        match whole.as_str() {
            "{{" => literal.push('{'),
            "}}" => literal.push('}'),
            "{" | "}" => {
                return Err(Error::invalid_template(
                    template,
                    format!("unbalanced '{}' at offset {}", whole.as_str(), whole.start()),
                ));
            }
            _ => {
                let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let (name, spec) = match inner.split_once(':') {
                    Some((name, spec)) => (name, Some(spec)),
                    None => (inner, None),
                };

                if name.is_empty() {
                    return Err(Error::invalid_template(
                        template,
                        "anonymous placeholders are not supported",
                    ));
                }
                if !FIELD_NAME.is_match(name) {
                    return Err(Error::invalid_template(
                        template,
                        format!("'{}' is not a valid placeholder name", name),
                    ));
                }
                if RESERVED_NAMES.contains(&name) {
                    return Err(Error::invalid_template(
                        template,
                        format!("'{}' is not a valid placeholder", name),
                    ));
                }

                let hint = match spec {
                    None | Some("") => None,
                    Some(spec) => Some(FormatHint::parse(spec).ok_or_else(|| {
                        Error::invalid_template(
                            template,
                            format!("unsupported format spec '{}' for '{}'", spec, name),
                        )
                    })?),
                };

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field {
                    name: name.to_string(),
                    hint,
                });
            }
        }
    }

    literal.push_str(&template[last..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn distinct_names(segments: &[Segment]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in segments {
        if let Segment::Field { name, .. } = segment
            && !names.contains(name)
        {
            names.push(name.clone());
        }
    }
    names
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

fn construction_form(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => escape_braces(text),
            Segment::Field { name, .. } => format!("{{{}}}", name),
        })
        .collect()
}

/// Distinct field names of `template`, in first-occurrence order
pub fn extract_field_names(template: &str) -> Result<Vec<String>> {
    Ok(distinct_names(&parse_template(template)?))
}

/// Replace every `{name:spec}` by `{name}`, leaving literal text untouched
pub fn strip_format_hints(template: &str) -> Result<String> {
    Ok(construction_form(&parse_template(template)?))
}

/// Build the matching grammar of `template`
pub fn compile_matcher(template: &str) -> Result<Grammar> {
    let segments = parse_template(template)?;
    let fields = distinct_names(&segments);
    Grammar::new(&segments, &fields)
}

/// Backtracking steps allowed for one candidate before it counts as a mismatch
const BACKTRACK_LIMIT: usize = 10_000_000;

/// Compiled matcher for one template
///
/// Group `f{i}` captures the value of field `i` (distinct-field order).
/// Placeholders match any character, newlines included.
#[derive(Debug, Clone)]
pub struct Grammar {
    regex: fancy_regex::Regex,
    field_count: usize,
}

impl Grammar {
    fn new(segments: &[Segment], fields: &[String]) -> Result<Self> {
        let mut source = String::from("(?s)^");
        let mut seen = vec![false; fields.len()];

        for segment in segments {
            match segment {
                Segment::Literal(text) => source.push_str(&fancy_regex::escape(text)),
                Segment::Field { name, hint } => {
                    let idx = fields
                        .iter()
                        .position(|f| f == name)
                        .ok_or_else(|| Error::internal(format!("unregistered field '{}'", name)))?;
                    if seen[idx] {
                        source.push_str(&format!(r"\k<f{}>", idx));
                    } else {
                        seen[idx] = true;
                        let body = hint
                            .as_ref()
                            .map(FormatHint::regex)
                            .unwrap_or_else(|| ".+?".to_string());
                        source.push_str(&format!("(?P<f{}>{})", idx, body));
                    }
                }
            }
        }
        source.push('$');

        let regex = fancy_regex::RegexBuilder::new(&source)
            .backtrack_limit(BACKTRACK_LIMIT)
            .build()?;
        Ok(Self {
            regex,
            field_count: fields.len(),
        })
    }

    /// Values for every distinct field, or `None` if `candidate` does not match
    pub fn captures(&self, candidate: &str) -> Result<Option<Vec<String>>> {
        let caps = match self.regex.captures(candidate) {
            Ok(Some(caps)) => caps,
            Ok(None) => return Ok(None),
            Err(err) => return gave_up(candidate, err).map(|()| None),
        };
        let mut values = Vec::with_capacity(self.field_count);
        for idx in 0..self.field_count {
            let value = caps
                .name(&format!("f{}", idx))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| Error::internal(format!("group f{} did not participate", idx)))?;
            values.push(value);
        }
        Ok(Some(values))
    }

    pub fn is_match(&self, candidate: &str) -> Result<bool> {
        match self.regex.is_match(candidate) {
            Ok(matched) => Ok(matched),
            Err(err) => gave_up(candidate, err).map(|()| false),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// A candidate that exhausts the backtracking budget is treated as a mismatch
fn gave_up(candidate: &str, err: fancy_regex::Error) -> Result<()> {
    match err {
        fancy_regex::Error::RuntimeError(fancy_regex::RuntimeError::BacktrackLimitExceeded) => {
            debug!(
                "Backtrack limit exceeded while matching {candidate}",
                candidate: candidate
            );
            Ok(())
        }
        err => Err(err.into()),
    }
}

/// Immutable compiled form of a template
///
/// Built once per finder and shared by every query against it.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pattern: String,
    segments: Vec<Segment>,
    fields: Vec<String>,
    construction: String,
    grammar: Grammar,
}

impl CompiledTemplate {
    pub fn compile<S: Into<String>>(pattern: S) -> Result<Self> {
        let pattern = pattern.into();
        let segments = parse_template(&pattern)?;
        let fields = distinct_names(&segments);
        let construction = construction_form(&segments);
        let grammar = Grammar::new(&segments, &fields)?;

        Ok(Self {
            pattern,
            segments,
            fields,
            construction,
            grammar,
        })
    }

    /// The template as written
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Distinct field names in first-occurrence order
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// The template with format hints stripped
    #[must_use]
    pub fn construction_form(&self) -> &str {
        &self.construction
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

impl fmt::Display for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field_names_first_occurrence_order() {
        let names = extract_field_names("/data/{model}/{year}/{model}_{var:l}.nc").unwrap();
        assert_eq!(names, vec!["model", "year", "var"]);
    }

    #[test]
    fn test_reserved_names_rejected() {
        for name in RESERVED_NAMES {
            let template = format!("/root/{{{}}}", name);
            assert!(matches!(
                CompiledTemplate::compile(template),
                Err(Error::InvalidTemplate { .. })
            ));
        }
    }

    #[test]
    fn test_anonymous_placeholder_rejected() {
        let err = extract_field_names("a/{}/b").unwrap_err();
        assert!(err.to_string().contains("anonymous"));
        assert!(extract_field_names("a/{:d}/b").is_err());
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(extract_field_names("a/{b").is_err());
        assert!(extract_field_names("a/b}").is_err());
        assert!(extract_field_names("a/{b.c}").is_err());
    }

    #[test]
    fn test_unknown_format_spec_rejected() {
        assert!(matches!(
            CompiledTemplate::compile("{a:q}"),
            Err(Error::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_strip_format_hints() {
        assert_eq!(
            strip_format_hints("{path:l}_{pattern:2d}_{no_fmt}/").unwrap(),
            "{path}_{pattern}_{no_fmt}/"
        );
        assert_eq!(
            strip_format_hints("{file}_{pattern:2d}").unwrap(),
            "{file}_{pattern}"
        );
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let tpl = CompiledTemplate::compile("{{x}}_{a}").unwrap();
        assert_eq!(tpl.fields(), &["a".to_string()]);
        assert_eq!(tpl.construction_form(), "{{x}}_{a}");
        assert_eq!(
            tpl.grammar().captures("{x}_1").unwrap(),
            Some(vec!["1".to_string()])
        );
    }

    #[test]
    fn test_repeated_field_requires_identical_values() {
        let grammar = compile_matcher("{x}_{x}").unwrap();
        assert_eq!(
            grammar.captures("ab_ab").unwrap(),
            Some(vec!["ab".to_string()])
        );
        assert_eq!(grammar.captures("ab_cd").unwrap(), None);
    }

    #[test]
    fn test_repeated_field_backtracks_to_consistent_split() {
        let grammar = compile_matcher("{x}_{x}").unwrap();
        assert_eq!(
            grammar.captures("a_b_a_b").unwrap(),
            Some(vec!["a_b".to_string()])
        );
    }

    #[test]
    fn test_literal_text_matched_verbatim() {
        let grammar = compile_matcher("/data/{model}.v1+/{year}.csv").unwrap();
        assert_eq!(
            grammar.captures("/data/X.v1+/2020.csv").unwrap(),
            Some(vec!["X".to_string(), "2020".to_string()])
        );
        assert_eq!(grammar.captures("/data/X.v11/2020.csv").unwrap(), None);
        assert_eq!(grammar.captures("/data/X.v1+/2020xcsv").unwrap(), None);
    }

    #[test]
    fn test_format_hints_narrow_matching() {
        let grammar = compile_matcher("{letters:l}{num:d}_{beg:2}{end}").unwrap();
        assert_eq!(
            grammar.captures("ab200_aicdef").unwrap(),
            Some(vec![
                "ab".to_string(),
                "200".to_string(),
                "ai".to_string(),
                "cdef".to_string()
            ])
        );
        assert_eq!(grammar.captures("a1b_xyz").unwrap(), None);
    }

    #[test]
    fn test_format_hint_parts() {
        let hint = FormatHint::parse("4d").unwrap();
        assert_eq!(hint.width(), Some(4));
        assert_eq!(hint.class(), CharClass::Digits);
        assert_eq!(hint.as_str(), "4d");

        let hint = FormatHint::parse("l").unwrap();
        assert_eq!((hint.width(), hint.class()), (None, CharClass::Letters));
        assert_eq!(FormatHint::parse("0d"), None);
    }

    #[test]
    fn test_placeholders_match_newlines() {
        let tpl = CompiledTemplate::compile("{a}/{b}.nc").unwrap();
        assert_eq!(
            tpl.grammar().captures("x\ny/tas.nc").unwrap(),
            Some(vec!["x\ny".to_string(), "tas".to_string()])
        );
    }

    #[test]
    fn test_fixed_width_digits() {
        let grammar = compile_matcher("{year:4d}{month:2d}").unwrap();
        assert_eq!(
            grammar.captures("202001").unwrap(),
            Some(vec!["2020".to_string(), "01".to_string()])
        );
        assert!(!grammar.is_match("20201").unwrap());
    }

    #[test]
    fn test_hint_does_not_change_field_identity() {
        let tpl = CompiledTemplate::compile("{a:d}/{a}").unwrap();
        assert_eq!(tpl.fields(), &["a".to_string()]);
        assert_eq!(tpl.construction_form(), "{a}/{a}");
        assert!(tpl.grammar().is_match("12/12").unwrap());
        assert!(!tpl.grammar().is_match("12/13").unwrap());
    }

    #[test]
    fn test_template_without_fields() {
        let tpl = CompiledTemplate::compile("/static/file.txt").unwrap();
        assert!(tpl.fields().is_empty());
        assert_eq!(tpl.grammar().captures("/static/file.txt").unwrap(), Some(vec![]));
    }
}
