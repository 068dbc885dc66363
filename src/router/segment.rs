use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RouterError;

lazy_static! {
    static ref PARAM_EXPR: Regex =
        Regex::new(r"^\{([a-z]+)\}:(.+)$").expect("parameter expression regex is valid");
}

/// One slash-delimited component of a route pattern.
#[derive(Debug, Clone)]
pub enum PathSegment {
    Literal(String),
    Param(ParamSpec),
}

/// A named, regex-constrained segment written as `{name}:regex`.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: String,
    regex: Regex,
    position: usize,
}

impl ParamSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Un-anchored: a match anywhere inside the segment is enough.
    /// Patterns that need the whole segment must carry `^...$` themselves.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Splits a path on `/`, dropping empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.trim().is_empty()).collect()
}

/// Parses a route pattern into its segments.
///
/// Segments that are not well-formed `{name}:regex` expressions, such as
/// `{id}` or `{id}:`, are kept as literals.
pub fn parse(pattern: &str) -> Result<Vec<PathSegment>, RouterError> {
    let mut seen = HashSet::new();
    split_path(pattern)
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            let Some(caps) = PARAM_EXPR.captures(raw) else {
                return Ok(PathSegment::Literal(raw.to_owned()));
            };
            let name = caps[1].to_owned();
            if !seen.insert(name.clone()) {
                return Err(RouterError::DuplicateParam {
                    pattern: pattern.to_owned(),
                    name,
                });
            }
            let regex = Regex::new(&caps[2]).map_err(|source| RouterError::InvalidRegex {
                pattern: pattern.to_owned(),
                name: name.clone(),
                source,
            })?;
            Ok(PathSegment::Param(ParamSpec {
                name,
                regex,
                position,
            }))
        })
        .collect()
}
