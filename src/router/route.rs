use std::fmt;

use crate::{error::RouterError, server::Handler, server::HttpMethod};

use super::{
    params::{Params, UrlParam},
    segment::{self, PathSegment},
};

/// A registered (method, pattern, handler) triple. Immutable once built.
pub struct Route {
    method: HttpMethod,
    pattern: String,
    segments: Vec<PathSegment>,
    handler: Box<dyn Handler + Send + Sync>,
}

impl Route {
    pub(crate) fn new(
        method: HttpMethod,
        pattern: impl Into<String>,
        handler: Box<dyn Handler + Send + Sync>,
    ) -> Result<Self, RouterError> {
        let pattern = pattern.into();
        let segments = segment::parse(&pattern)?;
        Ok(Self {
            method,
            pattern,
            segments,
            handler,
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Param(spec) => Some(spec.name()),
            PathSegment::Literal(_) => None,
        })
    }

    pub(crate) fn handler(&self) -> &(dyn Handler + Send + Sync) {
        self.handler.as_ref()
    }

    /// Compares the template with the segments of a request path.
    ///
    /// Literals must be equal, parameters must match their regex. The
    /// extracted values go into a new snapshot, the route itself is never
    /// written to.
    pub fn match_segments(&self, path_segments: &[&str]) -> Option<Params> {
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::default();
        for (template, value) in self.segments.iter().zip(path_segments) {
            match template {
                PathSegment::Literal(literal) => {
                    if literal != value {
                        return None;
                    }
                }
                PathSegment::Param(spec) => {
                    if !spec.is_match(value) {
                        return None;
                    }
                    params.insert(UrlParam {
                        name: spec.name().to_owned(),
                        value: (*value).to_owned(),
                        position: spec.position(),
                    });
                }
            }
        }
        Some(params)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
