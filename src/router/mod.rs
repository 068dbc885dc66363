pub use matcher::MatchResult;
pub use params::{Params, UrlParam};
pub use route::Route;

use tracing::{debug, info};

use crate::{
    error::{self, ApiError, RouterError},
    request::Request,
    response_writer::ResponseWriter,
    server::{Handler, HttpMethod},
};

mod matcher;
mod params;
mod route;
mod segment;

/// Path-template router.
///
/// Patterns are slash-separated literals and `{name}:regex` parameters, e.g.
/// `/reminders/{id}:^[0-9]+$`. Routes are registered at startup and only
/// read afterwards, so a built router can serve any number of threads.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// Fails if a parameter regex does not compile or a parameter name is
    /// used twice in the pattern.
    pub fn add_route(
        &mut self,
        method: HttpMethod,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        let route = Route::new(method, pattern, Box::new(handler))?;
        info!(%method, pattern = route.pattern(), "route registered");
        self.routes.push(route);
        Ok(())
    }

    pub fn get(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        self.add_route(HttpMethod::Get, pattern, handler)
    }

    pub fn post(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        self.add_route(HttpMethod::Post, pattern, handler)
    }

    pub fn put(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        self.add_route(HttpMethod::Put, pattern, handler)
    }

    pub fn patch(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        self.add_route(HttpMethod::Patch, pattern, handler)
    }

    pub fn delete(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Handler + Send + Sync + 'static,
    ) -> Result<(), RouterError> {
        self.add_route(HttpMethod::Delete, pattern, handler)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find(&self, method: &str, path: &str) -> MatchResult<'_> {
        matcher::find(&self.routes, method, path)
    }

    /// Runs the handler of the matching route, or answers 404.
    pub fn dispatch(&self, w: &mut ResponseWriter, r: &mut Request) {
        let path = r.get_path().into_owned();
        match self.find(r.get_http_method(), &path) {
            MatchResult::Matched(route, params) => {
                debug!(pattern = route.pattern(), "match");
                if !params.is_empty() {
                    r.set_params(params);
                }
                route.handler().handle(w, r);
            }
            MatchResult::NoMatch => {
                debug!("no match");
                error::send_error(w, &ApiError::not_found());
            }
        }
    }
}

impl Handler for Router {
    fn handle(&self, w: &mut ResponseWriter, r: &mut Request) {
        self.dispatch(w, r);
    }
}
