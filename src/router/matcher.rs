use std::str::FromStr;

use crate::server::HttpMethod;

use super::{params::Params, route::Route, segment::split_path};

#[derive(Debug)]
pub enum MatchResult<'r> {
    Matched(&'r Route, Params),
    NoMatch,
}

impl<'r> MatchResult<'r> {
    pub fn route(&self) -> Option<&'r Route> {
        match self {
            Self::Matched(route, _) => Some(route),
            Self::NoMatch => None,
        }
    }

    pub fn params(&self) -> Option<&Params> {
        match self {
            Self::Matched(_, params) => Some(params),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(..))
    }
}

/// Finds the route serving `method` and `path`.
///
/// Every route is tried. When several match, the one registered last wins.
pub fn find<'r>(routes: &'r [Route], method: &str, path: &str) -> MatchResult<'r> {
    let Ok(method) = HttpMethod::from_str(method) else {
        return MatchResult::NoMatch;
    };
    let path_segments = split_path(path);

    routes
        .iter()
        .rev()
        .filter(|route| route.method() == method)
        .find_map(|route| {
            route
                .match_segments(&path_segments)
                .map(|params| MatchResult::Matched(route, params))
        })
        .unwrap_or(MatchResult::NoMatch)
}

#[cfg(test)]
mod tests {
    use crate::{
        router::route::Route,
        server::{noop_handler, HttpMethod},
    };

    use super::{find, MatchResult};

    fn routes(specs: &[(HttpMethod, &str)]) -> Vec<Route> {
        specs
            .iter()
            .map(|(method, pattern)| Route::new(*method, *pattern, Box::new(noop_handler())).unwrap())
            .collect()
    }

    fn matched_pattern<'r>(m: &MatchResult<'r>) -> Option<&'r str> {
        m.route().map(|route| route.pattern())
    }

    #[test]
    fn test_find_param_route() {
        let routes = routes(&[(HttpMethod::Get, "/reminders/{id}:[0-9]+")]);

        let m = find(&routes, "GET", "/reminders/42");
        assert_eq!(matched_pattern(&m), Some("/reminders/{id}:[0-9]+"));
        assert_eq!(m.params().unwrap().get("id"), Some("42"));

        assert!(!find(&routes, "GET", "/reminders/abc").is_match());
    }

    #[test]
    fn test_find_method() {
        let routes = routes(&[(HttpMethod::Get, "/reminders/{id}:[0-9]+")]);
        assert!(find(&routes, "get", "/reminders/42").is_match());
        assert!(!find(&routes, "DELETE", "/reminders/42").is_match());
        assert!(!find(&routes, "OPTIONS", "/reminders/42").is_match());
        assert!(!find(&routes, "", "/reminders/42").is_match());
    }

    #[test]
    fn test_find_root() {
        let routes = routes(&[(HttpMethod::Get, "/")]);
        let m = find(&routes, "GET", "/");
        assert_eq!(matched_pattern(&m), Some("/"));
        assert!(m.params().unwrap().is_empty());
        assert!(!find(&routes, "GET", "/health").is_match());
    }

    #[test]
    fn test_find_slashes_are_insignificant() {
        let routes = routes(&[(HttpMethod::Get, "/reminders/{id}:[0-9]+/")]);
        assert!(find(&routes, "GET", "/reminders/42").is_match());
        assert!(find(&routes, "GET", "/reminders/42/").is_match());
        assert!(find(&routes, "GET", "reminders//42").is_match());
    }

    #[test]
    fn test_find_literal_beats_constrained_param() {
        for param in ["/reminders/{id}:[0-9]+", "/reminders/{id}:^[0-9]+$"] {
            let routes = routes(&[
                (HttpMethod::Get, param),
                (HttpMethod::Get, "/reminders/health"),
            ]);
            let m = find(&routes, "GET", "/reminders/health");
            assert_eq!(matched_pattern(&m), Some("/reminders/health"));
            assert!(m.params().unwrap().is_empty());

            let m = find(&routes, "GET", "/reminders/7");
            assert_eq!(matched_pattern(&m), Some(param));
            assert_eq!(m.params().unwrap().get("id"), Some("7"));
        }
    }

    #[test]
    fn test_find_unanchored_regex_matches_substring() {
        let routes = routes(&[(HttpMethod::Get, "/reminders/{id}:[0-9]+")]);
        let m = find(&routes, "GET", "/reminders/a7b");
        assert_eq!(m.params().unwrap().get("id"), Some("a7b"));
        assert!(!find(&routes, "GET", "/reminders/health").is_match());
    }

    // Two routes that both match a path: registration order decides, not
    // specificity.
    #[test]
    fn test_find_last_registered_wins() {
        let literal_last = routes(&[
            (HttpMethod::Get, "/reminders/{id}:.+"),
            (HttpMethod::Get, "/reminders/health"),
        ]);
        let m = find(&literal_last, "GET", "/reminders/health");
        assert_eq!(matched_pattern(&m), Some("/reminders/health"));

        let param_last = routes(&[
            (HttpMethod::Get, "/reminders/health"),
            (HttpMethod::Get, "/reminders/{id}:.+"),
        ]);
        let m = find(&param_last, "GET", "/reminders/health");
        assert_eq!(matched_pattern(&m), Some("/reminders/{id}:.+"));
        assert_eq!(m.params().unwrap().get("id"), Some("health"));
    }

    #[test]
    fn test_find_duplicate_routes() {
        let routes = routes(&[
            (HttpMethod::Post, "/reminders"),
            (HttpMethod::Post, "/reminders"),
        ]);
        let m = find(&routes, "POST", "/reminders");
        assert!(std::ptr::eq(m.route().unwrap(), &routes[1]));
    }

    #[test]
    fn test_find_is_idempotent() {
        let routes = routes(&[
            (HttpMethod::Get, "/reminders/{ids}:^[0-9]+(,[0-9]+)*$"),
            (HttpMethod::Patch, "/reminders/{id}:^[0-9]+$"),
        ]);

        for (method, path) in [("GET", "/reminders/1,2"), ("PATCH", "/reminders/3"), ("GET", "/x")] {
            let fst = find(&routes, method, path);
            let snd = find(&routes, method, path);
            assert_eq!(fst.params(), snd.params());
            assert_eq!(
                fst.route().map(|r| r as *const _),
                snd.route().map(|r| r as *const _)
            );
        }
    }

    #[test]
    fn test_find_substituted_values() {
        let routes = routes(&[(
            HttpMethod::Put,
            "/users/{user}:^[a-z]+$/reminders/{id}:^[0-9]+$",
        )]);

        let tests = [("ada", "1"), ("grace", "20"), ("x", "999")];
        for (user, id) in tests {
            let path = format!("/users/{}/reminders/{}", user, id);
            let m = find(&routes, "PUT", &path);
            let params = m.params().unwrap();
            assert_eq!(params.get("user"), Some(user));
            assert_eq!(params.get("id"), Some(id));
        }
    }
}
