//! Request routing.
//!
//! One transition per request: the verb is checked first, then the path is
//! matched exactly against a fixed table.

use axum::http::Method;
use se4_health::ReportMode;

use crate::error::ApiError;

pub const CONFIG_PATH: &str = "/service/config";
pub const STATUS_PATH: &str = "/service/status";
pub const HEALTHCHECK_PATH: &str = "/service/healthcheck";
pub const GTG_PATH: &str = "/service/healthcheck/gtg";
pub const ASG_PATH: &str = "/service/healthcheck/asg";

/// What a request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Static build metadata.
    Config,
    /// Build metadata plus a live system snapshot.
    Status,
    /// Full JSON report over every test.
    Healthcheck,
    /// Plain-text token over one view.
    Token(ReportMode),
}

impl Route {
    /// Resolve a request line to a route, or to the error it should produce.
    pub fn resolve(method: &Method, path: &str) -> Result<Route, ApiError> {
        if method != Method::GET {
            return Err(ApiError::MethodNotAllowed(method.clone()));
        }

        match path {
            CONFIG_PATH => Ok(Route::Config),
            STATUS_PATH => Ok(Route::Status),
            HEALTHCHECK_PATH => Ok(Route::Healthcheck),
            GTG_PATH => Ok(Route::Token(ReportMode::GtgOnly)),
            ASG_PATH => Ok(Route::Token(ReportMode::AsgOnly)),
            other => Err(ApiError::NotFound(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_routes_resolve() {
        let cases = [
            (CONFIG_PATH, Route::Config),
            (STATUS_PATH, Route::Status),
            (HEALTHCHECK_PATH, Route::Healthcheck),
            (GTG_PATH, Route::Token(ReportMode::GtgOnly)),
            (ASG_PATH, Route::Token(ReportMode::AsgOnly)),
        ];
        for (path, expected) in cases {
            assert_eq!(Route::resolve(&Method::GET, path).unwrap(), expected, "{path}");
        }
    }

    #[test]
    fn non_get_is_rejected_on_every_path() {
        for path in [CONFIG_PATH, ASG_PATH, "/service/unknown", "/"] {
            let err = Route::resolve(&Method::POST, path).unwrap_err();
            assert!(matches!(err, ApiError::MethodNotAllowed(m) if m == Method::POST));
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        let err = Route::resolve(&Method::GET, "/service/nope").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(p) if p == "/service/nope"));
    }

    #[test]
    fn matching_is_exact() {
        for path in ["/service/config/", "/service/healthcheck/asg/x", "/SERVICE/config"] {
            assert!(matches!(
                Route::resolve(&Method::GET, path),
                Err(ApiError::NotFound(_))
            ));
        }
    }
}
