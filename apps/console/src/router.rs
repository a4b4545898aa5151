//! # Router
//!
//! Maps paths to pages.
//!
//! ```text
//!   /           ──redirect──►  /users
//!   /users      ──────────────► Users page
//!   /products   ──────────────► Products page
//!   anything else ────────────► RoutingError, current page stays
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::error::ApiError;

/// A routed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Users,
    Products,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Users, Route::Products];

    /// Resolves a path, following the `/` redirect.
    pub fn resolve(path: &str) -> Result<Route, ApiError> {
        let trimmed = path.trim();
        let normalized = match trimmed.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => trimmed,
        };
        match normalized {
            "/" | "" => Ok(Route::Users),
            "/users" => Ok(Route::Users),
            "/products" => Ok(Route::Products),
            _ => Err(ApiError::routing(trimmed)),
        }
    }

    pub const fn path(&self) -> &'static str {
        match self {
            Route::Users => "/users",
            Route::Products => "/products",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Route::Users => "Users",
            Route::Products => "Products",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Tracks the current page.
#[derive(Debug, Clone, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new(start: Route) -> Self {
        Router { current: start }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Navigates to `path`. On an unknown path the current page stays.
    pub fn navigate(&mut self, path: &str) -> Result<Route, ApiError> {
        match Route::resolve(path) {
            Ok(route) => {
                debug!(from = %self.current, to = %route, "Navigate");
                self.current = route;
                Ok(route)
            }
            Err(err) => {
                warn!(path = %path, "Unknown route");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_root_redirects_to_users() {
        assert_eq!(Route::resolve("/").unwrap(), Route::Users);
        assert_eq!(Route::resolve("").unwrap(), Route::Users);
    }

    #[test]
    fn test_known_routes() {
        assert_eq!(Route::resolve("/users").unwrap(), Route::Users);
        assert_eq!(Route::resolve("/products/").unwrap(), Route::Products);
        for route in Route::ALL {
            assert_eq!(Route::resolve(route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_unknown_route_keeps_page() {
        let mut router = Router::new(Route::Products);
        let err = router.navigate("/orders").unwrap_err();
        assert_eq!(err.code, ErrorCode::RoutingError);
        assert_eq!(router.current(), Route::Products);

        router.navigate("/").unwrap();
        assert_eq!(router.current(), Route::Users);
    }
}
