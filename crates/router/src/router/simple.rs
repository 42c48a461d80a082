use crate::router::route::{Attempt, PathRoute};
use crate::router::Routing;
use http::Method;

/// Linear-scan engine, used for small route tables.
///
/// Path routes are tested in table order. A path that matches without a method hit does not stop
/// the scan: a later route of another shape may still accept the method, so `405` is only
/// decided once every route has been tried.
#[derive(Debug)]
pub struct SimpleRouter {
    routes: Vec<PathRoute>,
}

impl SimpleRouter {
    /// `routes` must already be in table order: fixed templates first, then templates with variables.
    pub(crate) fn new(routes: Vec<PathRoute>) -> Self {
        Self { routes }
    }

    pub fn routing<'r>(&'r self, method: &Method, path: &str) -> Routing<'r> {
        scan(&self.routes, method, path)
    }

    pub fn path_routes(&self) -> &[PathRoute] {
        &self.routes
    }
}

pub(crate) fn scan<'r>(routes: &'r [PathRoute], method: &Method, path: &str) -> Routing<'r> {
    let mut path_matched = false;
    for route in routes {
        match route.attempt(method, path) {
            Attempt::Hit(route_match) => return Routing::Matched(route_match),
            Attempt::PathMatched => path_matched = true,
            Attempt::Miss => {}
        }
    }

    if path_matched { Routing::MethodNotAllowed } else { Routing::NotMatched }
}
