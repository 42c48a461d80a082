//! Route table and routing engines.
//!
//! Routes are registered on a [`RouterBuilder`] as `(path template, methods, handler)` triples.
//! [`RouterBuilder::build`] freezes them into a [`Router`], which answers every request with a
//! read-only lookup through one of two engines:
//!
//! - [`SimpleRouter`] scans the path routes in order, used for small tables
//! - [`SegmentTreeRouter`] indexes literal segments in a tree and only tests the regex of the
//!   templates that share the request's literal prefix
//!
//! Both engines give the same answer for every table and every request.
//!
//! # Examples
//!
//! ```
//! use micro_router::router::{get, post, Router, Routing};
//! use micro_router::handler_fn;
//! use http::Method;
//!
//! let mut builder = Router::builder();
//! builder
//!     .route("/users/{id}", get(handler_fn(|_req| async { "user" })))?
//!     .route("/users", post(handler_fn(|_req| async { "created" })))?;
//! let router = builder.build();
//!
//! match router.routing(&Method::GET, "/users/42") {
//!     Routing::Matched(route_match) => assert_eq!(route_match.path_variables().get_string("id"), Some("42")),
//!     _ => unreachable!(),
//! }
//! assert!(matches!(router.routing(&Method::DELETE, "/users"), Routing::MethodNotAllowed));
//! assert!(matches!(router.routing(&Method::GET, "/orders"), Routing::NotMatched));
//! # Ok::<(), micro_router::ConfigError>(())
//! ```

mod config;
mod lazy;
pub(crate) mod pattern;
mod route;
mod segment_tree;
mod simple;

pub use config::{RouterConfig, RoutingPolicy};
pub use lazy::LazyRouter;
pub use pattern::PathPattern;
pub use route::{MatchedRoute, MethodRoute, MethodSet, PathRoute, RouteDefinition};
pub use segment_tree::SegmentTreeRouter;
pub use simple::SimpleRouter;

use crate::error::ConfigError;
use crate::handler::RequestHandler;
use crate::PathVariables;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, trace};

/// The answer of a router for one request.
#[derive(Debug)]
pub enum Routing<'r> {
    /// a route accepts both the path and the method
    Matched(RouteMatch<'r>),
    /// at least one template matches the path, none of them accepts the method
    MethodNotAllowed,
    /// no template matches the path, the request belongs to the next link of the chain
    NotMatched,
}

impl Routing<'_> {
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, Routing::Matched(_))
    }
}

/// A successful match: the selected route and the variables extracted from the path.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    path_route: &'r PathRoute,
    method_route: &'r MethodRoute,
    path_variables: PathVariables,
}

impl<'r> RouteMatch<'r> {
    pub(crate) fn new(path_route: &'r PathRoute, method_route: &'r MethodRoute, path_variables: PathVariables) -> Self {
        Self { path_route, method_route, path_variables }
    }

    #[inline]
    pub fn handler(&self) -> &'r dyn RequestHandler {
        self.method_route.handler()
    }

    #[inline]
    pub fn path_route(&self) -> &'r PathRoute {
        self.path_route
    }

    #[inline]
    pub fn method_route(&self) -> &'r MethodRoute {
        self.method_route
    }

    #[inline]
    pub fn matched_route(&self) -> &'r MatchedRoute {
        self.method_route.matched_route()
    }

    #[inline]
    pub fn path_variables(&self) -> &PathVariables {
        &self.path_variables
    }

    pub fn into_path_variables(self) -> PathVariables {
        self.path_variables
    }
}

#[derive(Debug)]
enum Engine {
    Simple(SimpleRouter),
    SegmentTree(SegmentTreeRouter),
}

/// A frozen route table.
#[derive(Debug)]
pub struct Router {
    engine: Engine,
    definition_count: usize,
}

impl Router {
    /// Creates a new router builder with the default configuration
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the route for `method` and `path`.
    ///
    /// `path` must be the decoded request path without query string.
    pub fn routing<'r>(&'r self, method: &Method, path: &str) -> Routing<'r> {
        let routing = match &self.engine {
            Engine::Simple(router) => router.routing(method, path),
            Engine::SegmentTree(router) => router.routing(method, path),
        };

        match &routing {
            Routing::Matched(route_match) => trace!("{} {} matched route {}", method, path, route_match.matched_route()),
            Routing::MethodNotAllowed => trace!("{} {} matched a path but not the method", method, path),
            Routing::NotMatched => trace!("{} {} matched no route", method, path),
        }
        routing
    }

    /// The engine in use, never [`RoutingPolicy::Auto`].
    pub fn policy(&self) -> RoutingPolicy {
        match self.engine {
            Engine::Simple(_) => RoutingPolicy::Simple,
            Engine::SegmentTree(_) => RoutingPolicy::SegmentTree,
        }
    }

    /// The path routes in table order: fixed templates first, then templates with variables.
    pub fn path_routes(&self) -> &[PathRoute] {
        match &self.engine {
            Engine::Simple(router) => router.path_routes(),
            Engine::SegmentTree(router) => router.path_routes(),
        }
    }

    #[inline]
    pub fn path_route_count(&self) -> usize {
        self.path_routes().len()
    }

    /// The number of registered `(template, methods, handler)` definitions.
    #[inline]
    pub fn definition_count(&self) -> usize {
        self.definition_count
    }
}

/// Collects route definitions, then builds a [`Router`].
#[derive(Debug, Default)]
pub struct RouterBuilder {
    fixed: Vec<RouteDefinition>,
    variable: Vec<RouteDefinition>,
    config: RouterConfig,
}

macro_rules! method_route {
    ($method:ident, $method_const:ident) => {
        #[doc = concat!("Registers `handler` for `", stringify!($method_const), "` requests matching `template`.")]
        ///
        /// # Errors
        ///
        /// Returns [`ConfigError`] when `template` does not compile.
        pub fn $method<H: RequestHandler + 'static>(&mut self, template: &str, handler: H) -> Result<&mut Self, ConfigError> {
            self.add(template, [Method::$method_const], handler)
        }
    };
}

impl RouterBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `methods` on `template`; an empty method list means any method.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `template` does not compile.
    pub fn add<H, I>(&mut self, template: &str, methods: I, handler: H) -> Result<&mut Self, ConfigError>
    where
        H: RequestHandler + 'static,
        I: IntoIterator<Item = Method>,
    {
        self.add_definition(template, MethodSet::from_methods(methods), Arc::new(handler))
    }

    method_route!(get, GET);
    method_route!(post, POST);
    method_route!(put, PUT);
    method_route!(patch, PATCH);
    method_route!(delete, DELETE);
    method_route!(head, HEAD);
    method_route!(options, OPTIONS);

    /// Registers `handler` for every method on `template`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `template` does not compile.
    pub fn any<H: RequestHandler + 'static>(&mut self, template: &str, handler: H) -> Result<&mut Self, ConfigError> {
        self.add_definition(template, MethodSet::Any, Arc::new(handler))
    }

    /// Registers a route built by [`get`], [`post`], [`any`] and friends.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `template` does not compile.
    pub fn route(&mut self, template: &str, item: MethodRouteBuilder) -> Result<&mut Self, ConfigError> {
        self.add_definition(template, item.methods, item.handler)
    }

    pub(crate) fn add_definition(
        &mut self,
        template: &str,
        methods: MethodSet,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<&mut Self, ConfigError> {
        let pattern = PathPattern::compile(template)?;
        let definition = RouteDefinition { pattern, methods, handler };
        if definition.has_variables() {
            self.variable.push(definition);
        } else {
            self.fixed.push(definition);
        }
        Ok(self)
    }

    pub fn config(&mut self, config: RouterConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn routing_policy(&mut self, policy: RoutingPolicy) -> &mut Self {
        self.config.routing_policy = policy;
        self
    }

    /// The number of definitions registered so far.
    pub fn definition_count(&self) -> usize {
        self.fixed.len() + self.variable.len()
    }

    /// Freezes the table and selects the routing engine.
    pub fn build(self) -> Router {
        let definition_count = self.definition_count();
        let Self { fixed, variable, config } = self;

        let routes = group(fixed)
            .into_iter()
            .chain(group(variable))
            .enumerate()
            .filter_map(|(order, definitions)| PathRoute::new(order, definitions))
            .collect::<Vec<_>>();

        let policy = config.resolve(routes.len());
        let engine = match policy {
            RoutingPolicy::SegmentTree => Engine::SegmentTree(SegmentTreeRouter::new(routes)),
            RoutingPolicy::Simple | RoutingPolicy::Auto => Engine::Simple(SimpleRouter::new(routes)),
        };
        let router = Router { engine, definition_count };

        info!(
            "router built with {:?} engine, {} path routes from {} definitions",
            router.policy(),
            router.path_route_count(),
            router.definition_count()
        );
        router
    }
}

/// Groups definitions by normalized template, in order of first registration.
fn group(definitions: Vec<RouteDefinition>) -> Vec<Vec<RouteDefinition>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<RouteDefinition>> = Vec::new();
    for definition in definitions {
        let key = definition.pattern.normalized();
        match index.get(&key) {
            Some(&position) => groups[position].push(definition),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![definition]);
            }
        }
    }
    groups
}

/// A handler and the methods it answers, registered with [`RouterBuilder::route`].
pub struct MethodRouteBuilder {
    methods: MethodSet,
    handler: Arc<dyn RequestHandler>,
}

impl MethodRouteBuilder {
    /// Also answers `method`; has no effect on a route that already answers any method.
    pub fn or(mut self, method: Method) -> Self {
        if let MethodSet::Only(methods) = self.methods {
            self.methods = MethodSet::from_methods(methods.into_iter().chain(std::iter::once(method)));
        }
        self
    }
}

impl std::fmt::Debug for MethodRouteBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRouteBuilder").field("methods", &self.methods).finish_non_exhaustive()
    }
}

macro_rules! method_route_builder {
    ($method:ident, $method_const:ident) => {
        pub fn $method<H: RequestHandler + 'static>(handler: H) -> MethodRouteBuilder {
            MethodRouteBuilder { methods: MethodSet::Only(vec![Method::$method_const]), handler: Arc::new(handler) }
        }
    };
}

method_route_builder!(get, GET);
method_route_builder!(post, POST);
method_route_builder!(put, PUT);
method_route_builder!(patch, PATCH);
method_route_builder!(delete, DELETE);
method_route_builder!(head, HEAD);
method_route_builder!(options, OPTIONS);

pub fn any<H: RequestHandler + 'static>(handler: H) -> MethodRouteBuilder {
    MethodRouteBuilder { methods: MethodSet::Any, handler: Arc::new(handler) }
}
