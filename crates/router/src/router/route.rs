use crate::handler::RequestHandler;
use crate::router::pattern::PathPattern;
use crate::router::RouteMatch;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// The methods a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSet {
    Any,
    Only(Vec<Method>),
}

impl MethodSet {
    /// An empty list of methods means any method.
    pub fn from_methods<I: IntoIterator<Item = Method>>(methods: I) -> Self {
        let mut list: Vec<Method> = Vec::new();
        for method in methods {
            if !list.contains(&method) {
                list.push(method);
            }
        }
        if list.is_empty() { MethodSet::Any } else { MethodSet::Only(list) }
    }

    #[inline]
    pub fn contains(&self, method: &Method) -> bool {
        match self {
            MethodSet::Any => true,
            MethodSet::Only(methods) => methods.contains(method),
        }
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, MethodSet::Any)
    }

    /// `*` for any method, otherwise the methods joined with `|`, e.g. `GET|HEAD`.
    pub fn label(&self) -> String {
        match self {
            MethodSet::Any => "*".to_owned(),
            MethodSet::Only(methods) => methods.iter().map(Method::as_str).collect::<Vec<_>>().join("|"),
        }
    }
}

/// The route that accepted a request, attached to the request for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    methods_label: Arc<str>,
    path_template: Arc<str>,
}

impl MatchedRoute {
    pub fn new(methods_label: impl Into<Arc<str>>, path_template: impl Into<Arc<str>>) -> Self {
        Self { methods_label: methods_label.into(), path_template: path_template.into() }
    }

    #[inline]
    pub fn methods_label(&self) -> &str {
        &self.methods_label
    }

    #[inline]
    pub fn path_template(&self) -> &str {
        &self.path_template
    }
}

impl fmt::Display for MatchedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.methods_label, self.path_template)
    }
}

/// One registered endpoint.
pub struct RouteDefinition {
    pub(crate) pattern: PathPattern,
    pub(crate) methods: MethodSet,
    pub(crate) handler: Arc<dyn RequestHandler>,
}

impl RouteDefinition {
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    pub fn has_variables(&self) -> bool {
        self.pattern.has_variables()
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("template", &self.pattern.template())
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

/// A method set and its handler, inside a [`PathRoute`].
pub struct MethodRoute {
    methods: MethodSet,
    handler: Arc<dyn RequestHandler>,
    matched_route: MatchedRoute,
}

impl MethodRoute {
    #[inline]
    pub fn accepts(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    #[inline]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    #[inline]
    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }

    /// The descriptor attached to requests dispatched to this route.
    #[inline]
    pub fn matched_route(&self) -> &MatchedRoute {
        &self.matched_route
    }
}

impl fmt::Debug for MethodRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRoute").field("route", &self.matched_route.to_string()).finish_non_exhaustive()
    }
}

/// All definitions sharing one template, routes with explicit methods first.
pub struct PathRoute {
    pattern: PathPattern,
    method_routes: Vec<MethodRoute>,
    order: usize,
}

impl PathRoute {
    /// Groups `definitions`, which must all share the same normalized template.
    ///
    /// The pattern and displayed template come from the first definition.
    pub(crate) fn new(order: usize, definitions: Vec<RouteDefinition>) -> Option<Self> {
        let mut definitions = definitions.into_iter();
        let first = definitions.next()?;
        let pattern = first.pattern.clone();
        let template: Arc<str> = Arc::from(pattern.template());

        let mut method_routes = std::iter::once(first)
            .chain(definitions)
            .map(|definition| MethodRoute {
                matched_route: MatchedRoute::new(definition.methods.label(), Arc::clone(&template)),
                methods: definition.methods,
                handler: definition.handler,
            })
            .collect::<Vec<_>>();
        // stable: explicit method sets keep registration order and get first refusal
        method_routes.sort_by_key(|route| route.methods.is_any());

        Some(Self { pattern, method_routes, order })
    }

    #[inline]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[inline]
    pub fn method_routes(&self) -> &[MethodRoute] {
        &self.method_routes
    }

    /// Position in the frozen table, fixed routes first.
    #[inline]
    pub(crate) fn order(&self) -> usize {
        self.order
    }

    /// The first method route accepting `method`.
    #[inline]
    pub fn find(&self, method: &Method) -> Option<&MethodRoute> {
        self.method_routes.iter().find(|route| route.accepts(method))
    }

    /// Tests this route against one request.
    pub(crate) fn attempt<'r>(&'r self, method: &Method, path: &str) -> Attempt<'r> {
        match self.find(method) {
            Some(method_route) => match self.pattern.captures(path) {
                Some(path_variables) => Attempt::Hit(RouteMatch::new(self, method_route, path_variables)),
                None => Attempt::Miss,
            },
            None if self.pattern.is_match(path) => Attempt::PathMatched,
            None => Attempt::Miss,
        }
    }
}

/// Outcome of testing one [`PathRoute`] against a request.
pub(crate) enum Attempt<'r> {
    /// the path does not match
    Miss,
    /// the path matches but no method route accepts the method
    PathMatched,
    Hit(RouteMatch<'r>),
}

impl fmt::Debug for PathRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRoute")
            .field("template", &self.pattern.template())
            .field("method_routes", &self.method_routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchedRoute, MethodSet, PathRoute, RouteDefinition};
    use crate::handler::MockRequestHandler;
    use crate::router::pattern::PathPattern;
    use http::Method;
    use std::sync::Arc;

    fn definition(template: &str, methods: MethodSet) -> RouteDefinition {
        RouteDefinition { pattern: PathPattern::compile(template).unwrap(), methods, handler: Arc::new(MockRequestHandler::new()) }
    }

    #[test]
    fn test_method_set() {
        assert_eq!(MethodSet::from_methods([]), MethodSet::Any);
        let set = MethodSet::from_methods([Method::GET, Method::HEAD, Method::GET]);
        assert_eq!(set, MethodSet::Only(vec![Method::GET, Method::HEAD]));
        assert!(set.contains(&Method::HEAD));
        assert!(!set.contains(&Method::POST));
        assert!(MethodSet::Any.contains(&Method::PATCH));
        assert_eq!(set.label(), "GET|HEAD");
        assert_eq!(MethodSet::Any.label(), "*");
    }

    #[test]
    fn test_any_method_routes_sort_last() {
        let route = PathRoute::new(0, vec![
            definition("/a", MethodSet::Any),
            definition("/a", MethodSet::Only(vec![Method::POST])),
            definition("/a/", MethodSet::Only(vec![Method::GET])),
        ])
        .unwrap();

        let labels = route.method_routes().iter().map(|r| r.matched_route().methods_label().to_owned()).collect::<Vec<_>>();
        assert_eq!(labels, ["POST", "GET", "*"]);
        assert_eq!(route.find(&Method::GET).unwrap().matched_route(), &MatchedRoute::new("GET", "/a"));
        assert_eq!(route.find(&Method::DELETE).unwrap().matched_route().methods_label(), "*");
        assert_eq!(route.find(&Method::DELETE).unwrap().matched_route().to_string(), "* /a");
    }

    #[test]
    fn test_empty_path_route() {
        assert!(PathRoute::new(0, vec![]).is_none());
    }
}
