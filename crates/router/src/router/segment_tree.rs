//! Segment-tree engine, used for larger route tables.
//!
//! Path routes are indexed by their number of segments, then by their literal segments:
//!
//! - a fixed template such as `/api/users/me` lands in `route_ends["me"]` of the node reached
//!   through `api` and `users`
//! - a template with variables such as `/api/users/{id}/items` lands in `pattern_route_ends` of
//!   the node where its first variable segment starts, here the node reached through `api`
//!   and `users`
//!
//! A request only tests the regexes of templates that share its segment count and literal
//! prefix. Every candidate keeps its position in the table, and the lowest position among hits
//! wins, so the answer is the one [`SimpleRouter`](super::SimpleRouter) gives.

use crate::router::pattern::path_segments;
use crate::router::route::{Attempt, PathRoute};
use crate::router::{RouteMatch, Routing};
use http::Method;
use std::collections::HashMap;

#[derive(Debug)]
pub struct SegmentTreeRouter {
    routes: Vec<PathRoute>,
    /// the route of the template without segments, i.e. `/`
    root_route: Option<usize>,
    /// root nodes indexed by segment count
    roots: Vec<Option<Node>>,
}

#[derive(Debug)]
struct Node {
    depth: usize,
    children: HashMap<String, Node>,
    route_ends: HashMap<String, usize>,
    pattern_route_ends: Vec<usize>,
}

impl Node {
    fn new(depth: usize) -> Self {
        Self { depth, children: HashMap::new(), route_ends: HashMap::new(), pattern_route_ends: Vec::new() }
    }
}

/// Accumulated result of one lookup.
struct Search<'r> {
    hit: Option<RouteMatch<'r>>,
    path_matched: bool,
}

impl<'r> Search<'r> {
    fn hit_order(&self) -> Option<usize> {
        self.hit.as_ref().map(|hit| hit.path_route().order())
    }

    fn attempt(&mut self, route: &'r PathRoute, method: &Method, path: &str) {
        match route.attempt(method, path) {
            Attempt::Hit(route_match) => {
                if self.hit_order().is_none_or(|order| route.order() < order) {
                    self.hit = Some(route_match);
                }
            }
            Attempt::PathMatched => self.path_matched = true,
            Attempt::Miss => {}
        }
    }
}

impl SegmentTreeRouter {
    /// `routes` must already be in table order: fixed templates first, then templates with variables.
    pub(crate) fn new(routes: Vec<PathRoute>) -> Self {
        let mut root_route = None;
        let mut roots: Vec<Option<Node>> = Vec::new();
        for (index, route) in routes.iter().enumerate() {
            let segments = route.pattern().segments();
            if segments.is_empty() {
                root_route = Some(index);
                continue;
            }
            if roots.len() <= segments.len() {
                roots.resize_with(segments.len() + 1, || None);
            }

            let last = segments.len() - 1;
            let mut node = roots[segments.len()].get_or_insert_with(|| Node::new(0));
            for (depth, segment) in segments.iter().enumerate() {
                if segment.is_pattern() {
                    node.pattern_route_ends.push(index);
                    break;
                }
                if depth == last {
                    node.route_ends.insert(segment.as_str().to_owned(), index);
                    break;
                }
                node = node.children.entry(segment.as_str().to_owned()).or_insert_with(|| Node::new(depth + 1));
            }
        }

        Self { routes, root_route, roots }
    }

    pub fn routing<'r>(&'r self, method: &Method, path: &str) -> Routing<'r> {
        let segments = path_segments(path).collect::<Vec<_>>();
        let mut search = Search { hit: None, path_matched: false };

        if segments.is_empty() {
            if let Some(index) = self.root_route {
                search.attempt(&self.routes[index], method, path);
            }
        } else if let Some(root) = self.roots.get(segments.len()).and_then(Option::as_ref) {
            self.search(root, &segments, method, path, &mut search);
        }

        match search {
            Search { hit: Some(route_match), .. } => Routing::Matched(route_match),
            Search { path_matched: true, .. } => Routing::MethodNotAllowed,
            Search { .. } => Routing::NotMatched,
        }
    }

    fn search<'r>(&'r self, node: &'r Node, segments: &[&str], method: &Method, path: &str, search: &mut Search<'r>) {
        let segment = segments[node.depth];
        if node.depth + 1 == segments.len() {
            if let Some(&index) = node.route_ends.get(segment) {
                search.attempt(&self.routes[index], method, path);
            }
        } else if let Some(child) = node.children.get(segment) {
            self.search(child, segments, method, path, search);
        }

        // literal matches come first, pattern routes only win with a lower table position
        for &index in &node.pattern_route_ends {
            let route = &self.routes[index];
            if search.hit_order().is_some_and(|order| route.order() > order) {
                break;
            }
            search.attempt(route, method, path);
        }
    }

    /// The path routes in table order.
    pub fn path_routes(&self) -> &[PathRoute] {
        &self.routes
    }
}
