//! The handler chain a router is mounted in.
//!
//! A [`MiddlewareChain`] runs its middlewares in order; each one either answers the request or
//! passes it on through [`Next::run`]. The end of the chain is a fallback handler, [`NotFound`]
//! unless another one is set.
//!
//! [`Router`] and [`LazyRouter`] are middlewares: a matched request is dispatched to its handler
//! with its [`PathVariables`](crate::PathVariables) and [`MatchedRoute`](crate::router::MatchedRoute)
//! attached, a path-only match is answered with `405`, and anything else goes to the next link.
//!
//! # Examples
//!
//! ```
//! use micro_router::middleware::{AccessLog, MiddlewareChain};
//! use micro_router::router::Router;
//! use micro_router::handler_fn;
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//!
//! # futures::executor::block_on(async {
//! let mut builder = Router::builder();
//! builder.get("/users/{id}", handler_fn(|_req| async { "user" }))?;
//!
//! let chain = MiddlewareChain::builder().add_last(AccessLog::new()).add_last(builder.build()).build();
//!
//! let response = chain.handle(Request::get("/users/42").body(Bytes::new())?).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! let response = chain.handle(Request::get("/orders").body(Bytes::new())?).await;
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

mod access_log;
mod path_filter;

pub use access_log::AccessLog;
pub use path_filter::PathFilter;

use crate::body::ResponseBody;
use crate::handler::{HandlerResult, RequestHandler};
use crate::responder::{internal_server_error, method_not_allowed, not_found};
use crate::router::{LazyRouter, Router, Routing};
use crate::RequestContext;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// One link of a [`MiddlewareChain`].
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult;
}

#[async_trait]
impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        self.as_ref().apply(req, next).await
    }
}

#[async_trait]
impl<M: Middleware + ?Sized> Middleware for Box<M> {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        self.as_ref().apply(req, next).await
    }
}

/// The rest of a chain, handed to each middleware.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    rest: &'a [Box<dyn Middleware>],
    fallback: &'a dyn RequestHandler,
}

impl<'a> Next<'a> {
    /// Passes the request to the next middleware, or to the fallback at the end of the chain.
    pub async fn run(self, req: &mut RequestContext) -> HandlerResult {
        match self.rest.split_first() {
            Some((middleware, rest)) => middleware.apply(req, Next { rest, fallback: self.fallback }).await,
            None => self.fallback.invoke(req).await,
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("remaining", &self.rest.len()).finish_non_exhaustive()
    }
}

/// The default end of a chain: `404 Not Found`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait]
impl RequestHandler for NotFound {
    async fn invoke(&self, _req: &mut RequestContext) -> HandlerResult {
        Ok(not_found())
    }
}

pub struct MiddlewareChain {
    middlewares: Vec<Box<dyn Middleware>>,
    fallback: Box<dyn RequestHandler>,
}

impl MiddlewareChain {
    pub fn builder() -> MiddlewareChainBuilder {
        MiddlewareChainBuilder::new()
    }

    /// Runs the chain.
    ///
    /// # Errors
    ///
    /// Returns the error of the handler or middleware that failed.
    pub async fn dispatch(&self, req: &mut RequestContext) -> HandlerResult {
        Next { rest: &self.middlewares, fallback: self.fallback.as_ref() }.run(req).await
    }

    /// Runs the chain for a request whose body has been fully received; a failure is logged and
    /// answered with `500 Internal Server Error`.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<ResponseBody> {
        let mut req = RequestContext::from(request);
        match self.dispatch(&mut req).await {
            Ok(response) => response,
            Err(e) => {
                error!("handle {} {} error: {}", req.method(), req.path(), e);
                internal_server_error()
            }
        }
    }
}

/// A chain can be the handler of another chain's route.
#[async_trait]
impl RequestHandler for MiddlewareChain {
    async fn invoke(&self, req: &mut RequestContext) -> HandlerResult {
        self.dispatch(req).await
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain").field("middlewares", &self.middlewares.len()).finish_non_exhaustive()
    }
}

pub struct MiddlewareChainBuilder {
    middlewares: Vec<Box<dyn Middleware>>,
    fallback: Box<dyn RequestHandler>,
}

impl MiddlewareChainBuilder {
    fn new() -> Self {
        Self { middlewares: vec![], fallback: Box::new(NotFound) }
    }

    pub fn add_last<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    pub fn add_first<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.insert(0, Box::new(middleware));
        self
    }

    /// Replaces the end of the chain.
    pub fn fallback<H: RequestHandler + 'static>(mut self, handler: H) -> Self {
        self.fallback = Box::new(handler);
        self
    }

    pub fn build(self) -> MiddlewareChain {
        MiddlewareChain { middlewares: self.middlewares, fallback: self.fallback }
    }
}

impl fmt::Debug for MiddlewareChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChainBuilder").field("middlewares", &self.middlewares.len()).finish_non_exhaustive()
    }
}

async fn route_request(router: &Router, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
    let routing = router.routing(req.method(), req.path());
    let handler = match routing {
        Routing::Matched(route_match) => {
            req.set_property(route_match.matched_route().clone());
            let handler = route_match.handler();
            req.set_property(route_match.into_path_variables());
            handler
        }
        Routing::MethodNotAllowed => return Ok(method_not_allowed()),
        Routing::NotMatched => return next.run(req).await,
    };

    handler.invoke(req).await
}

#[async_trait]
impl Middleware for Router {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        route_request(self, req, next).await
    }
}

#[async_trait]
impl Middleware for LazyRouter {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        route_request(self.init(), req, next).await
    }
}
