//! Request routing for HTTP servers.
//!
//! The crate maps an incoming `(method, path)` pair to a registered handler:
//!
//! - path templates such as `/users/{id}` or `/images/{name}.{type}` are compiled to regexes
//!   at registration time ([`router::PathPattern`])
//! - routes are collected by a [`router::RouterBuilder`] and frozen into a [`Router`], which
//!   picks a linear-scan or a segment-tree engine depending on the size of the table
//! - a [`Router`] is a [`middleware::Middleware`]: a matched request is dispatched with its
//!   [`PathVariables`] attached, a path matched with the wrong method is answered with
//!   `405 Method Not Allowed`, and everything else goes to the next link of the chain
//!
//! Byte-level codecs, connection handling and body streaming belong to the server the router is
//! mounted in; the router sees a decoded path and a fully received body.
//!
//! # Examples
//!
//! ```
//! use micro_router::router::Router;
//! use micro_router::handler_fn;
//!
//! let mut builder = Router::builder();
//! builder.get(
//!     "/report/{year}/{month}",
//!     handler_fn(|req| {
//!         let year = req.path_variables().get_string("year").unwrap_or_default().to_owned();
//!         let month = req.path_variables().get_int("month");
//!         async move { month.map(|month| format!("report {year}/{}", month.unwrap_or_default())) }
//!     }),
//! )?;
//! let router = builder.build();
//! assert_eq!(router.path_route_count(), 1);
//! # Ok::<(), micro_router::ConfigError>(())
//! ```

mod body;
mod error;
mod handler;
mod path_variables;
mod request;
mod responder;

pub mod middleware;
pub mod router;

pub use body::ResponseBody;
pub use error::{BoxError, ConfigError, PathVariableError};
pub use handler::{handler_fn, FnHandler, HandlerResult, RequestHandler};
pub use path_variables::PathVariables;
pub use request::RequestContext;
pub use responder::{internal_server_error, method_not_allowed, not_found, Responder};
pub use router::{LazyRouter, Router};
