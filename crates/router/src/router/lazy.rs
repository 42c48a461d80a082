use crate::error::ConfigError;
use crate::handler::RequestHandler;
use crate::router::{MethodSet, Router, RouterBuilder, RouterConfig, Routing};
use http::Method;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// A route table that accepts registrations through a shared reference until its first use.
///
/// The table is frozen by [`init`](LazyRouter::init), either called explicitly or implicitly by
/// the first [`routing`](LazyRouter::routing) call. Initialization runs exactly once even when
/// several threads race for it; registrations after that are rejected with
/// [`ConfigError::AlreadyInitialized`].
#[derive(Debug)]
pub struct LazyRouter {
    pending: Mutex<Option<RouterBuilder>>,
    router: OnceCell<Router>,
}

impl Default for LazyRouter {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! lazy_method_route {
    ($method:ident, $method_const:ident) => {
        #[doc = concat!("Registers `handler` for `", stringify!($method_const), "` requests matching `template`.")]
        ///
        /// # Errors
        ///
        /// See [`LazyRouter::add`].
        pub fn $method<H: RequestHandler + 'static>(&self, template: &str, handler: H) -> Result<(), ConfigError> {
            self.register(template, MethodSet::Only(vec![Method::$method_const]), Arc::new(handler))
        }
    };
}

impl LazyRouter {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        let mut builder = Router::builder();
        builder.config(config);
        Self { pending: Mutex::new(Some(builder)), router: OnceCell::new() }
    }

    fn pending(&self) -> MutexGuard<'_, Option<RouterBuilder>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `handler` for `methods` on `template`; an empty method list means any method.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyInitialized`] once the table is frozen, or the compile error
    /// of `template`.
    pub fn add<H, I>(&self, template: &str, methods: I, handler: H) -> Result<(), ConfigError>
    where
        H: RequestHandler + 'static,
        I: IntoIterator<Item = Method>,
    {
        self.register(template, MethodSet::from_methods(methods), Arc::new(handler))
    }

    lazy_method_route!(get, GET);
    lazy_method_route!(post, POST);
    lazy_method_route!(put, PUT);
    lazy_method_route!(patch, PATCH);
    lazy_method_route!(delete, DELETE);
    lazy_method_route!(head, HEAD);
    lazy_method_route!(options, OPTIONS);

    /// Registers `handler` for every method on `template`.
    ///
    /// # Errors
    ///
    /// See [`LazyRouter::add`].
    pub fn any<H: RequestHandler + 'static>(&self, template: &str, handler: H) -> Result<(), ConfigError> {
        self.register(template, MethodSet::Any, Arc::new(handler))
    }

    fn register(&self, template: &str, methods: MethodSet, handler: Arc<dyn RequestHandler>) -> Result<(), ConfigError> {
        let mut pending = self.pending();
        match pending.as_mut() {
            Some(builder) => builder.add_definition(template, methods, handler).map(|_| ()),
            None => {
                warn!("route {} {} rejected: router already initialized", methods.label(), template);
                Err(ConfigError::AlreadyInitialized)
            }
        }
    }

    /// Freezes the table, once; later calls return the same router.
    pub fn init(&self) -> &Router {
        self.router.get_or_init(|| self.pending().take().unwrap_or_default().build())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.router.get().is_some()
    }

    /// Finds the route for `method` and `path`, freezing the table first if needed.
    pub fn routing<'r>(&'r self, method: &Method, path: &str) -> Routing<'r> {
        self.init().routing(method, path)
    }
}
