use crate::body::ResponseBody;
use crate::error::BoxError;
use crate::responder::Responder;
use crate::RequestContext;
use async_trait::async_trait;
use http::Response;
use std::fmt;
use std::sync::Arc;

pub type HandlerResult = Result<Response<ResponseBody>, BoxError>;

/// The invocable registered for a route.
///
/// Handlers are produced outside the router (by hand, or by a controller binder) and registered
/// as plain `(path template, methods, handler)` triples.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &mut RequestContext) -> HandlerResult;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    async fn invoke(&self, req: &mut RequestContext) -> HandlerResult {
        self.as_ref().invoke(req).await
    }
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    async fn invoke(&self, req: &mut RequestContext) -> HandlerResult {
        self.as_ref().invoke(req).await
    }
}

/// A handler built from a closure, see [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Creates a handler from a closure.
///
/// The closure reads what it needs from the request (path variables, headers, body) and returns
/// a future that owns its data; the future's output is turned into a response by [`Responder`].
///
/// ```
/// use micro_router::handler_fn;
///
/// let _handler = handler_fn(|req| {
///     let month = req.path_variables().get_int("month");
///     async move { month.map(|m| format!("month {}", m.unwrap_or_default())) }
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(&mut RequestContext) -> Fut + Send + Sync,
    Fut: Future + Send,
    Fut::Output: Responder,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(&mut RequestContext) -> Fut + Send + Sync,
    Fut: Future + Send,
    Fut::Output: Responder,
{
    async fn invoke(&self, req: &mut RequestContext) -> HandlerResult {
        let responder = (self.f)(req).await;
        Ok(responder.response_to(req))
    }
}

#[cfg(test)]
mod test {
    use crate::handler::{handler_fn, FnHandler, RequestHandler};
    use crate::{PathVariables, RequestContext};
    use bytes::Bytes;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;

    fn assert_is_handler<T: RequestHandler>(_handler: &T) {
        // no op
    }

    fn assert_is_fn_handler<F>(_handler: &FnHandler<F>) {
        // no op
    }

    #[test]
    fn assert_fn_is_handler() {
        let handler = handler_fn(|_req| async { "hello world" });
        assert_is_fn_handler(&handler);
        assert_is_handler(&handler);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_invoke_fn_handler() {
        let handler = handler_fn(|req| {
            let id = req.path_variables().get_long("id");
            async move { id.map(|id| format!("user {}", id.unwrap_or_default())) }
        });

        let mut req = RequestContext::from(Request::get("/users/42").body(Bytes::new()).unwrap());
        req.set_property(PathVariables::from_pairs([("id", "42")]));
        let response = handler.invoke(&mut req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("user 42"));

        req.set_property(PathVariables::from_pairs([("id", "me")]));
        let response = handler.invoke(&mut req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
