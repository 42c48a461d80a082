//! Conversion of handler output into responses.
//!
//! Text answers get a `text/plain; charset=utf-8` content type; `Result` and `Option` defer to
//! their content, and a [`PathVariableError`] turns into `400 Bad Request`. The answers the
//! router and the chain give by themselves come from [`method_not_allowed`], [`not_found`] and
//! [`internal_server_error`].

use crate::body::ResponseBody;
use crate::error::PathVariableError;
use crate::RequestContext;
use http::{HeaderValue, Response, StatusCode};
use std::convert::Infallible;

/// The output of a [`handler_fn`](crate::handler_fn) future.
pub trait Responder {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody>;
}

const TEXT_PLAIN_UTF_8: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");

fn text_response(status: StatusCode, body: impl Into<ResponseBody>) -> Response<ResponseBody> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response.headers_mut().insert(http::header::CONTENT_TYPE, TEXT_PLAIN_UTF_8);
    response
}

fn status_response(status: StatusCode) -> Response<ResponseBody> {
    text_response(status, status.canonical_reason().unwrap_or_default())
}

/// `405 Method Not Allowed`, answered when a path matches but none of its routes accepts the method.
pub fn method_not_allowed() -> Response<ResponseBody> {
    status_response(StatusCode::METHOD_NOT_ALLOWED)
}

/// `404 Not Found`, answered by the end of the middleware chain.
pub fn not_found() -> Response<ResponseBody> {
    status_response(StatusCode::NOT_FOUND)
}

/// `500 Internal Server Error`, answered when a handler fails.
pub fn internal_server_error() -> Response<ResponseBody> {
    status_response(StatusCode::INTERNAL_SERVER_ERROR)
}

impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

impl<T: Responder> Responder for (T, StatusCode) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (responder, status) = self;
        (status, responder).response_to(req)
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

impl Responder for () {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        text_response(StatusCode::OK, self)
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        text_response(StatusCode::OK, self)
    }
}

/// A path variable that fails typed coercion is the client's fault: `400 Bad Request`.
impl Responder for PathVariableError {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        text_response(StatusCode::BAD_REQUEST, self.to_string())
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::{method_not_allowed, not_found, Responder};
    use crate::error::PathVariableError;
    use crate::RequestContext;
    use bytes::Bytes;
    use http::{Request, StatusCode};
    use http_body::Body as HttpBody;

    fn ctx() -> RequestContext {
        RequestContext::from(Request::get("/").body(Bytes::new()).unwrap())
    }

    #[test]
    fn test_router_responses() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], mime::TEXT_PLAIN_UTF_8.as_ref());
        assert_eq!(response.body().size_hint().exact(), Some("Method Not Allowed".len() as u64));

        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_string_responders() {
        let ctx = ctx();
        assert_eq!("hello".response_to(&ctx).status(), StatusCode::OK);
        assert_eq!((StatusCode::CREATED, "hello".to_string()).response_to(&ctx).status(), StatusCode::CREATED);
        assert_eq!(("hello", StatusCode::ACCEPTED).response_to(&ctx).status(), StatusCode::ACCEPTED);
        assert!(().response_to(&ctx).body().is_end_stream());
    }

    #[test]
    fn test_path_variable_error_is_bad_request() {
        let ctx = ctx();
        let result: Result<String, PathVariableError> =
            Err(PathVariableError::parse("id", "abc", "int", "invalid digit found in string"));
        assert_eq!(result.response_to(&ctx).status(), StatusCode::BAD_REQUEST);
    }
}
