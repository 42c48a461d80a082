use crate::handler::HandlerResult;
use crate::middleware::{Middleware, Next};
use crate::RequestContext;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per request once the rest of the chain has answered.
///
/// Place it first in the chain so the elapsed time covers routing and the handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessLog;

impl AccessLog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for AccessLog {
    async fn apply(&self, req: &mut RequestContext, next: Next<'_>) -> HandlerResult {
        let start = Instant::now();
        let result = next.run(req).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let route = req.matched_route().map(ToString::to_string).unwrap_or_else(|| "-".to_owned());

        match &result {
            Ok(response) => info!(
                method = %req.method(),
                path = req.path(),
                status = response.status().as_u16(),
                route = %route,
                elapsed_ms,
                "access"
            ),
            Err(e) => warn!(method = %req.method(), path = req.path(), route = %route, elapsed_ms, cause = %e, "access failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::AccessLog;
    use crate::handler::handler_fn;
    use crate::middleware::MiddlewareChain;
    use crate::router::Router;
    use bytes::Bytes;
    use futures::executor::block_on;
    use http::{Request, StatusCode};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_access_log() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt().with_ansi(false).with_writer(move || writer.clone()).finish();

        let mut builder = Router::builder();
        builder.get("/users/{id}", handler_fn(|_req| async { "user" })).unwrap();
        let chain = MiddlewareChain::builder().add_last(builder.build()).add_first(AccessLog::new()).build();

        tracing::subscriber::with_default(subscriber, || {
            let response = block_on(chain.handle(Request::get("/users/42").body(Bytes::new()).unwrap()));
            assert_eq!(response.status(), StatusCode::OK);
            let response = block_on(chain.handle(Request::get("/orders").body(Bytes::new()).unwrap()));
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines = output.lines().filter(|line| line.contains("access")).collect::<Vec<_>>();
        assert_eq!(lines.len(), 2, "{output}");
        assert!(lines[0].contains("path=\"/users/42\"") && lines[0].contains("status=200"), "{}", lines[0]);
        assert!(lines[0].contains("route=GET /users/{id}"), "{}", lines[0]);
        assert!(lines[1].contains("status=404") && lines[1].contains("route=-"), "{}", lines[1]);
    }
}
