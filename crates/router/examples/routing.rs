use bytes::Bytes;
use http::{Method, Request};
use http_body_util::BodyExt;
use micro_router::middleware::{AccessLog, MiddlewareChain, PathFilter};
use micro_router::router::{get, post, LazyRouter, Router};
use micro_router::handler_fn;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut builder = Router::builder();
    builder
        .get(
            "/report/{year}/{month}",
            handler_fn(|req| {
                let year = req.path_variables().get_string("year").unwrap_or_default().to_owned();
                let month = req.path_variables().get_int("month");
                async move { month.map(|month| format!("report of {year}-{:02}", month.unwrap_or_default())) }
            }),
        )
        .expect("valid template")
        .route("/users/me", get(handler_fn(|_req| async { "it's me" })))
        .expect("valid template")
        .route(
            "/users",
            post(handler_fn(|req| {
                let len = req.body().len();
                async move { format!("created user from {len} bytes") }
            })),
        )
        .expect("valid template");
    let api = builder.build();

    let admin = LazyRouter::new();
    admin.get("/admin/{page}", handler_fn(|_req| async { "admin" })).expect("valid template");

    let chain = MiddlewareChain::builder()
        .add_last(AccessLog::new())
        .add_last(PathFilter::new(["/admin"], admin).expect("valid prefix"))
        .add_last(api)
        .build();

    let requests = [
        (Method::GET, "/report/2024/3"),
        (Method::GET, "/report/2024/march"),
        (Method::GET, "/users/me"),
        (Method::POST, "/users"),
        (Method::DELETE, "/users"),
        (Method::GET, "/admin/dashboard"),
        (Method::GET, "/orders"),
    ];

    for (method, path) in requests {
        let request = Request::builder().method(method).uri(path).body(Bytes::from_static(b"{}")).expect("valid request");
        let response = chain.handle(request).await;
        let status = response.status();
        let body = response.into_body().collect().await.map(|body| body.to_bytes()).unwrap_or_default();
        info!("{} {}", status, String::from_utf8_lossy(&body));
    }
}
