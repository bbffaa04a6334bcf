//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    routing::any,
    Json, Router,
};
use storefront_edge::{EdgeConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running edge on an ephemeral port.
pub struct TestEdge {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<EdgeConfig>,
}

impl TestEdge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestEdge {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the edge with `config`, bound to 127.0.0.1 on a free port.
pub async fn start_edge(mut config: EdgeConfig) -> TestEdge {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestEdge {
        addr,
        shutdown,
        config_tx,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Start a renderer that echoes what it received as JSON.
#[allow(dead_code)]
pub async fn start_echo_renderer() -> SocketAddr {
    async fn echo(headers: HeaderMap, request: Request<Body>) -> Json<serde_json::Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(serde_json::json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "query": request.uri().query(),
            "locale": header("x-storefront-locale"),
            "request_id": header("x-request-id"),
            "forwarded_host": header("x-forwarded-host"),
        }))
    }

    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo));
    serve(app).await
}

/// Start a renderer that always answers `status`.
#[allow(dead_code)]
pub async fn start_failing_renderer(status: StatusCode) -> SocketAddr {
    let app = Router::new().fallback(move || async move { (status, "renderer failed") });
    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
