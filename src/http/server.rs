//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, limits, headers)
//! - Run every page request through the edge middleware
//! - Forward rendered requests to the upstream renderer
//! - Swap in reloaded configuration without dropping connections
//!
//! Listener, timeout, body limit and security header settings are fixed
//! when the server is built. Locale, auth, routing and upstream settings
//! follow reloads.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::{validate_config, ValidationErrors};
use crate::config::EdgeConfig;
use crate::http::middleware::edge_middleware;
use crate::http::render::{render_handler, status_handler};
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::http::upstream::{build_client, UpstreamClient, UpstreamError, UpstreamTarget};
use crate::locale::LocaleError;
use crate::routing::EdgeRouter;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything compiled from one configuration.
#[derive(Debug)]
pub struct EdgeRuntime {
    pub config: EdgeConfig,
    pub router: EdgeRouter,
    pub upstream: Option<UpstreamTarget>,
}

impl EdgeRuntime {
    pub fn from_config(config: EdgeConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::Validation)?;

        let router = EdgeRouter::from_config(&config)?;
        let upstream = config
            .upstream
            .url
            .as_deref()
            .map(|url| UpstreamTarget::from_url(url, config.upstream.forward_host))
            .transpose()?;

        Ok(Self {
            config,
            router,
            upstream,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<EdgeRuntime>>,
    pub client: UpstreamClient,
}

impl AppState {
    fn new(runtime: EdgeRuntime) -> Self {
        let client = build_client(Duration::from_secs(runtime.config.timeouts.connect_secs));
        Self {
            inner: Arc::new(ArcSwap::from_pointee(runtime)),
            client,
        }
    }

    /// Current compiled configuration.
    pub fn runtime(&self) -> Arc<EdgeRuntime> {
        self.inner.load_full()
    }

    /// Compile and swap in a new configuration.
    /// On error the running configuration stays in place.
    pub fn apply(&self, config: EdgeConfig) -> Result<(), ServerError> {
        let runtime = EdgeRuntime::from_config(config)?;
        let current = self.inner.load();

        if runtime.config.listener != current.config.listener
            || runtime.config.timeouts != current.config.timeouts
            || runtime.config.security != current.config.security
        {
            tracing::warn!("Listener, timeout and security changes take effect after restart");
        }

        self.inner.store(Arc::new(runtime));
        Ok(())
    }
}

/// HTTP server for the storefront edge.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerError> {
        let runtime = EdgeRuntime::from_config(config)?;
        let config = runtime.config.clone();
        let state = AppState::new(runtime);
        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        let pages = Router::new()
            .route("/", any(render_handler))
            .route("/{*path}", any(render_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), edge_middleware));

        let mut router = Router::new()
            .route("/healthz", get(status_handler))
            .merge(pages)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ));
        }

        router
            .layer(RequestIdLayer::propagate())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(RequestIdLayer::set())
    }

    /// The assembled router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the running one;
    /// a message on `shutdown` starts a graceful shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match state.apply(config) {
                    Ok(()) => tracing::info!("Configuration reloaded"),
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected configuration, keeping current")
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_login_redirect_through_router() {
        let server = HttpServer::new(EdgeConfig::default()).unwrap();
        let response = server.router().oneshot(get("/ar/checkout")).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/ar/login");
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_protected_file_needs_session() {
        let server = HttpServer::new(EdgeConfig::default()).unwrap();
        let response = server
            .router()
            .oneshot(get("/en/checkout/receipt.pdf"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/en/login");
    }

    #[tokio::test]
    async fn test_healthz_skips_edge() {
        let server = HttpServer::new(EdgeConfig::default()).unwrap();
        let response = server.router().oneshot(get("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["locales"], serde_json::json!(["en", "ar"]));
    }

    #[tokio::test]
    async fn test_apply_swaps_router() {
        let server = HttpServer::new(EdgeConfig::default()).unwrap();

        let mut config = EdgeConfig::default();
        config.auth.protected_prefixes = vec!["/wallet".into()];
        server.state().apply(config).unwrap();

        let response = server.router().oneshot(get("/en/checkout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = server.router().oneshot(get("/en/wallet")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_config() {
        let server = HttpServer::new(EdgeConfig::default()).unwrap();

        let mut config = EdgeConfig::default();
        config.locales.default = "fr".into();
        assert!(server.state().apply(config).is_err());
        assert_eq!(server.state().runtime().config, EdgeConfig::default());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EdgeConfig::default();
        config.auth.login_path = "/checkout/login".into();

        assert!(matches!(HttpServer::new(config), Err(ServerError::Validation(_))));
    }
}
