//! Page rendering handlers.
//!
//! With an upstream configured, pages are forwarded to it. Without one the
//! edge answers with a small JSON descriptor of what would have rendered,
//! which is what local development and the integration tests use.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::middleware::ResolvedLocale;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::http::upstream;
use crate::locale::TextDirection;
use crate::observability::metrics;

#[derive(Debug, Serialize)]
pub struct PageDescriptor {
    pub locale: String,
    pub dir: TextDirection,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub locales: Vec<String>,
    pub default_locale: String,
}

pub async fn render_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let runtime = state.runtime();
    let locale = request
        .extensions()
        .get::<ResolvedLocale>()
        .map(|resolved| resolved.0.clone());

    if let Some(target) = &runtime.upstream {
        let request_id = request.request_id().to_string();
        return match upstream::forward(&state.client, target, request, locale.as_ref()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                metrics::record_upstream_error();
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        };
    }

    match locale {
        Some(locale) => Json(PageDescriptor {
            dir: locale.direction(),
            locale: locale.to_string(),
            path: request.uri().path().to_string(),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

pub async fn status_handler(State(state): State<AppState>) -> Json<SystemStatus> {
    let runtime = state.runtime();
    let locales = runtime.router.resolver().locales();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
        locales: locales.iter().map(|l| l.to_string()).collect(),
        default_locale: locales.default_locale().to_string(),
    })
}
