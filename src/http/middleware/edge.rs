//! Edge middleware.
//! Applies the auth gate and locale resolver before any page renders.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::cookies::cookie_value;
use crate::http::request::RequestIdExt;
use crate::http::response::{decorate, not_found, redirect};
use crate::http::server::AppState;
use crate::locale::LocaleTag;
use crate::observability::metrics;
use crate::routing::EdgeDecision;

/// Locale attached to requests that passed the edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLocale(pub LocaleTag);

pub async fn edge_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let runtime = state.runtime();
    let method = request.method().to_string();

    let decision = runtime.router.decide(request.uri(), request.headers());

    tracing::debug!(
        request_id = %request.request_id(),
        path = %request.uri().path(),
        outcome = decision.label(),
        "Edge decision"
    );
    metrics::record_decision(decision.label());

    let response = match decision {
        EdgeDecision::Bypass => next.run(request).await,
        EdgeDecision::LoginRedirect { location, .. }
        | EdgeDecision::LocaleRedirect { location, .. } => redirect(&location),
        EdgeDecision::NotFound { segment } => {
            tracing::debug!(segment = %segment, "Unsupported locale");
            not_found()
        }
        EdgeDecision::Render { locale } => {
            let cookie_name = runtime.config.locales.cookie_name.as_str();
            let refresh_cookie = runtime.config.locales.set_cookie
                && cookie_value(request.headers(), cookie_name) != Some(locale.as_str());

            request.extensions_mut().insert(ResolvedLocale(locale.clone()));
            let response = next.run(request).await;
            decorate(response, &locale, refresh_cookie.then_some(cookie_name))
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
