//! Response building and decoration.
//!
//! # Responsibilities
//! - Build redirect and not-found responses for edge decisions
//! - Tag rendered responses with their locale
//! - Strip hop-by-hop headers between client and upstream
//!
//! # Design Decisions
//! - Redirects are 307 so the method and body survive
//! - The locale cookie is only rewritten when it disagrees with the path

use axum::{
    http::{
        header::{self, HeaderMap, HeaderName},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};

use crate::http::cookies::site_cookie;
use crate::locale::LocaleTag;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Temporary (307) redirect to `location`.
pub fn redirect(location: &str) -> Response {
    Redirect::temporary(location).into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Mark a rendered response with its locale.
///
/// Sets `Content-Language` unless the renderer already did, and refreshes
/// the locale cookie when `cookie_name` is given.
pub fn decorate(mut response: Response, locale: &LocaleTag, cookie_name: Option<&str>) -> Response {
    let headers = response.headers_mut();

    if !headers.contains_key(header::CONTENT_LANGUAGE) {
        if let Ok(value) = HeaderValue::from_str(locale.as_str()) {
            headers.insert(header::CONTENT_LANGUAGE, value);
        }
    }

    if let Some(name) = cookie_name {
        match HeaderValue::from_str(&site_cookie(name, locale.as_str())) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, cookie = %name, "Invalid locale cookie"),
        }
    }

    response
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}
