//! Forwarding to the upstream page renderer.

use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, uri::Authority, HeaderValue, Request, Uri},
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::http::response::strip_hop_by_hop;
use crate::locale::LocaleTag;

pub const X_STOREFRONT_LOCALE: &str = "x-storefront-locale";

pub type UpstreamClient = Client<HttpConnector, Body>;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream url `{0}`")]
    InvalidUrl(String),
    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),
    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// Build the shared HTTP client.
pub fn build_client(connect_timeout: Duration) -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(connect_timeout));
    connector.set_nodelay(true);
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Where rendered requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    authority: Authority,
    forward_host: bool,
}

impl UpstreamTarget {
    pub fn from_url(raw: &str, forward_host: bool) -> Result<Self, UpstreamError> {
        let url = Url::parse(raw).map_err(|_| UpstreamError::InvalidUrl(raw.to_string()))?;
        // Requests are forwarded with their own path; a base path would be lost.
        if url.path() != "/" || url.query().is_some() {
            return Err(UpstreamError::InvalidUrl(raw.to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| UpstreamError::InvalidUrl(raw.to_string()))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let authority = Authority::from_str(&format!("{}:{}", host, port))
            .map_err(|_| UpstreamError::InvalidUrl(raw.to_string()))?;

        Ok(Self {
            authority,
            forward_host,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Rewrite `uri` to point at this upstream, keeping path and query.
    fn rewrite(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        Uri::builder()
            .scheme("http")
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Forward `request` to the renderer, tagging it with the resolved locale.
pub async fn forward(
    client: &UpstreamClient,
    target: &UpstreamTarget,
    request: Request<Body>,
    locale: Option<&LocaleTag>,
) -> Result<Response, UpstreamError> {
    let (mut parts, body) = request.into_parts();
    let original_host = parts.headers.get(header::HOST).cloned();

    parts.uri = target.rewrite(&parts.uri)?;
    strip_hop_by_hop(&mut parts.headers);

    if !target.forward_host {
        parts.headers.remove(header::HOST);
    }
    if let Some(host) = original_host {
        parts.headers.insert("x-forwarded-host", host);
    }
    if let Some(locale) = locale {
        if let Ok(value) = HeaderValue::from_str(locale.as_str()) {
            parts.headers.insert(X_STOREFRONT_LOCALE, value);
        }
    } else {
        parts.headers.remove(X_STOREFRONT_LOCALE);
    }

    let response = client.request(Request::from_parts(parts, body)).await?;
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    Ok(Response::from_parts(parts, Body::new(body)))
}
