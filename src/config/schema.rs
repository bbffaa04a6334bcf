//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the storefront edge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Supported locales and negotiation settings.
    pub locales: LocaleConfig,

    /// Protected routes and the session cookie that unlocks them.
    pub auth: AuthConfig,

    /// Requests the edge lets through without inspection.
    pub routing: RoutingConfig,

    /// Page renderer the edge forwards to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LocaleConfig {
    /// Supported locale tags, e.g. `["en", "ar"]`.
    pub supported: Vec<String>,

    /// Locale used when nothing else matches. Must be in `supported`.
    pub default: String,

    /// Cookie remembering the visitor's last locale.
    pub cookie_name: String,

    /// Consult the locale cookie and `Accept-Language` when the path has no prefix.
    pub detect_from_headers: bool,

    /// Answer 404 for locale-shaped prefixes outside `supported`.
    pub reject_unknown: bool,

    /// Refresh the locale cookie on rendered responses.
    pub set_cookie: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: vec!["en".to_string(), "ar".to_string()],
            default: "en".to_string(),
            cookie_name: "NEXT_LOCALE".to_string(),
            detect_from_headers: true,
            reject_unknown: true,
            set_cookie: true,
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Path prefixes (locale stripped) that require a session.
    pub protected_prefixes: Vec<String>,

    /// Cookie carrying the access token.
    pub session_cookie: String,

    /// Login page path without the locale prefix.
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![
                "/checkout".to_string(),
                "/profile".to_string(),
                "/orders".to_string(),
            ],
            session_cookie: "accessToken".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

/// Bypass rules for requests that skip the locale resolver.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path prefixes passed straight to the renderer.
    pub bypass_prefixes: Vec<String>,

    /// Skip paths whose last segment looks like a file name (`/favicon.ico`).
    pub bypass_static_files: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bypass_prefixes: vec![
                "/api".to_string(),
                "/_next".to_string(),
                "/_vercel".to_string(),
                "/healthz".to_string(),
            ],
            bypass_static_files: true,
        }
    }
}

/// Upstream renderer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the renderer (e.g., "http://127.0.0.1:3000").
    /// When unset the edge answers with a built-in page descriptor.
    pub url: Option<String>,

    /// Keep the client's Host header instead of the upstream authority.
    pub forward_host: bool,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EdgeConfig = toml::from_str(
            r#"
            [locales]
            supported = ["en", "ar", "fr"]

            [auth]
            session_cookie = "sid"
            "#,
        )
        .unwrap();

        assert_eq!(config.locales.supported, vec!["en", "ar", "fr"]);
        assert_eq!(config.locales.default, "en");
        assert_eq!(config.auth.session_cookie, "sid");
        assert_eq!(config.auth.protected_prefixes.len(), 3);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.upstream.url.is_none());
    }
}
