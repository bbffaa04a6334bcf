//! Edge decision pipeline.
//!
//! # Responsibilities
//! - Run the auth gate on every request, assets included
//! - Let bypassed requests (assets, API, health) skip the locale resolver
//! - Return exactly one decision per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Auth gate runs before the bypass check; a protected path never
//!   renders without a session, whatever its file name looks like
//! - Explicit decision values rather than responses, so the CLI and tests
//!   can inspect them without a server

use axum::http::{HeaderMap, Uri};
use serde::Serialize;

use crate::auth::{AuthGate, GateDecision};
use crate::config::EdgeConfig;
use crate::locale::{LocaleDecision, LocaleError, LocaleResolver, LocaleSet, LocaleTag};
use crate::routing::matcher::{AnyMatcher, Matcher, SegmentPrefixMatcher, StaticFileMatcher};

/// What the edge does with one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EdgeDecision {
    /// Not inspected; rendered as-is.
    Bypass,
    /// Protected route without a session.
    LoginRedirect { location: String, locale: LocaleTag },
    /// Path lacked a locale prefix.
    LocaleRedirect { location: String, locale: LocaleTag },
    /// Unsupported locale prefix.
    NotFound { segment: String },
    /// Render under the given locale.
    Render { locale: LocaleTag },
}

impl EdgeDecision {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            EdgeDecision::Bypass => "bypass",
            EdgeDecision::LoginRedirect { .. } => "login_redirect",
            EdgeDecision::LocaleRedirect { .. } => "locale_redirect",
            EdgeDecision::NotFound { .. } => "not_found",
            EdgeDecision::Render { .. } => "render",
        }
    }
}

/// Compiled auth gate + locale resolver.
#[derive(Debug)]
pub struct EdgeRouter {
    bypass: AnyMatcher,
    gate: AuthGate,
    resolver: LocaleResolver,
}

impl EdgeRouter {
    pub fn from_config(config: &EdgeConfig) -> Result<Self, LocaleError> {
        let locales = LocaleSet::from_config(&config.locales)?;

        let mut bypass: Vec<Box<dyn Matcher>> = config
            .routing
            .bypass_prefixes
            .iter()
            .map(|prefix| Box::new(SegmentPrefixMatcher::new(prefix)) as Box<dyn Matcher>)
            .collect();
        if config.routing.bypass_static_files {
            bypass.push(Box::new(StaticFileMatcher));
        }

        Ok(Self {
            bypass: AnyMatcher::new(bypass),
            gate: AuthGate::new(&config.auth, locales.clone()),
            resolver: LocaleResolver::new(locales, &config.locales),
        })
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    pub fn decide(&self, uri: &Uri, headers: &HeaderMap) -> EdgeDecision {
        let path = uri.path();

        if let GateDecision::RedirectToLogin { location, locale } = self.gate.check(path, headers) {
            return EdgeDecision::LoginRedirect { location, locale };
        }

        if self.bypass.matches(path) {
            return EdgeDecision::Bypass;
        }

        match self.resolver.resolve(uri, headers) {
            LocaleDecision::Proceed { locale } => EdgeDecision::Render { locale },
            LocaleDecision::Redirect { location, locale } => {
                EdgeDecision::LocaleRedirect { location, locale }
            }
            LocaleDecision::NotFound { segment } => EdgeDecision::NotFound { segment },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    fn router() -> EdgeRouter {
        EdgeRouter::from_config(&EdgeConfig::default()).unwrap()
    }

    fn decide(router: &EdgeRouter, uri: &str, headers: &HeaderMap) -> EdgeDecision {
        router.decide(&uri.parse::<Uri>().unwrap(), headers)
    }

    fn session() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("accessToken=t0k3n"));
        headers
    }

    fn tag(s: &str) -> LocaleTag {
        LocaleTag::parse(s).unwrap()
    }

    #[test]
    fn test_protected_without_session() {
        let r = router();
        assert_eq!(
            decide(&r, "/en/checkout", &HeaderMap::new()),
            EdgeDecision::LoginRedirect { location: "/en/login".into(), locale: tag("en") }
        );
        assert_eq!(
            decide(&r, "/checkout", &HeaderMap::new()),
            EdgeDecision::LoginRedirect { location: "/en/login".into(), locale: tag("en") }
        );
    }

    #[test]
    fn test_protected_with_session_reaches_resolver() {
        let r = router();
        assert_eq!(
            decide(&r, "/ar/profile/orders", &session()),
            EdgeDecision::Render { locale: tag("ar") }
        );
        assert_eq!(
            decide(&r, "/checkout", &session()),
            EdgeDecision::LocaleRedirect { location: "/en/checkout".into(), locale: tag("en") }
        );
    }

    #[test]
    fn test_unprotected_ignores_cookie() {
        let r = router();
        for headers in [HeaderMap::new(), session()] {
            assert_eq!(
                decide(&r, "/en/brands", &headers),
                EdgeDecision::Render { locale: tag("en") }
            );
        }
    }

    #[test]
    fn test_bypass() {
        let r = router();
        assert_eq!(decide(&r, "/_next/static/chunks/app.js", &HeaderMap::new()), EdgeDecision::Bypass);
        assert_eq!(decide(&r, "/favicon.ico", &HeaderMap::new()), EdgeDecision::Bypass);
        assert_eq!(decide(&r, "/api/products", &HeaderMap::new()), EdgeDecision::Bypass);
    }

    #[test]
    fn test_dotted_protected_paths_still_gated() {
        let r = router();
        for (path, login, locale) in [
            ("/en/checkout/receipt.pdf", "/en/login", "en"),
            ("/ar/orders/INV-2024.7", "/ar/login", "ar"),
            ("/en/profile/settings.json", "/en/login", "en"),
            ("/checkout.", "/en/login", "en"),
        ] {
            assert_eq!(
                decide(&r, path, &HeaderMap::new()),
                EdgeDecision::LoginRedirect { location: login.into(), locale: tag(locale) },
                "{}",
                path
            );
        }

        // With a session the file is served as a static asset.
        assert_eq!(decide(&r, "/en/checkout/receipt.pdf", &session()), EdgeDecision::Bypass);
    }

    #[test]
    fn test_bypass_prefixes_are_segment_aware() {
        let r = router();
        assert_eq!(
            decide(&r, "/apiary", &HeaderMap::new()),
            EdgeDecision::LocaleRedirect { location: "/en/apiary".into(), locale: tag("en") }
        );
        assert_eq!(
            decide(&r, "/healthzcheck", &HeaderMap::new()),
            EdgeDecision::LocaleRedirect { location: "/en/healthzcheck".into(), locale: tag("en") }
        );
        assert!(matches!(decide(&r, "/_nextgen/x", &HeaderMap::new()), EdgeDecision::LocaleRedirect { .. }));
        assert_eq!(decide(&r, "/api", &HeaderMap::new()), EdgeDecision::Bypass);
    }

    #[test]
    fn test_not_found_for_unsupported_locale() {
        let r = router();
        assert_eq!(
            decide(&r, "/fr/brands", &HeaderMap::new()),
            EdgeDecision::NotFound { segment: "fr".into() }
        );
    }

    #[test]
    fn test_decision_serializes_with_outcome_tag() {
        let json = serde_json::to_value(EdgeDecision::LoginRedirect {
            location: "/ar/login".into(),
            locale: tag("ar"),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({"outcome": "login_redirect", "location": "/ar/login", "locale": "ar"})
        );
    }
}
