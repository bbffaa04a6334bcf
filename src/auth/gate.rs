//! Session gate for protected storefront routes.
//!
//! # Responsibilities
//! - Strip a supported locale segment from the path
//! - Test the stripped path against the protected prefixes
//! - Redirect to the locale-aware login page when the session cookie is missing
//!
//! # Design Decisions
//! - Cookie presence is the whole check; token contents are not validated here
//! - A missing cookie is a redirect, never an error
//! - Login locale comes from the path, else the configured default

use axum::http::HeaderMap;

use crate::config::AuthConfig;
use crate::http::cookies::has_cookie;
use crate::locale::path::{split_locale_prefix, with_locale_prefix, PathLocale};
use crate::locale::tag::{LocaleSet, LocaleTag};
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Outcome of the session gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    RedirectToLogin { location: String, locale: LocaleTag },
    PassThrough,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    protected: Vec<PathPrefixMatcher>,
    session_cookie: String,
    login_path: String,
    locales: LocaleSet,
}

impl AuthGate {
    pub fn new(config: &AuthConfig, locales: LocaleSet) -> Self {
        Self {
            protected: config
                .protected_prefixes
                .iter()
                .map(PathPrefixMatcher::new)
                .collect(),
            session_cookie: config.session_cookie.clone(),
            login_path: config.login_path.clone(),
            locales,
        }
    }

    /// Remove a leading supported locale segment.
    ///
    /// Returns the stripped locale (if any) and the remaining path.
    pub fn strip_locale<'a>(&'a self, path: &'a str) -> (Option<&'a LocaleTag>, &'a str) {
        match split_locale_prefix(path, &self.locales) {
            PathLocale::Supported { locale, rest } => (Some(locale), rest),
            _ => (None, path),
        }
    }

    pub fn is_protected(&self, stripped: &str) -> bool {
        self.protected.iter().any(|m| m.matches(stripped))
    }

    pub fn check(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        let (locale, stripped) = self.strip_locale(path);

        if !self.is_protected(stripped) || has_cookie(headers, &self.session_cookie) {
            return GateDecision::PassThrough;
        }

        let locale = locale.unwrap_or_else(|| self.locales.default_locale());
        tracing::debug!(
            path = %path,
            locale = %locale,
            "Protected route without session"
        );
        GateDecision::RedirectToLogin {
            location: with_locale_prefix(locale, &self.login_path),
            locale: locale.clone(),
        }
    }
}
