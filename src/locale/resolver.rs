//! Locale enforcement for requests the auth gate let through.
//!
//! # Responsibilities
//! - Keep requests that already carry a supported locale prefix
//! - Reject locale-shaped prefixes outside the supported set
//! - Redirect everything else to a locale-prefixed path

use axum::http::{HeaderMap, Uri};

use crate::config::LocaleConfig;
use crate::locale::negotiation::negotiate;
use crate::locale::path::{split_locale_prefix, with_locale_prefix, PathLocale};
use crate::locale::tag::{LocaleError, LocaleSet, LocaleTag};

/// Outcome of locale resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleDecision {
    /// Path carries a supported locale; render under it.
    Proceed { locale: LocaleTag },
    /// Path has no locale; send the client to the prefixed path.
    Redirect { location: String, locale: LocaleTag },
    /// Path names a locale the storefront does not serve.
    NotFound { segment: String },
}

#[derive(Debug, Clone)]
pub struct LocaleResolver {
    locales: LocaleSet,
    cookie_name: String,
    detect_from_headers: bool,
    reject_unknown: bool,
}

impl LocaleResolver {
    pub fn new(locales: LocaleSet, config: &LocaleConfig) -> Self {
        Self {
            locales,
            cookie_name: config.cookie_name.clone(),
            detect_from_headers: config.detect_from_headers,
            reject_unknown: config.reject_unknown,
        }
    }

    pub fn from_config(config: &LocaleConfig) -> Result<Self, LocaleError> {
        Ok(Self::new(LocaleSet::from_config(config)?, config))
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn resolve(&self, uri: &Uri, headers: &HeaderMap) -> LocaleDecision {
        let path = uri.path();

        match split_locale_prefix(path, &self.locales) {
            PathLocale::Supported { locale, .. } => LocaleDecision::Proceed {
                locale: locale.clone(),
            },
            PathLocale::Unsupported { segment, .. } if self.reject_unknown => {
                LocaleDecision::NotFound {
                    segment: segment.to_string(),
                }
            }
            PathLocale::Unsupported { .. } | PathLocale::Missing => {
                let locale = negotiate(
                    headers,
                    &self.locales,
                    &self.cookie_name,
                    self.detect_from_headers,
                );
                let mut location = with_locale_prefix(locale, path);
                if let Some(query) = uri.query() {
                    location.push('?');
                    location.push_str(query);
                }
                LocaleDecision::Redirect {
                    location,
                    locale: locale.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::ACCEPT_LANGUAGE, HeaderValue};

    fn resolver() -> LocaleResolver {
        LocaleResolver::from_config(&LocaleConfig::default()).unwrap()
    }

    fn resolve(resolver: &LocaleResolver, uri: &str, headers: &HeaderMap) -> LocaleDecision {
        resolver.resolve(&uri.parse::<Uri>().unwrap(), headers)
    }

    #[test]
    fn test_prefixed_path_proceeds() {
        let r = resolver();
        assert_eq!(
            resolve(&r, "/ar/brands", &HeaderMap::new()),
            LocaleDecision::Proceed { locale: LocaleTag::parse("ar").unwrap() }
        );
    }

    #[test]
    fn test_missing_prefix_redirects_with_query() {
        let r = resolver();
        assert_eq!(
            resolve(&r, "/brands?page=2", &HeaderMap::new()),
            LocaleDecision::Redirect {
                location: "/en/brands?page=2".into(),
                locale: LocaleTag::parse("en").unwrap(),
            }
        );
    }

    #[test]
    fn test_root_redirects_to_negotiated_locale() {
        let r = resolver();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ar-SA,ar;q=0.9"));

        match resolve(&r, "/", &headers) {
            LocaleDecision::Redirect { location, .. } => assert_eq!(location, "/ar"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_locale_not_found() {
        let r = resolver();
        assert_eq!(
            resolve(&r, "/fr/brands", &HeaderMap::new()),
            LocaleDecision::NotFound { segment: "fr".into() }
        );
    }

    #[test]
    fn test_unknown_locale_redirects_when_lenient() {
        let config = LocaleConfig {
            reject_unknown: false,
            ..LocaleConfig::default()
        };
        let r = LocaleResolver::from_config(&config).unwrap();

        match resolve(&r, "/tv/deals", &HeaderMap::new()) {
            LocaleDecision::Redirect { location, .. } => assert_eq!(location, "/en/tv/deals"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
