//! Locale prefix detection on request paths.

use crate::locale::tag::{is_locale_shaped, LocaleSet, LocaleTag};

/// Classification of a path's first segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLocale<'a> {
    /// First segment names a supported locale.
    Supported { locale: &'a LocaleTag, rest: &'a str },
    /// First segment is locale-shaped but not supported (`/fr/...`).
    Unsupported { segment: &'a str, rest: &'a str },
    /// No locale prefix.
    Missing,
}

/// Split the leading locale segment off `path`.
///
/// A segment only counts when followed by `/` or the end of the path, so
/// `/english` has no prefix. The returned rest always starts with `/`.
pub fn split_locale_prefix<'a>(path: &'a str, locales: &'a LocaleSet) -> PathLocale<'a> {
    let Some(trimmed) = path.strip_prefix('/') else {
        return PathLocale::Missing;
    };

    let (segment, rest) = match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, "/"),
    };

    if let Some(locale) = locales.get(segment) {
        PathLocale::Supported { locale, rest }
    } else if is_locale_shaped(segment) {
        PathLocale::Unsupported { segment, rest }
    } else {
        PathLocale::Missing
    }
}

/// Prefix `path` with `locale`. The bare root becomes `/{locale}`.
pub fn with_locale_prefix(locale: &LocaleTag, path: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{}", locale)
    } else if path.starts_with('/') {
        format!("/{}{}", locale, path)
    } else {
        format!("/{}/{}", locale, path)
    }
}
