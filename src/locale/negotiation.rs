//! Locale negotiation for paths without a locale prefix.
//!
//! Order: locale cookie, then `Accept-Language` by quality, then the default.

use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};

use crate::http::cookies::cookie_value;
use crate::locale::tag::{LocaleSet, LocaleTag};

/// Parse an `Accept-Language` header into tags ordered by descending quality.
///
/// Entries with `q=0`, q-values outside `0..=1` and the `*` wildcard are
/// dropped.
/// Equal qualities keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut entries: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|raw| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                if let Some(q) = param.trim().strip_prefix("q=") {
                    quality = q.trim().parse().ok()?;
                }
            }
            ((0.0..=1.0).contains(&quality) && quality > 0.0)
                .then(|| (tag.to_string(), quality))
        })
        .collect();

    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.into_iter().map(|(tag, _)| tag).collect()
}

/// Pick the locale for a request that carries none in its path.
pub fn negotiate<'a>(
    headers: &HeaderMap,
    locales: &'a LocaleSet,
    cookie_name: &str,
    detect_from_headers: bool,
) -> &'a LocaleTag {
    if !detect_from_headers {
        return locales.default_locale();
    }

    if let Some(locale) = cookie_value(headers, cookie_name).and_then(|v| locales.get(v)) {
        return locale;
    }

    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| {
            parse_accept_language(header)
                .iter()
                .find_map(|tag| locales.lookup(tag))
        })
        .unwrap_or_else(|| locales.default_locale())
}
