//! Cookie header parsing.
//!
//! Handles multiple `Cookie` headers (HTTP/2 clients send one per pair) and
//! multiple pairs per header separated by `;`.

use axum::http::{header::COOKIE, HeaderMap};

/// Value of cookie `name`, if present.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value.trim_matches('"')),
                _ => None,
            }
        })
}

/// True when cookie `name` is present with a non-empty value.
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    cookie_value(headers, name).is_some_and(|value| !value.is_empty())
}

/// Build a `Set-Cookie` value for a site-wide, lax cookie.
pub fn site_cookie(name: &str, value: &str) -> String {
    format!("{}={}; Path=/; SameSite=Lax", name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value_among_many() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; accessToken=abc.def; NEXT_LOCALE=ar"));

        assert_eq!(cookie_value(&headers, "accessToken"), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "NEXT_LOCALE"), Some("ar"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_split_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("accessToken=xyz"));

        assert!(has_cookie(&headers, "accessToken"));
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("accessToken=; other=1"));

        assert_eq!(cookie_value(&headers, "accessToken"), Some(""));
        assert!(!has_cookie(&headers, "accessToken"));
    }

    #[test]
    fn test_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("xaccessToken=1"));

        assert!(!has_cookie(&headers, "accessToken"));
    }
}
