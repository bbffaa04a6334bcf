//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the locale set (valid tags, default is supported)
//! - Validate paths, cookie names, addresses and timeouts
//! - Detect a login page that is itself protected (redirect loop)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), ValidationErrors>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::EdgeConfig;
use crate::locale::{LocaleError, LocaleSet};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },
    #[error("locales: {0}")]
    Locale(#[from] LocaleError),
    #[error("{field}: path `{value}` must start with `/`")]
    RelativePath { field: &'static str, value: String },
    #[error("auth.login_path `{0}` is covered by a protected prefix")]
    ProtectedLoginPage(String),
    #[error("{field}: invalid cookie name `{value}`")]
    InvalidCookieName { field: &'static str, value: String },
    #[error("upstream.url: {0}")]
    InvalidUpstream(String),
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// All errors found in one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &EdgeConfig) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if let Err(e) = LocaleSet::from_config(&config.locales) {
        errors.push(e.into());
    }

    check_cookie_name(&mut errors, "locales.cookie_name", &config.locales.cookie_name);
    check_cookie_name(&mut errors, "auth.session_cookie", &config.auth.session_cookie);

    for prefix in &config.auth.protected_prefixes {
        check_absolute(&mut errors, "auth.protected_prefixes", prefix);
    }
    for prefix in &config.routing.bypass_prefixes {
        check_absolute(&mut errors, "routing.bypass_prefixes", prefix);
    }
    check_absolute(&mut errors, "auth.login_path", &config.auth.login_path);

    if config
        .auth
        .protected_prefixes
        .iter()
        .any(|prefix| config.auth.login_path.starts_with(prefix.as_str()))
    {
        errors.push(ValidationError::ProtectedLoginPage(config.auth.login_path.clone()));
    }

    if let Some(raw) = &config.upstream.url {
        match Url::parse(raw) {
            Ok(url) if url.scheme() != "http" => errors.push(ValidationError::InvalidUpstream(
                format!("unsupported scheme `{}`", url.scheme()),
            )),
            Ok(url) if url.host_str().is_none() => {
                errors.push(ValidationError::InvalidUpstream(format!("`{}` has no host", raw)))
            }
            Ok(url) if url.path() != "/" || url.query().is_some() => {
                errors.push(ValidationError::InvalidUpstream(format!(
                    "`{}` must not carry a path or query; requests keep their own",
                    raw
                )))
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidUpstream(format!("`{}`: {}", raw, e))),
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_absolute(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
}

// RFC 6265 cookie-name: any token character.
fn check_cookie_name(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        });
    if !valid {
        errors.push(ValidationError::InvalidCookieName {
            field,
            value: value.to_string(),
        });
    }
}
