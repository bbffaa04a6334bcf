//! Locale tags and the supported set.
//!
//! A tag is a lowercase two-letter language subtag with an optional
//! uppercase two-letter region (`en`, `ar`, `en-GB`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LocaleConfig;

/// Error type for locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("invalid locale tag `{0}`")]
    InvalidTag(String),
    #[error("no supported locales configured")]
    Empty,
    #[error("locale `{0}` listed more than once")]
    Duplicate(String),
    #[error("default locale `{0}` is not in the supported set")]
    DefaultNotSupported(String),
}

/// Writing direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

const RTL_LANGUAGES: &[&str] = &["ar", "he", "fa", "ur"];

/// A validated locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag(String);

impl LocaleTag {
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        if is_locale_shaped(tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(LocaleError::InvalidTag(tag.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag (`en` for `en-GB`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn direction(&self) -> TextDirection {
        if RTL_LANGUAGES.contains(&self.language()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocaleTag::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.0
    }
}

/// True when `segment` has the shape of a locale tag, supported or not.
pub fn is_locale_shaped(segment: &str) -> bool {
    let mut parts = segment.splitn(2, '-');
    let language = parts.next().unwrap_or_default();
    let language_ok = language.len() == 2 && language.bytes().all(|b| b.is_ascii_lowercase());

    match parts.next() {
        None => language_ok,
        Some(region) => {
            language_ok && region.len() == 2 && region.bytes().all(|b| b.is_ascii_uppercase())
        }
    }
}

/// The fixed set of supported locales plus the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    supported: Vec<LocaleTag>,
    default: LocaleTag,
}

impl LocaleSet {
    pub fn new(supported: Vec<LocaleTag>, default: LocaleTag) -> Result<Self, LocaleError> {
        if supported.is_empty() {
            return Err(LocaleError::Empty);
        }
        for (i, tag) in supported.iter().enumerate() {
            if supported[..i].contains(tag) {
                return Err(LocaleError::Duplicate(tag.to_string()));
            }
        }
        if !supported.contains(&default) {
            return Err(LocaleError::DefaultNotSupported(default.to_string()));
        }
        Ok(Self { supported, default })
    }

    pub fn from_config(config: &LocaleConfig) -> Result<Self, LocaleError> {
        let supported = config
            .supported
            .iter()
            .map(|tag| LocaleTag::parse(tag))
            .collect::<Result<Vec<_>, _>>()?;
        let default = LocaleTag::parse(&config.default)?;
        Self::new(supported, default)
    }

    /// Look up a supported locale by its exact tag.
    pub fn get(&self, tag: &str) -> Option<&LocaleTag> {
        self.supported.iter().find(|t| t.as_str() == tag)
    }

    /// Look up a supported locale, falling back to the language subtag
    /// (`ar-EG` → `ar`). Comparison is case-insensitive.
    pub fn lookup(&self, tag: &str) -> Option<&LocaleTag> {
        let tag = tag.trim();
        self.supported
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .or_else(|| {
                let language = tag.split('-').next()?;
                self.supported
                    .iter()
                    .find(|t| t.as_str().eq_ignore_ascii_case(language))
            })
    }

    pub fn default_locale(&self) -> &LocaleTag {
        &self.default
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleTag> {
        self.supported.iter()
    }
}
