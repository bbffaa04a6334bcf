//! Locale subsystem.
//!
//! # Data Flow
//! ```text
//! Request path + headers
//!     → path.rs (split leading locale segment)
//!     → negotiation.rs (cookie, Accept-Language, default)
//!     → resolver.rs (proceed / redirect / not found)
//! ```
//!
//! # Design Decisions
//! - Supported set and default are configuration, fixed per compiled router
//! - Locale prefixes are matched per segment, never as raw string prefixes
//! - Every rendered path carries an explicit locale prefix

pub mod negotiation;
pub mod path;
pub mod resolver;
pub mod tag;

pub use resolver::{LocaleDecision, LocaleResolver};
pub use tag::{LocaleError, LocaleSet, LocaleTag, TextDirection};
