//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, cookies, Accept-Language)
//!     → matcher.rs (bypass prefixes, static files)
//!     → auth gate (login redirect)
//!     → locale resolver (locale redirect / not found / render)
//!     → router.rs returns one EdgeDecision
//!
//! Compilation (at startup and on reload):
//!     EdgeConfig
//!     → LocaleSet, AuthGate, LocaleResolver, bypass matchers
//!     → Freeze as immutable EdgeRouter
//! ```
//!
//! # Design Decisions
//! - Router compiled from config, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision

pub mod matcher;
pub mod router;

pub use router::{EdgeDecision, EdgeRouter};
