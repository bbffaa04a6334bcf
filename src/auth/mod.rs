//! Authentication gate.
//!
//! Runs before locale resolution. Only checks that a session cookie exists
//! on protected routes; the storefront API validates the token itself.

pub mod gate;

pub use gate::{AuthGate, GateDecision};
