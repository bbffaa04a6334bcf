//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Edge middleware and handlers produce:
//!     → logging.rs (structured log events, request-scoped spans)
//!     → metrics.rs (decision counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span
//! - Metrics are cheap; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
