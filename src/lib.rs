//! Storefront edge library.
//!
//! Request interception in front of the storefront's page renderer: a
//! session gate for protected routes and locale-prefix enforcement.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod locale;
pub mod observability;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{EdgeDecision, EdgeRouter};
