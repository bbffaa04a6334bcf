//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/edge.rs (auth gate + locale resolver decision)
//!     → redirect / 404, or render.rs
//!     → upstream.rs (forward to renderer) or built-in page descriptor
//!     → response.rs (Content-Language, locale cookie)
//!     → Send to client
//! ```

pub mod cookies;
pub mod middleware;
pub mod render;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use middleware::ResolvedLocale;
pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
