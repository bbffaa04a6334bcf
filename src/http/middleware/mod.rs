pub mod edge;

pub use edge::{edge_middleware, ResolvedLocale};
