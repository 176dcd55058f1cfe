//! Conduit request core: domain pipeline, adapters, and HTTP surface.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use domain::TraceId;
pub use middleware::Trace;
