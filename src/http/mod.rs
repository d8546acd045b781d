//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request-target, request ID)
//!     → proxy::Orchestrator (cache or origin)
//!     → response.rs (status, cache headers, hit/miss)
//!     → Send to client (compressed by middleware when accepted)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, request_target, X_REQUEST_ID};
pub use response::X_SNAP;
pub use server::{AppState, HttpServer, ServerError};
