//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection (plain)  → axum::serve → HTTP layer
//! Incoming TCP connection (TLS)    → tls.rs (rustls handshake) → HTTP layer
//! ```
//!
//! # Design Decisions
//! - Both listeners share one router, and therefore one cache
//! - TLS is optional; missing certificates only disable HTTPS

pub mod tls;
