//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! request-target
//!     → key.rs (SHA-256 → CacheKey)
//!     → store.rs (lookup; expired entries are invisible)
//!     → [miss] inflight.rs (one origin fetch per key at a time)
//!     → store.rs (insert, last writer wins)
//!
//! Background:
//!     sweeper.rs → store.purge_expired() every sweep interval
//! ```
//!
//! # Design Decisions
//! - Values are stored behind `Arc`, so readers never see a partial record
//! - Map critical sections are O(1) and never span I/O
//! - Nothing is persisted; a restart starts cold

pub mod inflight;
pub mod key;
pub mod record;
pub mod store;
pub mod sweeper;

pub use inflight::{Abandoned, Flight, FlightGuard, InFlight};
pub use key::CacheKey;
pub use record::CachedResponse;
pub use store::{CacheStore, Expiration};
pub use sweeper::Sweeper;
