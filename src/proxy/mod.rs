//! Request orchestration.
//!
//! # Per-request flow
//! ```text
//! Received
//!     → KeyDerived (GET only; other methods skip the cache entirely)
//!     → CacheHit ─────────────────────────────→ served (HIT)
//!     → CacheMiss → Fetching → FetchOk → store → served (MISS)
//!                            → FetchFailed ───→ error (nothing stored)
//! ```
//!
//! # Design Decisions
//! - The store is owned by the orchestrator instance, not global
//! - GET fetch-and-store runs on its own task, so a client hanging up does
//!   not cancel it and the result still lands in the cache
//! - Concurrent misses on one key share a single origin fetch when enabled

pub mod orchestrator;

pub use orchestrator::{CacheStatus, Orchestrator, OrchestratorSettings, Served};
