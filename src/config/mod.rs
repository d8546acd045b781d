//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (origin, port, flags)
//!     → cli.rs (clap parse)
//!     → loader.rs (optional TOML file underneath)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so only the origin is mandatory
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, TimeoutConfig,
    TlsConfig,
};
pub use validation::{validate_config, ValidationError};
