//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (command-line flags override file values)
//!     → validation.rs (semantic checks)
//!     → cluster lookup (fills identity when an app name is configured)
//!     → GateConfig (validated, immutable)
//!     → shared via Arc with the coordinator and every steward
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the batch starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::GateConfig;
pub use schema::{
    AuthConfig, ClusterConfig, EndpointConfig, ExecutionConfig, GitConfig, HttpConfig,
    IdentityConfig, ObservabilityConfig, ReportConfig, SyncType,
};
