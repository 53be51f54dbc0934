//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → compiled into a RuleTable and shared via Arc
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → rule table recompiled and atomically swapped
//!     → in-flight requests keep the table they started with
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A reload that fails to parse or validate keeps the current table

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::GatewayConfig;
pub use schema::HostMapConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RuleConfig;
pub use schema::TimeoutConfig;
