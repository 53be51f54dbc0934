//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Rule Compilation (at startup and on reload):
//!     RuleConfig[]
//!     → parse source/target patterns into Templates
//!     → build inbound + outbound matchers (rules.rs)
//!     → publish as one RuleTable behind an ArcSwap (registry.rs)
//!
//! Per request:
//!     registry.table() (lock-free Arc load)
//!     → table.match_inbound(parsed URL)
//!     → Return: matched RewriteRule + bindings, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Rules compiled at load time, immutable at runtime
//! - Deterministic: same input always matches same rule
//! - Ties resolve to the rule listed first in the config
//! - Reload swaps the whole table; requests never observe a partial update

pub mod registry;
pub mod rules;

pub use registry::RuleRegistry;
pub use rules::{RewriteRule, RuleTable};
