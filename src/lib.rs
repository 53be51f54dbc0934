//! URL-rewriting gateway library.
//!
//! The core of the crate is the [`urltemplate`] engine: a template language
//! for URLs with named, patterned placeholders, plus a matcher that picks
//! the most specific registered template for an input URL and an expander
//! that substitutes bound values back into a target template. The remaining
//! modules wrap that engine in a reverse-proxy gateway with hot-reloadable
//! rewrite rules.

pub mod config;
pub mod functions;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod urltemplate;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::ShutdownCoordinator;
pub use routing::{RuleRegistry, RuleTable};
