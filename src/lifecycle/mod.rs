//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile rule table → Start listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then rule table, then listeners
//! - SIGTERM and SIGINT both trigger graceful shutdown

pub mod shutdown;

pub use shutdown::{listen_for_signals, Shutdown, ShutdownCoordinator};
