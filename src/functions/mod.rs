//! Rewrite functions subsystem.
//!
//! Rules can apply named functions to bound values during expansion, e.g.
//! `{$hostmap_in(host)}`. This module holds the function implementations and
//! the registry that exposes them to the template engine's `Evaluator` seam.

pub mod hostmap;
pub mod registry;

pub use hostmap::HostMap;
pub use registry::FunctionRegistry;
