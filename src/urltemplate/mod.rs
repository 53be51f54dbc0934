//! URL template engine: parse, match, expand, rewrite.
//!
//! # Responsibilities
//! - Parse pattern text (`*://*:*/gateway/{version}/{path=**}`) and concrete
//!   URLs into the same [`Template`] shape.
//! - Match input URLs against a registry of templates and extract parameter
//!   bindings ([`Matcher`]).
//! - Expand templates back into text or validated URIs from a set of
//!   parameter bindings ([`expander`]).
//! - Combine the two into a one-shot rewrite ([`rewriter`]).
//!
//! # Data Flow
//! ```text
//! pattern text ──parse_template──> Template ──Matcher::add──> tree
//! request URL ──parse_literal───> Template ──Matcher::match──> Match(params)
//! Match(params) + target Template ──expander::expand──> rewritten URI
//! ```
//!
//! Everything in here is immutable after construction and safe to share
//! across request tasks behind an `Arc`.

pub mod expander;
pub mod function;
pub mod matcher;
pub mod params;
pub mod parser;
pub mod rewriter;
pub mod segment;
pub mod template;
pub mod token;

pub use expander::{expand, expand_to_string, expand_to_template, ExpandError};
pub use function::Function;
pub use matcher::{Match, Matcher};
pub use params::{BasicParams, ChainedParams, Evaluator, Params, Resolver};
pub use parser::{parse_literal, parse_template};
pub use rewriter::{rewrite, RewriteError};
pub use segment::{Segment, SegmentKind, Value, ValueKind};
pub use template::{Template, TemplateBuilder};
pub use token::Token;
