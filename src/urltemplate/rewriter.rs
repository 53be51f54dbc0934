//! One-shot rewrite: match an input URL against a source pattern, carry the
//! bindings over, expand the target pattern.
//!
//! The gateway's rule table does the same dance with a prebuilt matcher; this
//! entry point serves one-off use like the CLI and tests.

use http::Uri;
use thiserror::Error;

use super::expander::{self, ExpandError};
use super::matcher::Matcher;
use super::params::{ChainedParams, Evaluator, Resolver};
use super::parser;
use super::template::Template;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("input does not match the source pattern")]
    NoMatch,
    #[error(transparent)]
    Expand(#[from] ExpandError),
}

/// Rewrites `input` from `source` to `target`. Parameters bound by the match
/// win; `resolver` fills in names the match did not bind.
pub fn rewrite(
    input: &str,
    source: &Template,
    target: &Template,
    resolver: Option<&dyn Resolver>,
    evaluator: Option<&dyn Evaluator>,
) -> Result<Uri, RewriteError> {
    let mut matcher = Matcher::new();
    matcher.add(source.clone(), ());
    let literal = parser::parse_literal(input);
    let matched = matcher.match_template(&literal).ok_or(RewriteError::NoMatch)?;
    let params = ChainedParams::new(matched.params(), resolver);
    Ok(expander::expand(target, &params, evaluator)?)
}
