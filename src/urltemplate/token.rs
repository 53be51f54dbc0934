//! Smallest unit produced by the template parser.
//!
//! A token records what the author wrote (`original_pattern`) separately from
//! what the engine matches against (`effective_pattern`). The two differ for
//! bare placeholders like `{host}`, where the original text carries no pattern
//! and the parser substitutes a positional default.

/// Parameter name used for anonymous placeholders such as bare `*` and `**`.
pub const ANONYMOUS_PARAM: &str = "";

/// Literal `*` wildcard pattern.
pub const STAR_PATTERN: &str = "*";

/// Literal `**` wildcard pattern.
pub const GLOB_PATTERN: &str = "**";

/// One parsed unit of a URL template: a parameter name, the pattern text as
/// written, and the pattern actually used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    parameter_name: String,
    original_pattern: Option<String>,
    effective_pattern: Option<String>,
    literal: bool,
}

impl Token {
    /// Token whose effective pattern may differ from the written one.
    pub fn new(
        parameter_name: impl Into<String>,
        original_pattern: Option<String>,
        effective_pattern: Option<String>,
        literal: bool,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            original_pattern,
            effective_pattern,
            literal,
        }
    }

    /// Token where the written pattern is also the effective one.
    pub fn with_pattern(
        parameter_name: impl Into<String>,
        pattern: Option<String>,
        literal: bool,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            original_pattern: pattern.clone(),
            effective_pattern: pattern,
            literal,
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn original_pattern(&self) -> Option<&str> {
        self.original_pattern.as_deref()
    }

    /// Pattern used for matching. Falls back to the original pattern when no
    /// default was substituted.
    pub fn effective_pattern(&self) -> Option<&str> {
        self.effective_pattern
            .as_deref()
            .or(self.original_pattern.as_deref())
    }

    /// True when the token came from `parse_literal` and wildcard characters
    /// carry no special meaning.
    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.effective_pattern() {
            Some(p) => f.write_str(p),
            None => f.write_str(&self.parameter_name),
        }
    }
}
