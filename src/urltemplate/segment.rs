//! Segments and their match values.
//!
//! # Responsibilities
//! - Classify every pattern into a closed set of value kinds ordered by
//!   specificity (`Static` beats `Regex` beats `Star` beats `Glob`).
//! - Compile `*` wildcard patterns into anchored regexes once, at parse time.
//! - Decide segment-vs-segment compatibility for the matcher tree.
//!
//! # Design Decisions
//! - A segment can hold several values. Repeated query pairs in a literal URL
//!   (`?q=a&q=b`) collapse into one segment with two values, which is how
//!   multi-valued parameters enter the engine.
//! - Wildcard compilation escapes everything that is not `*`, so a pattern can
//!   never fail to compile and regex metacharacters in URLs stay literal.

use regex::Regex;

use super::token::{Token, GLOB_PATTERN, STAR_PATTERN};

/// Which URL component a segment belongs to. Segments only ever match
/// segments of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Scheme,
    Username,
    Password,
    Host,
    Port,
    Path,
    Fragment,
    Query { name: String },
}

impl SegmentKind {
    /// True when both segments belong to the same URL component, ignoring
    /// query names. Query-name comparison is the matcher's job.
    pub fn same_component(&self, other: &SegmentKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// How a value matches, from most to least specific. The derived `Ord`
/// follows that order, so `min` picks the most specific kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueKind {
    /// Exact text comparison.
    Static,
    /// Pattern containing `*` mixed with literal text, e.g. `*.ext`.
    Regex,
    /// Bare `*`: exactly one segment.
    Star,
    /// Bare `**` (or an empty pattern): zero or more segments.
    Glob,
}

/// One matchable pattern inside a segment.
#[derive(Debug, Clone)]
pub struct Value {
    token: Token,
    kind: ValueKind,
    regex: Option<Regex>,
}

impl Value {
    fn new(token: Token) -> Self {
        let (kind, regex) = match token.effective_pattern() {
            _ if token.is_literal() => (ValueKind::Static, None),
            Some("") => (ValueKind::Glob, None),
            Some(STAR_PATTERN) => (ValueKind::Star, None),
            Some(GLOB_PATTERN) => (ValueKind::Glob, None),
            Some(p) if p.contains('*') => (ValueKind::Regex, compile_wildcard(p)),
            _ => (ValueKind::Static, None),
        };
        Self { token, kind, regex }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn original_pattern(&self) -> Option<&str> {
        self.token.original_pattern()
    }

    pub fn effective_pattern(&self) -> Option<&str> {
        self.token.effective_pattern()
    }

    /// Whether this template value accepts the given input value.
    pub fn matches(&self, input: &Value) -> bool {
        match self.kind {
            ValueKind::Static => self.token.original_pattern() == input.token.original_pattern(),
            ValueKind::Star | ValueKind::Glob => true,
            ValueKind::Regex => match (&self.regex, input.token.effective_pattern()) {
                (Some(regex), Some(text)) => regex.is_match(text),
                _ => false,
            },
        }
    }
}

/// Compiles a `*` wildcard pattern into an anchored regex. Everything except
/// `*` is escaped, so compilation cannot fail on URL text.
fn compile_wildcard(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^(?:{body})$")).ok()
}

/// One component of a parsed template: the kind, and the value patterns the
/// component may take.
#[derive(Debug, Clone)]
pub struct Segment {
    kind: SegmentKind,
    values: Vec<Value>,
}

impl Segment {
    pub fn new(kind: SegmentKind, token: Token) -> Self {
        Self {
            kind,
            values: vec![Value::new(token)],
        }
    }

    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    pub fn query_name(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Query { name } => Some(name),
            _ => None,
        }
    }

    pub fn param_name(&self) -> &str {
        self.values[0].token().parameter_name()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn first_value(&self) -> &Value {
        &self.values[0]
    }

    /// Adds another value pattern, deduplicating on effective pattern the way
    /// repeated literal query pairs collapse.
    pub fn add_value(&mut self, token: Token) {
        let value = Value::new(token);
        if self
            .values
            .iter()
            .any(|v| v.effective_pattern() == value.effective_pattern())
        {
            return;
        }
        self.values.push(value);
    }

    /// Most specific kind among this segment's values.
    pub fn min_kind(&self) -> ValueKind {
        self.values
            .iter()
            .map(Value::kind)
            .min()
            .unwrap_or(ValueKind::Glob)
    }

    /// True when any value is a glob, i.e. the segment can span zero or more
    /// input segments.
    pub fn is_glob(&self) -> bool {
        self.values.iter().any(|v| v.kind() == ValueKind::Glob)
    }

    /// Whether this template segment accepts the given input segment: same
    /// URL component and at least one compatible value pair.
    pub fn matches(&self, input: &Segment) -> bool {
        if !self.kind.same_component(&input.kind) {
            return false;
        }
        self.values
            .iter()
            .any(|v| input.values.iter().any(|i| v.matches(i)))
    }

    /// Structural equality used to share matcher-tree nodes between templates:
    /// same kind, same parameter name, same set of effective patterns.
    pub fn same_shape(&self, other: &Segment) -> bool {
        self.kind == other.kind
            && self.param_name() == other.param_name()
            && self.values.len() == other.values.len()
            && self.values.iter().all(|v| {
                other
                    .values
                    .iter()
                    .any(|o| o.effective_pattern() == v.effective_pattern())
            })
    }
}
