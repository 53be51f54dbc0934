//! Parsed URL template and its builder.
//!
//! # Responsibilities
//! - Hold the parsed form of a pattern or literal URL: one optional segment
//!   per scheme/authority component, ordered path segments, named query
//!   segments plus at most one catch-all, and structural flags.
//! - Re-serialize losslessly. `pattern()` returns the original text when the
//!   template came from the parser; `Display` rebuilds equivalent text from
//!   the segments.
//!
//! # Design Decisions
//! - Templates are immutable once built. Mutation happens only inside
//!   `TemplateBuilder`, which the parser drives.
//! - `has_scheme`/`has_query`/`has_fragment` are tracked separately from the
//!   segments so that `http:`, `?` and `#` survive a round trip even when the
//!   component itself is empty.

use super::segment::{Segment, SegmentKind};
use super::token::{Token, GLOB_PATTERN, STAR_PATTERN};

/// An immutable parsed URL or URL pattern.
#[derive(Debug, Clone)]
pub struct Template {
    original: Option<String>,
    scheme: Option<Segment>,
    has_scheme: bool,
    username: Option<Segment>,
    password: Option<Segment>,
    host: Option<Segment>,
    port: Option<Segment>,
    has_authority: bool,
    authority_only: bool,
    path: Vec<Segment>,
    is_absolute: bool,
    is_directory: bool,
    query: Vec<Segment>,
    extra: Option<Segment>,
    has_query: bool,
    fragment: Option<Segment>,
    has_fragment: bool,
}

impl Template {
    /// The text this template was parsed from, or an equivalent
    /// re-serialization when it was built programmatically.
    pub fn pattern(&self) -> String {
        match &self.original {
            Some(text) => text.clone(),
            None => self.to_string(),
        }
    }

    pub fn scheme(&self) -> Option<&Segment> {
        self.scheme.as_ref()
    }

    pub fn has_scheme(&self) -> bool {
        self.has_scheme
    }

    pub fn username(&self) -> Option<&Segment> {
        self.username.as_ref()
    }

    pub fn password(&self) -> Option<&Segment> {
        self.password.as_ref()
    }

    pub fn host(&self) -> Option<&Segment> {
        self.host.as_ref()
    }

    pub fn port(&self) -> Option<&Segment> {
        self.port.as_ref()
    }

    pub fn has_authority(&self) -> bool {
        self.has_authority
    }

    /// True for patterns like `{host}:{port}` that look like a single path
    /// segment but denote an authority.
    pub fn is_authority_only(&self) -> bool {
        self.authority_only
    }

    pub fn path(&self) -> &[Segment] {
        &self.path
    }

    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Named query segments in first-appearance order.
    pub fn query(&self) -> &[Segment] {
        &self.query
    }

    pub fn query_segment(&self, name: &str) -> Option<&Segment> {
        self.query.iter().find(|q| q.query_name() == Some(name))
    }

    /// The catch-all query segment (`?{*}`, `?{**}`, `?*`, `?**`) if present.
    pub fn extra_query(&self) -> Option<&Segment> {
        self.extra.as_ref()
    }

    pub fn has_query(&self) -> bool {
        self.has_query
    }

    pub fn fragment(&self) -> Option<&Segment> {
        self.fragment.as_ref()
    }

    pub fn has_fragment(&self) -> bool {
        self.has_fragment
    }

    fn write_segment_value(f: &mut std::fmt::Formatter<'_>, segment: &Segment) -> std::fmt::Result {
        let param = segment.param_name();
        let value = segment.first_value();
        if !param.is_empty() {
            write!(f, "{{{param}")?;
            if let Some(pattern) = value.original_pattern() {
                if !pattern.is_empty() {
                    write!(f, "={pattern}")?;
                }
            }
            write!(f, "}}")
        } else {
            f.write_str(value.original_pattern().unwrap_or(""))
        }
    }

    fn write_query_segment(f: &mut std::fmt::Formatter<'_>, segment: &Segment, value: &super::segment::Value) -> std::fmt::Result {
        let param = segment.param_name();
        let query_name = segment.query_name().unwrap_or("");
        if !param.is_empty() {
            if query_name != STAR_PATTERN && query_name != GLOB_PATTERN {
                write!(f, "{query_name}=")?;
            }
            write!(f, "{{{param}")?;
            if let Some(pattern) = value.original_pattern() {
                write!(f, "={pattern}")?;
            }
            write!(f, "}}")
        } else {
            f.write_str(query_name)?;
            if let Some(pattern) = value.original_pattern() {
                write!(f, "={pattern}")?;
            }
            Ok(())
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_scheme {
            if let Some(scheme) = &self.scheme {
                Self::write_segment_value(f, scheme)?;
            }
            write!(f, ":")?;
        }
        if self.has_authority {
            if !self.authority_only {
                write!(f, "//")?;
            }
            if self.username.is_some() || self.password.is_some() {
                if let Some(username) = &self.username {
                    Self::write_segment_value(f, username)?;
                }
                if let Some(password) = &self.password {
                    write!(f, ":")?;
                    Self::write_segment_value(f, password)?;
                }
                write!(f, "@")?;
            }
            if let Some(host) = &self.host {
                Self::write_segment_value(f, host)?;
            }
            if let Some(port) = &self.port {
                write!(f, ":")?;
                Self::write_segment_value(f, port)?;
            }
        }
        if self.is_absolute {
            write!(f, "/")?;
        }
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            Self::write_segment_value(f, segment)?;
        }
        if self.is_directory && (!self.is_absolute || !self.path.is_empty()) {
            write!(f, "/")?;
        }
        if self.has_query {
            let mut count = 0;
            for segment in &self.query {
                for value in segment.values() {
                    count += 1;
                    write!(f, "{}", if count == 1 { '?' } else { '&' })?;
                    Self::write_query_segment(f, segment, value)?;
                }
            }
            if let Some(extra) = &self.extra {
                count += 1;
                write!(f, "{}", if count == 1 { '?' } else { '&' })?;
                Self::write_query_segment(f, extra, extra.first_value())?;
            }
            if count == 0 {
                write!(f, "?")?;
            }
        }
        if self.has_fragment {
            write!(f, "#")?;
            if let Some(fragment) = &self.fragment {
                Self::write_segment_value(f, fragment)?;
            }
        }
        Ok(())
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Template {}

/// Accumulates components while the parser walks the input; `build` freezes
/// the result.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    original: Option<String>,
    literal: bool,
    scheme: Option<Segment>,
    has_scheme: bool,
    username: Option<Segment>,
    password: Option<Segment>,
    host: Option<Segment>,
    port: Option<Segment>,
    has_authority: bool,
    authority_only: bool,
    path: Vec<Segment>,
    is_absolute: bool,
    is_directory: bool,
    query: Vec<Segment>,
    extra: Option<Segment>,
    has_query: bool,
    fragment: Option<Segment>,
    has_fragment: bool,
}

impl TemplateBuilder {
    pub fn new(original: impl Into<String>, literal: bool) -> Self {
        Self {
            original: Some(original.into()),
            literal,
            ..Self::default()
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn has_scheme(&self) -> bool {
        self.has_scheme
    }

    pub fn has_authority(&self) -> bool {
        self.has_authority
    }

    pub fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn has_query(&self) -> bool {
        self.has_query
    }

    pub fn has_fragment(&self) -> bool {
        self.has_fragment
    }

    pub fn set_has_scheme(&mut self, has_scheme: bool) {
        self.has_scheme = has_scheme;
        if !has_scheme {
            self.scheme = None;
        }
    }

    pub fn set_scheme(&mut self, token: Token) {
        self.scheme = Some(Segment::new(SegmentKind::Scheme, token));
        self.has_scheme = true;
    }

    pub fn take_scheme(&mut self) -> Option<Segment> {
        self.scheme.take()
    }

    pub fn set_has_authority(&mut self, has_authority: bool) {
        self.has_authority = has_authority;
    }

    pub fn set_authority_only(&mut self, authority_only: bool) {
        self.authority_only = authority_only;
    }

    pub fn set_username(&mut self, token: Token) {
        self.username = Some(Segment::new(SegmentKind::Username, token));
        self.has_authority = true;
    }

    pub fn set_password(&mut self, token: Token) {
        self.password = Some(Segment::new(SegmentKind::Password, token));
        self.has_authority = true;
    }

    pub fn set_host(&mut self, token: Token) {
        self.host = Some(Segment::new(SegmentKind::Host, token));
        self.has_authority = true;
    }

    pub fn set_port(&mut self, token: Token) {
        self.port = Some(Segment::new(SegmentKind::Port, token));
        self.has_authority = true;
    }

    pub fn set_is_absolute(&mut self, is_absolute: bool) {
        self.is_absolute = is_absolute;
    }

    pub fn set_is_directory(&mut self, is_directory: bool) {
        self.is_directory = is_directory;
    }

    pub fn add_path(&mut self, token: Token) {
        self.path.push(Segment::new(SegmentKind::Path, token));
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    pub fn pop_path(&mut self) -> Option<Segment> {
        self.path.pop()
    }

    pub fn set_has_query(&mut self, has_query: bool) {
        self.has_query = has_query;
    }

    /// Adds a query pair. Wildcard query names route to the single catch-all
    /// slot; repeated names accumulate values on the existing segment.
    pub fn add_query(&mut self, query_name: &str, token: Token) {
        if query_name == STAR_PATTERN || query_name == GLOB_PATTERN {
            // Only the first catch-all wins; ?{*}&{**} keeps the former.
            if self.extra.is_none() {
                self.extra = Some(Segment::new(
                    SegmentKind::Query {
                        name: query_name.to_string(),
                    },
                    token,
                ));
            }
        } else if let Some(existing) = self
            .query
            .iter_mut()
            .find(|q| q.query_name() == Some(query_name))
        {
            existing.add_value(token);
        } else {
            self.query.push(Segment::new(
                SegmentKind::Query {
                    name: query_name.to_string(),
                },
                token,
            ));
        }
    }

    pub fn set_has_fragment(&mut self, has_fragment: bool) {
        self.has_fragment = has_fragment;
    }

    pub fn set_fragment(&mut self, token: Token) {
        self.fragment = Some(Segment::new(SegmentKind::Fragment, token));
        self.has_fragment = true;
    }

    pub fn build(self) -> Template {
        Template {
            original: self.original,
            scheme: self.scheme,
            has_scheme: self.has_scheme,
            username: self.username,
            password: self.password,
            host: self.host,
            port: self.port,
            has_authority: self.has_authority,
            authority_only: self.authority_only,
            path: self.path,
            is_absolute: self.is_absolute,
            is_directory: self.is_directory,
            query: self.query,
            extra: self.extra,
            has_query: self.has_query,
            fragment: self.fragment,
            has_fragment: self.has_fragment,
        }
    }
}
