//! Parameter resolution seams.
//!
//! Values are `Option<String>` because a URL query parameter can be present
//! without a value (`?flag`), and that distinction survives matching and
//! expansion.

use std::collections::HashMap;

/// Maps a parameter name to its values. The lookup seam the expander pulls
/// from; implemented by match results, request adapters and test fixtures.
/// Resolvers are held across await points in async handlers, so trait
/// objects must be `Send + Sync`.
pub trait Resolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Vec<Option<String>>>;
}

/// A resolver that can also enumerate its names, which the expander needs to
/// drain leftovers into a catch-all query.
pub trait Params: Resolver {
    /// Names in insertion order.
    fn names(&self) -> Vec<String>;
}

/// Applies a named function to resolved values during expansion.
pub trait Evaluator: Send + Sync {
    fn evaluate(
        &self,
        function: &str,
        values: Option<Vec<Option<String>>>,
    ) -> Option<Vec<Option<String>>>;
}

/// Insertion-ordered multi-map of parameter bindings.
#[derive(Debug, Default, Clone)]
pub struct BasicParams {
    order: Vec<String>,
    values: HashMap<String, Vec<Option<String>>>,
}

impl BasicParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value under `name`, creating the binding on first use.
    pub fn add(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.values.get_mut(&name) {
            Some(existing) => existing.push(value),
            None => {
                self.order.push(name.clone());
                self.values.insert(name, vec![value]);
            }
        }
    }

    /// Binds `name` to an already-collected value list.
    pub fn add_all(&mut self, name: impl Into<String>, values: Vec<Option<String>>) {
        let name = name.into();
        match self.values.get_mut(&name) {
            Some(existing) => existing.extend(values),
            None => {
                self.order.push(name.clone());
                self.values.insert(name, values);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Resolver for BasicParams {
    fn resolve(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.values.get(name).cloned()
    }
}

impl Params for BasicParams {
    fn names(&self) -> Vec<String> {
        self.order.clone()
    }
}

/// Match bindings first, an external resolver as fallback. Only the primary
/// names are enumerable; fallback lookups happen by name.
pub struct ChainedParams<'a> {
    primary: &'a BasicParams,
    fallback: Option<&'a dyn Resolver>,
}

impl<'a> ChainedParams<'a> {
    pub fn new(primary: &'a BasicParams, fallback: Option<&'a dyn Resolver>) -> Self {
        Self { primary, fallback }
    }
}

impl Resolver for ChainedParams<'_> {
    fn resolve(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.primary
            .resolve(name)
            .or_else(|| self.fallback.and_then(|f| f.resolve(name)))
    }
}

impl Params for ChainedParams<'_> {
    fn names(&self) -> Vec<String> {
        self.primary.names()
    }
}
