//! Placeholder mini-grammar used on the expansion side.
//!
//! A parameter name inside `{...}` may carry a function application:
//!
//! ```text
//! name            resolve the parameter
//! (name)          same, parenthesized
//! [literal]       use the literal text verbatim
//! $func(name)     resolve, then apply the named function
//! $func[literal]  apply the named function to the literal
//! ```
//!
//! Malformed text degrades to "no function, no parameter, no literal"; the
//! expander then falls back to pattern passthrough instead of failing.

use super::params::{Evaluator, Resolver};

/// Parsed form of an expansion placeholder name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    function_name: Option<String>,
    parameter_name: Option<String>,
    literal: Option<String>,
}

impl Function {
    pub fn parse(text: &str) -> Self {
        let mut function_name = None;
        let mut rest = text;
        if let Some(after) = text.strip_prefix('$') {
            let end = after.find(['(', '[']).unwrap_or(after.len());
            let name = &after[..end];
            if name.is_empty() {
                return Self::default();
            }
            function_name = Some(name.to_string());
            rest = &after[end..];
            if rest.is_empty() {
                return Self {
                    function_name,
                    parameter_name: None,
                    literal: None,
                };
            }
        }
        if let Some(inner) = rest.strip_prefix('(') {
            match inner.strip_suffix(')') {
                Some(name) => Self {
                    function_name,
                    parameter_name: Some(name.to_string()),
                    literal: None,
                },
                None => Self::default(),
            }
        } else if let Some(inner) = rest.strip_prefix('[') {
            match inner.strip_suffix(']') {
                Some(literal) => Self {
                    function_name,
                    parameter_name: None,
                    literal: Some(literal.to_string()),
                },
                None => Self::default(),
            }
        } else if function_name.is_none()
            && !rest.is_empty()
            && !rest.contains(['(', ')', '[', ']'])
        {
            Self {
                function_name: None,
                parameter_name: Some(rest.to_string()),
                literal: None,
            }
        } else {
            Self::default()
        }
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    pub fn parameter_name(&self) -> Option<&str> {
        self.parameter_name.as_deref()
    }

    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Resolves the value list, then applies the function when one is named
    /// and an evaluator is available.
    pub fn evaluate(
        &self,
        resolver: &dyn Resolver,
        evaluator: Option<&dyn Evaluator>,
    ) -> Option<Vec<Option<String>>> {
        let mut values = if let Some(literal) = &self.literal {
            Some(vec![Some(literal.clone())])
        } else if let Some(name) = &self.parameter_name {
            resolver.resolve(name)
        } else {
            None
        };
        if let (Some(function), Some(evaluator)) = (&self.function_name, evaluator) {
            values = evaluator.evaluate(function, values);
        }
        values
    }
}
