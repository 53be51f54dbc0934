//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check rule integrity (unique names, non-empty patterns)
//! - Validate addresses and host mappings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig -> Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("rule '{0}' appears more than once")]
    DuplicateRuleName(String),
    #[error("rule at index {0} has an empty name")]
    EmptyRuleName(usize),
    #[error("rule '{rule}' has an empty {field} pattern")]
    EmptyPattern { rule: String, field: &'static str },
    #[error("host mapping for external host '{0}' appears more than once")]
    DuplicateHostMapping(String),
    #[error("host mapping with empty {0} host")]
    EmptyHostMapping(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (i, rule) in config.rules.iter().chain(config.responses.iter()).enumerate() {
        if rule.name.is_empty() {
            errors.push(ValidationError::EmptyRuleName(i));
        } else if !seen.insert(rule.name.as_str()) {
            errors.push(ValidationError::DuplicateRuleName(rule.name.clone()));
        }
        if rule.source.is_empty() {
            errors.push(ValidationError::EmptyPattern {
                rule: rule.name.clone(),
                field: "source",
            });
        }
        if rule.target.is_empty() {
            errors.push(ValidationError::EmptyPattern {
                rule: rule.name.clone(),
                field: "target",
            });
        }
    }

    let mut hosts = HashSet::new();
    for mapping in &config.hostmap {
        if mapping.external.is_empty() {
            errors.push(ValidationError::EmptyHostMapping("external"));
        } else if !hosts.insert(mapping.external.as_str()) {
            errors.push(ValidationError::DuplicateHostMapping(
                mapping.external.clone(),
            ));
        }
        if mapping.internal.is_empty() {
            errors.push(ValidationError::EmptyHostMapping("internal"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{HostMapConfig, RuleConfig};

    fn rule(name: &str) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            source: "/in/{p=**}".to_string(),
            target: "/out/{p}".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut config = GatewayConfig::default();
        config.rules.push(rule("a"));
        config.responses.push(rule("b"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.rules.push(rule("dup"));
        config.rules.push(rule("dup"));
        let mut empty = rule("empty");
        empty.source = String::new();
        config.rules.push(empty);
        config.hostmap.push(HostMapConfig {
            external: "e".to_string(),
            internal: String::new(),
        });
        config.hostmap.push(HostMapConfig {
            external: "e".to_string(),
            internal: "i".to_string(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidBindAddress(
            "not-an-address".to_string()
        )));
        assert!(errors.contains(&ValidationError::DuplicateRuleName("dup".to_string())));
        assert!(errors.contains(&ValidationError::EmptyPattern {
            rule: "empty".to_string(),
            field: "source",
        }));
        assert!(errors.contains(&ValidationError::EmptyHostMapping("internal")));
        assert!(errors.contains(&ValidationError::DuplicateHostMapping("e".to_string())));
    }
}
