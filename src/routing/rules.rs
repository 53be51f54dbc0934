//! Rule compilation.
//!
//! # Responsibilities
//! - Compile `RuleConfig` pattern strings into parsed templates once, at
//!   load time.
//! - Build one matcher for the inbound direction (request URLs) and one for
//!   the outbound direction (upstream redirect URLs).
//!
//! # Design Decisions
//! - Rules compiled at load time, immutable at runtime
//! - Registration order follows config order, so ties between equally
//!   specific rules resolve to the one listed first
//! - Deterministic: same input always matches same rule

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::functions::FunctionRegistry;
use crate::urltemplate::matcher::{Match, Matcher};
use crate::urltemplate::parser::parse_template;
use crate::urltemplate::template::Template;

/// One compiled rewrite rule.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: String,
    pub source: Template,
    pub target: Template,
}

/// Compiled rule set for both directions, plus the rewrite functions built
/// from the same config. Immutable; swapped wholesale on reload, so rules
/// and host mappings always come from the same config revision.
pub struct RuleTable {
    inbound: Matcher<Arc<RewriteRule>>,
    outbound: Matcher<Arc<RewriteRule>>,
    functions: FunctionRegistry,
}

impl RuleTable {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut inbound = Matcher::new();
        for rule in &config.rules {
            let compiled = Arc::new(RewriteRule {
                name: rule.name.clone(),
                source: parse_template(&rule.source),
                target: parse_template(&rule.target),
            });
            inbound.add(compiled.source.clone(), compiled.clone());
        }
        let mut outbound = Matcher::new();
        for rule in &config.responses {
            let compiled = Arc::new(RewriteRule {
                name: rule.name.clone(),
                source: parse_template(&rule.source),
                target: parse_template(&rule.target),
            });
            outbound.add(compiled.source.clone(), compiled.clone());
        }
        Self {
            inbound,
            outbound,
            functions: FunctionRegistry::from_config(config),
        }
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn match_inbound(&self, input: &Template) -> Option<Match<'_, Arc<RewriteRule>>> {
        self.inbound.match_template(input)
    }

    pub fn match_outbound(&self, input: &Template) -> Option<Match<'_, Arc<RewriteRule>>> {
        self.outbound.match_template(input)
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::urltemplate::parser::parse_literal;

    fn config_with_rules(rules: &[(&str, &str, &str)]) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        for (name, source, target) in rules {
            config.rules.push(RuleConfig {
                name: name.to_string(),
                source: source.to_string(),
                target: target.to_string(),
            });
        }
        config
    }

    #[test]
    fn compiles_and_matches_in_config_order() {
        let table = RuleTable::from_config(&config_with_rules(&[
            ("first", "/svc/{a=*}", "/one/{a}"),
            ("second", "/svc/{b=*}", "/two/{b}"),
        ]));
        let m = table.match_inbound(&parse_literal("/svc/x")).unwrap();
        assert_eq!(m.value().name, "first");
    }

    #[test]
    fn directions_are_independent() {
        let mut config = config_with_rules(&[("in", "/in/{p=**}", "/fwd/{p}")]);
        config.responses.push(RuleConfig {
            name: "out".to_string(),
            source: "http://internal:50070/{p=**}".to_string(),
            target: "https://gateway:8443/{p}".to_string(),
        });
        let table = RuleTable::from_config(&config);

        assert!(table.match_inbound(&parse_literal("/in/a")).is_some());
        assert!(table
            .match_inbound(&parse_literal("http://internal:50070/x"))
            .is_none());
        assert!(table
            .match_outbound(&parse_literal("http://internal:50070/x"))
            .is_some());
    }
}
