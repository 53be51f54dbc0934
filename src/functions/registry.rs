//! Name-to-function dispatch for the expansion side.
//!
//! Implements the engine's `Evaluator` seam. Unknown function names return
//! no values, which the expander turns into pattern passthrough; a typo in a
//! rule degrades that one placeholder instead of the whole rewrite.

use crate::config::GatewayConfig;
use crate::functions::hostmap::HostMap;
use crate::urltemplate::params::Evaluator;

/// The functions available to rewrite rules.
pub struct FunctionRegistry {
    hostmap: HostMap,
}

impl FunctionRegistry {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            hostmap: HostMap::from_config(&config.hostmap),
        }
    }

    pub fn hostmap(&self) -> &HostMap {
        &self.hostmap
    }
}

impl Evaluator for FunctionRegistry {
    fn evaluate(
        &self,
        function: &str,
        values: Option<Vec<Option<String>>>,
    ) -> Option<Vec<Option<String>>> {
        match function {
            "hostmap_in" => self.hostmap.map_to_internal(values),
            "hostmap_out" => self.hostmap.map_to_external(values),
            other => {
                tracing::debug!(function = other, "unknown rewrite function");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, HostMapConfig};
    use crate::urltemplate::expander::expand_to_string;
    use crate::urltemplate::params::BasicParams;
    use crate::urltemplate::parser::parse_template;

    fn registry() -> FunctionRegistry {
        let mut config = GatewayConfig::default();
        config.hostmap.push(HostMapConfig {
            external: "gw.example.com".to_string(),
            internal: "nn.internal".to_string(),
        });
        FunctionRegistry::from_config(&config)
    }

    #[test]
    fn hostmap_function_in_a_rule_target() {
        let registry = registry();
        let target = parse_template("http://{$hostmap_in(host)}:50070/{path=**}");
        let mut params = BasicParams::new();
        params.add("host", Some("gw.example.com".to_string()));
        params.add("path", Some("webhdfs".to_string()));

        assert_eq!(
            expand_to_string(&target, &params, Some(&registry)),
            "http://nn.internal:50070/webhdfs"
        );
    }

    #[test]
    fn unknown_function_degrades_to_passthrough() {
        let registry = registry();
        let target = parse_template("http://{$nosuch(host)}/");
        let mut params = BasicParams::new();
        params.add("host", Some("h".to_string()));

        // No values come back, so the placeholder name is re-emitted.
        assert_eq!(
            expand_to_string(&target, &params, Some(&registry)),
            "http://$nosuch(host)/"
        );
    }
}
