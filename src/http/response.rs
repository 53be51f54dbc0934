//! Response handling and transformation.
//!
//! # Responsibilities
//! - Rewrite the `Location` header of upstream redirects through the
//!   outbound rule table, so clients are sent back through the gateway
//!   instead of straight at internal hosts
//!
//! # Design Decisions
//! - A Location that matches no outbound rule passes through unchanged; the
//!   gateway degrades to plain proxying rather than failing the response
//! - Streaming bodies are untouched; only headers are transformed

use axum::http::{header, HeaderMap, HeaderValue};

use crate::functions::FunctionRegistry;
use crate::routing::RuleTable;
use crate::urltemplate::expander;
use crate::urltemplate::params::ChainedParams;
use crate::urltemplate::parser::parse_literal;

/// Rewrites the Location header in place when an outbound rule matches.
/// Returns the name of the applied rule.
pub fn rewrite_location(
    table: &RuleTable,
    functions: &FunctionRegistry,
    headers: &mut HeaderMap,
) -> Option<String> {
    let location = headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())?
        .to_string();

    let input = parse_literal(&location);
    let matched = table.match_outbound(&input)?;
    let rule = matched.value().clone();
    let params = ChainedParams::new(matched.params(), None);

    match expander::expand(&rule.target, &params, Some(functions)) {
        Ok(uri) => match HeaderValue::from_str(&uri.to_string()) {
            Ok(value) => {
                headers.insert(header::LOCATION, value);
                Some(rule.name.clone())
            }
            Err(_) => None,
        },
        Err(e) => {
            tracing::warn!(rule = %rule.name, location = %location, error = %e, "Location rewrite failed, passing through");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, RuleConfig};

    fn table() -> RuleTable {
        let mut config = GatewayConfig::default();
        config.responses.push(RuleConfig {
            name: "redirects".to_string(),
            source: "http://{host=*}:50070/{path=**}".to_string(),
            target: "https://gateway:8443/proxy/{path}".to_string(),
        });
        RuleTable::from_config(&config)
    }

    fn functions() -> FunctionRegistry {
        FunctionRegistry::from_config(&GatewayConfig::default())
    }

    #[test]
    fn rewrites_matching_location() {
        let table = table();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::LOCATION,
            HeaderValue::from_static("http://namenode:50070/webhdfs/v1/tmp"),
        );

        let applied = rewrite_location(&table, &functions(), &mut headers);
        assert_eq!(applied.as_deref(), Some("redirects"));
        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "https://gateway:8443/proxy/webhdfs/v1/tmp"
        );
    }

    #[test]
    fn unmatched_location_passes_through() {
        let table = table();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::LOCATION,
            HeaderValue::from_static("http://elsewhere/none"),
        );

        assert!(rewrite_location(&table, &functions(), &mut headers).is_none());
        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "http://elsewhere/none"
        );
    }

    #[test]
    fn missing_location_is_a_noop() {
        let table = table();
        let mut headers = HeaderMap::new();
        assert!(rewrite_location(&table, &functions(), &mut headers).is_none());
    }
}
