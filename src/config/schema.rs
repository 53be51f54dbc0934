//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the rewrite gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Inbound rewrite rules: request URL -> upstream URL.
    pub rules: Vec<RuleConfig>,

    /// Outbound rewrite rules: upstream redirect URL -> gateway URL.
    pub responses: Vec<RuleConfig>,

    /// Static host mappings used by the `hostmap` rewrite functions.
    pub hostmap: Vec<HostMapConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// One rewrite rule: a source pattern and a target pattern in the URL
/// template language.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Rule identifier for logging/metrics.
    pub name: String,

    /// Pattern matched against incoming URLs,
    /// e.g. `*://*:*/gateway/webhdfs/{version}/{path=**}`.
    pub source: String,

    /// Pattern expanded with the matched bindings,
    /// e.g. `http://namenode:50070/webhdfs/{version}/{path}`.
    pub target: String,
}

/// One static external-to-internal host mapping.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostMapConfig {
    /// Host name as seen by clients.
    pub external: String,

    /// Host name inside the protected network.
    pub internal: String,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[rules]]
            name = "webhdfs"
            source = "*://*:*/gateway/webhdfs/{version}/{path=**}"
            target = "http://namenode:50070/webhdfs/{version}/{path}"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].name, "webhdfs");
        assert!(config.responses.is_empty());
    }

    #[test]
    fn defaults_are_complete() {
        let config = GatewayConfig::default();
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.observability.metrics_enabled);
    }
}
