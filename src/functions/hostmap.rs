//! Static host mapping function.
//!
//! Hosts inside the protected network rarely resolve for external clients.
//! Rules reference `{$hostmap_in(host)}` / `{$hostmap_out(host)}` to swap a
//! host name across that boundary using the static table from the config.

use std::collections::HashMap;

use crate::config::HostMapConfig;

/// Maps host names across the gateway boundary. Unknown hosts pass through
/// unchanged, so a partial table degrades instead of breaking rewrites.
#[derive(Debug, Default)]
pub struct HostMap {
    to_internal: HashMap<String, String>,
    to_external: HashMap<String, String>,
}

impl HostMap {
    pub fn from_config(mappings: &[HostMapConfig]) -> Self {
        let mut to_internal = HashMap::new();
        let mut to_external = HashMap::new();
        for mapping in mappings {
            to_internal.insert(mapping.external.clone(), mapping.internal.clone());
            to_external.insert(mapping.internal.clone(), mapping.external.clone());
        }
        Self {
            to_internal,
            to_external,
        }
    }

    pub fn internal_host<'a>(&'a self, host: &'a str) -> &'a str {
        self.to_internal.get(host).map(String::as_str).unwrap_or(host)
    }

    pub fn external_host<'a>(&'a self, host: &'a str) -> &'a str {
        self.to_external.get(host).map(String::as_str).unwrap_or(host)
    }

    fn apply(
        &self,
        direction: fn(&Self, &str) -> String,
        values: Option<Vec<Option<String>>>,
    ) -> Option<Vec<Option<String>>> {
        values.map(|values| {
            values
                .into_iter()
                .map(|value| value.map(|host| direction(self, &host)))
                .collect()
        })
    }

    pub fn map_to_internal(
        &self,
        values: Option<Vec<Option<String>>>,
    ) -> Option<Vec<Option<String>>> {
        self.apply(|map, host| map.internal_host(host).to_string(), values)
    }

    pub fn map_to_external(
        &self,
        values: Option<Vec<Option<String>>>,
    ) -> Option<Vec<Option<String>>> {
        self.apply(|map, host| map.external_host(host).to_string(), values)
    }
}
