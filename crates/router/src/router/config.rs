//! Router configuration, deserializable from an application config file.

use serde::Deserialize;

pub const DEFAULT_SIMPLE_THRESHOLD: usize = 8;

/// Which engine a built [`Router`](super::Router) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingPolicy {
    /// linear scan for small tables, segment tree otherwise
    #[default]
    Auto,
    Simple,
    SegmentTree,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouterConfig {
    pub routing_policy: RoutingPolicy,

    /// With [`RoutingPolicy::Auto`], tables of at most this many path routes use the linear scan.
    pub simple_threshold: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { routing_policy: RoutingPolicy::Auto, simple_threshold: DEFAULT_SIMPLE_THRESHOLD }
    }
}

impl RouterConfig {
    /// The engine for a table of `path_route_count` path routes.
    pub fn resolve(&self, path_route_count: usize) -> RoutingPolicy {
        match self.routing_policy {
            RoutingPolicy::Auto if path_route_count <= self.simple_threshold => RoutingPolicy::Simple,
            RoutingPolicy::Auto => RoutingPolicy::SegmentTree,
            policy => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RouterConfig, RoutingPolicy};

    #[test]
    fn test_resolve() {
        let config = RouterConfig::default();
        assert_eq!(config.resolve(0), RoutingPolicy::Simple);
        assert_eq!(config.resolve(8), RoutingPolicy::Simple);
        assert_eq!(config.resolve(9), RoutingPolicy::SegmentTree);

        let config = RouterConfig { routing_policy: RoutingPolicy::SegmentTree, ..RouterConfig::default() };
        assert_eq!(config.resolve(1), RoutingPolicy::SegmentTree);
        let config = RouterConfig { routing_policy: RoutingPolicy::Simple, ..RouterConfig::default() };
        assert_eq!(config.resolve(1000), RoutingPolicy::Simple);
    }

    #[test]
    fn test_deserialize() {
        let config: RouterConfig = serde_json::from_str(r#"{"routing-policy": "segment-tree"}"#).unwrap();
        assert_eq!(config, RouterConfig { routing_policy: RoutingPolicy::SegmentTree, simple_threshold: 8 });

        let config: RouterConfig = serde_json::from_str(r#"{"simple-threshold": 32}"#).unwrap();
        assert_eq!(config.routing_policy, RoutingPolicy::Auto);
        assert_eq!(config.simple_threshold, 32);

        assert_eq!(serde_json::from_str::<RouterConfig>("{}").unwrap(), RouterConfig::default());
        assert!(serde_json::from_str::<RouterConfig>(r#"{"routing-policy": "trie"}"#).is_err());
    }
}
