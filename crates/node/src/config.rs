//! Node configuration handling.

use std::fs;
use std::path::Path;
use std::time::Duration;

use libp2p::Multiaddr;
use serde::{Deserialize, Serialize};
use strata_net_address::{AddressManagerConfig, AnnounceFilter, DEFAULT_QUIET_PERIOD};
use strata_net_transport::{FaultTolerance, TransportManagerConfig};
use thiserror::Error;

use crate::logging::LogConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid multiaddr {addr:?}: {source}")]
    InvalidMultiaddr {
        addr: String,
        #[source]
        source: libp2p::multiaddr::Error,
    },
}

/// Configuration for a strata node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub transport: TransportConfig,
    pub addresses: AddressConfig,
    /// Quiet period before confirmed observed addresses reach the peer store
    pub confirmation_quiet_period_ms: u64,
    pub log: LogConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            addresses: AddressConfig::default(),
            confirmation_quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub fault_tolerance: FaultTolerance,
}

/// Addresses as multiaddr strings, validated by [`NodeConfig::address_manager_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    /// Addresses to listen on
    pub listen: Vec<String>,
    /// Addresses advertised regardless of what is bound
    pub announce: Vec<String>,
    /// Addresses never advertised
    pub no_announce: Vec<String>,
}

fn parse_multiaddrs(addrs: &[String]) -> Result<Vec<Multiaddr>, ConfigError> {
    addrs
        .iter()
        .map(|addr| {
            addr.parse()
                .map_err(|source| ConfigError::InvalidMultiaddr {
                    addr: addr.clone(),
                    source,
                })
        })
        .collect()
}

impl NodeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn transport_manager_config(&self) -> TransportManagerConfig {
        TransportManagerConfig {
            fault_tolerance: self.transport.fault_tolerance,
            ..Default::default()
        }
    }

    /// Address manager config with every multiaddr parsed.
    pub fn address_manager_config(
        &self,
        announce_filter: AnnounceFilter,
    ) -> Result<AddressManagerConfig, ConfigError> {
        Ok(AddressManagerConfig::default()
            .with_listen(parse_multiaddrs(&self.addresses.listen)?)
            .with_announce(parse_multiaddrs(&self.addresses.announce)?)
            .with_no_announce(parse_multiaddrs(&self.addresses.no_announce)?)
            .with_announce_filter(announce_filter)
            .with_quiet_period(Duration::from_millis(self.confirmation_quiet_period_ms)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NodeConfig::from_toml_str("").unwrap();
        assert_eq!(config.transport.fault_tolerance, FaultTolerance::FatalAll);
        assert_eq!(config.confirmation_quiet_period_ms, 1500);
        assert!(config.addresses.listen.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = NodeConfig::from_toml_str(
            r#"
            confirmation_quiet_period_ms = 250

            [transport]
            fault_tolerance = "no_fatal"

            [addresses]
            listen = ["/ip4/0.0.0.0/tcp/4001", "/ip4/0.0.0.0/tcp/4001"]
            announce = ["/dns4/node.example.com/tcp/4001"]
            no_announce = ["/ip4/127.0.0.1/tcp/4001"]

            [log]
            verbosity = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.transport.fault_tolerance, FaultTolerance::NoFatal);
        assert_eq!(config.log.verbosity, 2);

        let am = config
            .address_manager_config(AnnounceFilter::default())
            .unwrap();
        assert_eq!(am.listen.len(), 2);
        assert_eq!(am.listen[0], am.listen[1]);
        assert_eq!(am.announce.len(), 1);
        assert_eq!(am.no_announce.len(), 1);
        assert_eq!(am.quiet_period, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_multiaddr_is_rejected() {
        let config = NodeConfig::from_toml_str(
            r#"
            [addresses]
            listen = ["/ip4/0.0.0.0/tcp/4001", "not-a-multiaddr"]
            "#,
        )
        .unwrap();

        let err = config
            .address_manager_config(AnnounceFilter::default())
            .unwrap_err();
        assert_matches!(err, ConfigError::InvalidMultiaddr { ref addr, .. } if addr == "not-a-multiaddr");
    }

    #[test]
    fn test_unknown_fault_tolerance_is_rejected() {
        let result = NodeConfig::from_toml_str(
            r#"
            [transport]
            fault_tolerance = "sometimes"
            "#,
        );
        assert_matches!(result, Err(ConfigError::Toml(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = NodeConfig::default();
        config.addresses.listen = vec!["/ip4/0.0.0.0/tcp/4001".into()];
        let parsed = NodeConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
