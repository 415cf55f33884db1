//! Transport manager configuration.

use serde::{Deserialize, Serialize};

use crate::events::DEFAULT_CHANNEL_CAPACITY;

/// Whether failing to bind listen addresses is fatal to startup.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FaultTolerance {
    /// Any transport that cannot bind, or no transport matching, aborts `listen`.
    #[default]
    FatalAll,
    /// Listen failures are logged and the node continues in dial-only mode.
    NoFatal,
}

/// Transport manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportManagerConfig {
    pub fault_tolerance: FaultTolerance,
    /// Broadcast channel capacity for transport events.
    pub event_channel_capacity: usize,
}

impl Default for TransportManagerConfig {
    fn default() -> Self {
        Self {
            fault_tolerance: FaultTolerance::default(),
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl TransportManagerConfig {
    /// Config that keeps the node running when nothing can be bound.
    pub fn no_fatal() -> Self {
        Self {
            fault_tolerance: FaultTolerance::NoFatal,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_fault_tolerance_defaults_to_fatal_all() {
        assert_eq!(FaultTolerance::default(), FaultTolerance::FatalAll);
        assert_eq!(
            TransportManagerConfig::default().fault_tolerance,
            FaultTolerance::FatalAll
        );
    }

    #[test]
    fn test_fault_tolerance_parses_snake_case() {
        assert_eq!(
            FaultTolerance::from_str("no_fatal").unwrap(),
            FaultTolerance::NoFatal
        );
        assert_eq!(FaultTolerance::FatalAll.to_string(), "fatal_all");
        assert!(FaultTolerance::from_str("sometimes").is_err());
    }
}
