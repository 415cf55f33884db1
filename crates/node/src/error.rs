use strata_net_transport::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
