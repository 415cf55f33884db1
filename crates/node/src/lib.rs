//! Strata node: composes the transport and address managers behind one
//! start/stop lifecycle.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::{AddressConfig, ConfigError, NodeConfig, TransportConfig};
pub use error::NodeError;
pub use logging::{LogConfig, init_logging};
pub use node::Node;
