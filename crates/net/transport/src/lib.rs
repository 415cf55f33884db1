//! Transport registry with first-match dial routing, listener lifecycle and
//! fault-tolerant listen orchestration.

pub mod config;
pub mod error;
pub mod events;
pub mod manager;
mod metrics;
pub mod notifier;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{FaultTolerance, TransportManagerConfig};
pub use error::{BoxError, TransportError, TransportErrorKind};
pub use events::{ListenerId, TrackedListener, TransportEvent, TransportEventEmitter};
pub use manager::TransportManager;
pub use notifier::ListenerNotifier;
pub use traits::{
    BoxConnection, BoxRawConnection, Connection, DialOptions, ListenAddrSource, Listener,
    ListenerOptions, RawConnection, Transport, Upgrader,
};
