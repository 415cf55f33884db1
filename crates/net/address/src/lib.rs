//! Address reconciliation for the local node.
//!
//! Tracks configured listen and announce addresses, addresses reported by
//! remote peers, and the subset of those that were confirmed reachable. The
//! advertised set is pushed to the peer store after a quiet period so bursts
//! of confirmations cause a single write.

pub mod bound;
pub mod config;
pub mod debounce;
pub mod filter;
pub mod manager;
pub mod multiaddr;
pub mod store;

pub use bound::BoundAddrs;
pub use config::{AddressManagerConfig, MAX_OBSERVED_ADDRS};
pub use debounce::{DEFAULT_QUIET_PERIOD, Debounce};
pub use filter::AnnounceFilter;
pub use manager::AddressManager;
pub use store::{MemoryPeerStore, PeerPatch, PeerStoreError, PeerStoreSink};
