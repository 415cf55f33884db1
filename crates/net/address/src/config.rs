//! Address manager configuration.

use std::time::Duration;

use libp2p::Multiaddr;

use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::filter::AnnounceFilter;

/// Upper bound on remembered observed addresses. Oldest entries are evicted.
pub const MAX_OBSERVED_ADDRS: usize = 64;

#[derive(Debug, Clone)]
pub struct AddressManagerConfig {
    /// Addresses to bind listeners on. Order and duplicates are kept.
    pub listen: Vec<Multiaddr>,
    /// Addresses advertised verbatim, bound or not.
    pub announce: Vec<Multiaddr>,
    /// Addresses never advertised.
    pub no_announce: Vec<Multiaddr>,
    pub announce_filter: AnnounceFilter,
    /// Quiet period before confirmed addresses reach the peer store.
    pub quiet_period: Duration,
}

impl Default for AddressManagerConfig {
    fn default() -> Self {
        Self {
            listen: Vec::new(),
            announce: Vec::new(),
            no_announce: Vec::new(),
            announce_filter: AnnounceFilter::default(),
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl AddressManagerConfig {
    pub fn with_listen(mut self, listen: Vec<Multiaddr>) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_announce(mut self, announce: Vec<Multiaddr>) -> Self {
        self.announce = announce;
        self
    }

    pub fn with_no_announce(mut self, no_announce: Vec<Multiaddr>) -> Self {
        self.no_announce = no_announce;
        self
    }

    pub fn with_announce_filter(mut self, filter: AnnounceFilter) -> Self {
        self.announce_filter = filter;
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }
}
