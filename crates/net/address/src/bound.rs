//! Source of the addresses transports are currently bound to.

use auto_impl::auto_impl;
use libp2p::Multiaddr;
use strata_net_transport::TransportManager;

#[auto_impl(&, Box, Arc)]
pub trait BoundAddrs: Send + Sync {
    fn bound_addrs(&self) -> Vec<Multiaddr>;
}

impl BoundAddrs for TransportManager {
    fn bound_addrs(&self) -> Vec<Multiaddr> {
        self.addrs()
    }
}

impl BoundAddrs for Vec<Multiaddr> {
    fn bound_addrs(&self) -> Vec<Multiaddr> {
        self.clone()
    }
}
