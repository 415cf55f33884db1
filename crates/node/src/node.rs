//! Node composition and lifecycle.

use std::fmt;
use std::sync::Arc;

use libp2p::{Multiaddr, PeerId};
use strata_net_address::{AddressManager, AnnounceFilter, PeerStoreSink};
use strata_net_transport::{BoxConnection, DialOptions, Transport, TransportManager, Upgrader};
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::error::NodeError;

/// A node owning one transport manager and one address manager.
///
/// The address manager supplies listen addresses for the initial listen and
/// reads bound addresses back from the transport manager.
pub struct Node {
    local_peer_id: PeerId,
    transports: Arc<TransportManager>,
    addresses: AddressManager,
}

impl Node {
    /// Build a node from `config`. Invalid multiaddrs fail here.
    pub fn new(
        config: &NodeConfig,
        local_peer_id: PeerId,
        upgrader: Arc<dyn Upgrader>,
        peer_store: Arc<dyn PeerStoreSink>,
    ) -> Result<Self, NodeError> {
        Self::with_announce_filter(
            config,
            local_peer_id,
            upgrader,
            peer_store,
            AnnounceFilter::default(),
        )
    }

    pub fn with_announce_filter(
        config: &NodeConfig,
        local_peer_id: PeerId,
        upgrader: Arc<dyn Upgrader>,
        peer_store: Arc<dyn PeerStoreSink>,
        announce_filter: AnnounceFilter,
    ) -> Result<Self, NodeError> {
        let address_config = config.address_manager_config(announce_filter)?;
        let transports = Arc::new(TransportManager::new(
            config.transport_manager_config(),
            upgrader,
        ));
        let addresses = AddressManager::new(
            address_config,
            local_peer_id,
            transports.clone(),
            peer_store,
        );

        Ok(Self {
            local_peer_id,
            transports,
            addresses,
        })
    }

    pub fn local_peer_id(&self) -> PeerId {
        self.local_peer_id
    }

    pub fn add_transport(&self, transport: Arc<dyn Transport>) -> Result<(), NodeError> {
        Ok(self.transports.add(transport)?)
    }

    /// Start the transport manager and listen on the configured addresses.
    pub async fn start(&self) -> Result<(), NodeError> {
        info!(
            peer_id = %self.local_peer_id,
            fault_tolerance = %self.transports.fault_tolerance(),
            "starting node"
        );

        self.transports.start();
        self.addresses
            .watch_transport_events(self.transports.subscribe());

        if let Err(error) = self.transports.after_start(&self.addresses).await {
            warn!(%error, "failed to listen on configured addresses");
            self.stop().await;
            return Err(error.into());
        }

        info!(addrs = ?self.addresses.addresses(), "node started");
        Ok(())
    }

    pub async fn stop(&self) {
        info!(peer_id = %self.local_peer_id, "stopping node");
        self.addresses.stop();
        self.transports.stop().await;
    }

    pub async fn dial(
        &self,
        addr: &Multiaddr,
        options: DialOptions,
    ) -> Result<BoxConnection, NodeError> {
        Ok(self.transports.dial(addr, options).await?)
    }

    pub fn is_started(&self) -> bool {
        self.transports.is_started()
    }

    /// The advertised address set.
    pub fn addresses(&self) -> Vec<Multiaddr> {
        self.addresses.addresses()
    }

    pub fn transport_manager(&self) -> &Arc<TransportManager> {
        &self.transports
    }

    pub fn address_manager(&self) -> &AddressManager {
        &self.addresses
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("local_peer_id", &self.local_peer_id)
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}
