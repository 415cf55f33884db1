//! Peer store write sink for the local peer record.

use async_trait::async_trait;
use libp2p::{Multiaddr, PeerId};
use parking_lot::RwLock;
use thiserror::Error;

/// Failure reported by a [`PeerStoreSink`] implementation.
#[derive(Debug, Error)]
pub enum PeerStoreError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Partial update of a peer record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerPatch {
    pub multiaddrs: Vec<Multiaddr>,
}

/// Write side of a peer store, used to publish the local address snapshot.
#[async_trait]
pub trait PeerStoreSink: Send + Sync + 'static {
    async fn patch(&self, peer_id: &PeerId, patch: PeerPatch) -> Result<(), PeerStoreError>;
}

/// In-memory sink recording every patch it receives.
#[derive(Debug, Default)]
pub struct MemoryPeerStore {
    patches: RwLock<Vec<(PeerId, PeerPatch)>>,
}

impl MemoryPeerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All patches in arrival order.
    pub fn patches(&self) -> Vec<(PeerId, PeerPatch)> {
        self.patches.read().clone()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.read().len()
    }

    /// Most recent patch for `peer_id`.
    pub fn latest(&self, peer_id: &PeerId) -> Option<PeerPatch> {
        self.patches
            .read()
            .iter()
            .rev()
            .find(|(id, _)| id == peer_id)
            .map(|(_, patch)| patch.clone())
    }
}

#[async_trait]
impl PeerStoreSink for MemoryPeerStore {
    async fn patch(&self, peer_id: &PeerId, patch: PeerPatch) -> Result<(), PeerStoreError> {
        self.patches.write().push((*peer_id, patch));
        Ok(())
    }
}
