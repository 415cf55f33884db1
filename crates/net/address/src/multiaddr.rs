//! Multiaddr helpers for self-identity handling.

use libp2p::multiaddr::Protocol;
use libp2p::{Multiaddr, PeerId};

/// Whether `addr` is path-style (a unix socket), with no host or port.
pub fn is_path_addr(addr: &Multiaddr) -> bool {
    addr.iter().any(|p| matches!(p, Protocol::Unix(_)))
}

/// Whether the last component of `addr` is `/p2p/<peer_id>`.
pub fn ends_with_peer_id(addr: &Multiaddr, peer_id: &PeerId) -> bool {
    matches!(addr.iter().last(), Some(Protocol::P2p(id)) if id == *peer_id)
}

/// Strip a trailing `/p2p/<peer_id>` component, if present.
///
/// Only the final component is considered, so relayed addresses that carry
/// another peer's id in the middle are preserved.
pub fn strip_peer_id(addr: &Multiaddr, peer_id: &PeerId) -> Multiaddr {
    let mut addr = addr.clone();
    if ends_with_peer_id(&addr, peer_id) {
        addr.pop();
    }
    addr
}

/// Suffix `addr` with `/p2p/<peer_id>` exactly once.
///
/// Path-style addresses are returned untouched.
pub fn with_peer_id(addr: &Multiaddr, peer_id: &PeerId) -> Multiaddr {
    if is_path_addr(addr) {
        return addr.clone();
    }
    strip_peer_id(addr, peer_id).with(Protocol::P2p(*peer_id))
}
