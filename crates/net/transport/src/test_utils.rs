//! In-memory transports, listeners and upgraders for tests.

use std::sync::Arc;

use async_trait::async_trait;
use libp2p::multiaddr::Protocol;
use libp2p::{Multiaddr, PeerId};
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::events::ListenerId;
use crate::notifier::ListenerNotifier;
use crate::traits::{
    BoxConnection, BoxRawConnection, Connection, DialOptions, Listener, ListenerOptions,
    RawConnection, Transport, Upgrader,
};

/// Parse a multiaddr literal.
pub fn addr(s: &str) -> Multiaddr {
    s.parse().expect("valid multiaddr")
}

/// How a [`MockTransport`] answers dials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialBehaviour {
    #[default]
    Succeed,
    /// Fail with [`TransportError::ConnectionRefused`].
    Refuse,
    /// Fail with an unclassified error.
    Unclassified,
    /// Never complete.
    Hang,
}

type Accept = fn(&Multiaddr) -> bool;

fn is_tcp(addr: &Multiaddr) -> bool {
    addr.iter().any(|p| matches!(p, Protocol::Tcp(_)))
        && !addr
            .iter()
            .any(|p| matches!(p, Protocol::Ws(_) | Protocol::Wss(_)))
}

fn is_memory(addr: &Multiaddr) -> bool {
    addr.iter().any(|p| matches!(p, Protocol::Memory(_)))
}

/// Transport that binds and dials without touching the network.
#[derive(Debug)]
pub struct MockTransport {
    tag: String,
    accept: Accept,
    dial: DialBehaviour,
    listen_failures: Vec<Multiaddr>,
    listen_hangs: Vec<Multiaddr>,
    close_fails: bool,
    dialed: Mutex<Vec<Multiaddr>>,
    closed: Arc<Mutex<Vec<ListenerId>>>,
}

impl MockTransport {
    pub fn new(tag: impl Into<String>, accept: Accept) -> Self {
        Self {
            tag: tag.into(),
            accept,
            dial: DialBehaviour::default(),
            listen_failures: Vec::new(),
            listen_hangs: Vec::new(),
            close_fails: false,
            dialed: Mutex::new(Vec::new()),
            closed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Accepts plain TCP addresses.
    pub fn tcp(tag: impl Into<String>) -> Self {
        Self::new(tag, is_tcp)
    }

    /// Accepts `/memory/<n>` addresses.
    pub fn memory(tag: impl Into<String>) -> Self {
        Self::new(tag, is_memory)
    }

    pub fn with_dial(mut self, dial: DialBehaviour) -> Self {
        self.dial = dial;
        self
    }

    /// Listeners fail to bind `addr`.
    pub fn fail_listen_on(mut self, addr: Multiaddr) -> Self {
        self.listen_failures.push(addr);
        self
    }

    /// Listeners never finish binding `addr`.
    pub fn hang_listen_on(mut self, addr: Multiaddr) -> Self {
        self.listen_hangs.push(addr);
        self
    }

    /// Listeners return an error from `close`, after closing.
    pub fn fail_close(mut self) -> Self {
        self.close_fails = true;
        self
    }

    pub fn dialed(&self) -> Vec<Multiaddr> {
        self.dialed.lock().clone()
    }

    /// Ids of closed listeners, in close order.
    pub fn closed(&self) -> Vec<ListenerId> {
        self.closed.lock().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn filter(&self, addrs: &[Multiaddr]) -> Vec<Multiaddr> {
        addrs.iter().filter(|a| (self.accept)(a)).cloned().collect()
    }

    async fn dial(
        &self,
        addr: &Multiaddr,
        upgrader: Arc<dyn Upgrader>,
        _options: DialOptions,
    ) -> Result<BoxConnection, TransportError> {
        self.dialed.lock().push(addr.clone());
        match self.dial {
            DialBehaviour::Succeed => {
                upgrader
                    .upgrade_outbound(Box::new(MockRawConnection::new(addr.clone())))
                    .await
            }
            DialBehaviour::Refuse => Err(TransportError::ConnectionRefused { addr: addr.clone() }),
            DialBehaviour::Unclassified => Err(TransportError::other("socket exploded")),
            DialBehaviour::Hang => futures::future::pending().await,
        }
    }

    fn create_listener(&self, options: ListenerOptions) -> Arc<dyn Listener> {
        Arc::new(MockListener {
            notifier: options.notifier,
            addrs: Mutex::new(Vec::new()),
            listen_failures: self.listen_failures.clone(),
            listen_hangs: self.listen_hangs.clone(),
            close_fails: self.close_fails,
            close_log: Arc::clone(&self.closed),
        })
    }
}

/// Listener that records its bound address and reports lifecycle changes.
#[derive(Debug)]
pub struct MockListener {
    notifier: ListenerNotifier,
    addrs: Mutex<Vec<Multiaddr>>,
    listen_failures: Vec<Multiaddr>,
    listen_hangs: Vec<Multiaddr>,
    close_fails: bool,
    close_log: Arc<Mutex<Vec<ListenerId>>>,
}

impl MockListener {
    /// A listener not attached to any manager.
    pub fn detached() -> Self {
        Self {
            notifier: ListenerNotifier::detached(),
            addrs: Mutex::new(Vec::new()),
            listen_failures: Vec::new(),
            listen_hangs: Vec::new(),
            close_fails: false,
            close_log: Arc::default(),
        }
    }
}

#[async_trait]
impl Listener for MockListener {
    async fn listen(&self, addr: &Multiaddr) -> Result<(), TransportError> {
        if self.listen_failures.contains(addr) {
            return Err(TransportError::ListenFailed {
                addr: addr.clone(),
                reason: "address in use".into(),
            });
        }
        if self.listen_hangs.contains(addr) {
            futures::future::pending::<()>().await;
        }
        self.addrs.lock().push(addr.clone());
        self.notifier.listening();
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.close_log.lock().push(self.notifier.id());
        self.addrs.lock().clear();
        self.notifier.closed();
        if self.close_fails {
            return Err(TransportError::other("close failed"));
        }
        Ok(())
    }

    fn addrs(&self) -> Vec<Multiaddr> {
        self.addrs.lock().clone()
    }
}

#[derive(Debug)]
pub struct MockRawConnection {
    remote_addr: Multiaddr,
}

impl MockRawConnection {
    pub fn new(remote_addr: Multiaddr) -> Self {
        Self { remote_addr }
    }
}

impl RawConnection for MockRawConnection {
    fn remote_addr(&self) -> &Multiaddr {
        &self.remote_addr
    }
}

#[derive(Debug)]
pub struct MockConnection {
    remote_addr: Multiaddr,
    remote_peer: Option<PeerId>,
}

impl Connection for MockConnection {
    fn remote_addr(&self) -> &Multiaddr {
        &self.remote_addr
    }

    fn remote_peer(&self) -> Option<PeerId> {
        self.remote_peer
    }
}

/// Upgrader that trusts the `/p2p/` component of the remote address.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughUpgrader;

impl PassthroughUpgrader {
    fn upgrade(raw: BoxRawConnection) -> BoxConnection {
        let remote_addr = raw.remote_addr().clone();
        let remote_peer = remote_addr.iter().find_map(|p| match p {
            Protocol::P2p(peer_id) => Some(peer_id),
            _ => None,
        });
        Box::new(MockConnection {
            remote_addr,
            remote_peer,
        })
    }
}

#[async_trait]
impl Upgrader for PassthroughUpgrader {
    async fn upgrade_outbound(
        &self,
        raw: BoxRawConnection,
    ) -> Result<BoxConnection, TransportError> {
        Ok(Self::upgrade(raw))
    }

    async fn upgrade_inbound(&self, raw: BoxRawConnection) -> Result<BoxConnection, TransportError> {
        Ok(Self::upgrade(raw))
    }
}
