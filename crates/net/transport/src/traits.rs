//! Capability traits for transports, listeners, connections and upgraders.
//!
//! Transports are selected at runtime through [`Transport::filter`]; there is
//! no hierarchy between them. Every implementation is an independent set of
//! capabilities the [`TransportManager`](crate::TransportManager) drives.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auto_impl::auto_impl;
use libp2p::{Multiaddr, PeerId};

use crate::error::TransportError;
use crate::notifier::ListenerNotifier;

/// A transport-level connection before encryption and multiplexing.
pub trait RawConnection: Debug + Send + Sync + 'static {
    fn remote_addr(&self) -> &Multiaddr;
}

/// An upgraded, protocol-ready connection.
pub trait Connection: Debug + Send + Sync + 'static {
    fn remote_addr(&self) -> &Multiaddr;

    /// The authenticated remote peer, once the upgrade has established it.
    fn remote_peer(&self) -> Option<PeerId>;
}

pub type BoxRawConnection = Box<dyn RawConnection>;
pub type BoxConnection = Box<dyn Connection>;

/// Turns raw transport connections into upgraded connections.
///
/// Opaque to the transport manager: it is handed to every dial and every
/// listener so transports can upgrade what they produce.
#[async_trait]
pub trait Upgrader: Send + Sync + 'static {
    async fn upgrade_outbound(&self, raw: BoxRawConnection)
    -> Result<BoxConnection, TransportError>;

    async fn upgrade_inbound(&self, raw: BoxRawConnection) -> Result<BoxConnection, TransportError>;
}

/// Caller-supplied options for an outbound dial.
#[derive(Debug, Clone, Default)]
pub struct DialOptions {
    /// Upper bound for the whole dial, upgrade included.
    pub timeout: Option<Duration>,
}

impl DialOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Options handed to [`Transport::create_listener`].
#[derive(Clone)]
pub struct ListenerOptions {
    /// Upgrader for inbound connections.
    pub upgrader: Arc<dyn Upgrader>,
    /// Lifecycle notification handle for the listener being created.
    pub notifier: ListenerNotifier,
}

impl Debug for ListenerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerOptions")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

/// A pluggable network transport.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Unique identity tag. Exactly one transport per tag may be registered.
    fn tag(&self) -> &str;

    /// The subset of `addrs` this transport can dial or listen on.
    fn filter(&self, addrs: &[Multiaddr]) -> Vec<Multiaddr>;

    /// Open an outbound connection, upgrading it with `upgrader`.
    async fn dial(
        &self,
        addr: &Multiaddr,
        upgrader: Arc<dyn Upgrader>,
        options: DialOptions,
    ) -> Result<BoxConnection, TransportError>;

    /// Construct a listener bound to this transport.
    ///
    /// The listener must report `listening`/`closed` through
    /// [`ListenerOptions::notifier`].
    fn create_listener(&self, options: ListenerOptions) -> Arc<dyn Listener>;
}

/// A running instance of a transport accepting inbound connections.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn listen(&self, addr: &Multiaddr) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;

    /// Addresses this listener is currently bound to.
    fn addrs(&self) -> Vec<Multiaddr>;
}

/// Source of the configured listen addresses used for the initial listen.
#[auto_impl(&, Box, Arc)]
pub trait ListenAddrSource: Send + Sync {
    fn listen_addrs(&self) -> Vec<Multiaddr>;
}

impl ListenAddrSource for Vec<Multiaddr> {
    fn listen_addrs(&self) -> Vec<Multiaddr> {
        self.clone()
    }
}
