//! Transport events and non-blocking broadcast emitter.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use libp2p::Multiaddr;
use tokio::sync::broadcast;

use crate::traits::Listener;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a listener created by the transport manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A listener tracked by the transport manager, together with its owner tag.
#[derive(Clone)]
pub struct TrackedListener {
    id: ListenerId,
    transport: Arc<str>,
    listener: Arc<dyn Listener>,
}

impl TrackedListener {
    pub(crate) fn new(id: ListenerId, transport: Arc<str>, listener: Arc<dyn Listener>) -> Self {
        Self {
            id,
            transport,
            listener,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Tag of the transport that created the listener.
    pub fn transport(&self) -> &str {
        &self.transport
    }

    pub fn listener(&self) -> &Arc<dyn Listener> {
        &self.listener
    }

    pub fn addrs(&self) -> Vec<Multiaddr> {
        self.listener.addrs()
    }
}

impl fmt::Debug for TrackedListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedListener")
            .field("id", &self.id)
            .field("transport", &self.transport)
            .field("addrs", &self.listener.addrs())
            .finish()
    }
}

/// Transport manager events.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A listener started accepting connections.
    Listening(TrackedListener),
    /// A listener closed and is no longer tracked.
    Close(TrackedListener),
}

impl TransportEvent {
    pub fn listener(&self) -> &TrackedListener {
        match self {
            Self::Listening(listener) | Self::Close(listener) => listener,
        }
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, Self::Listening(_))
    }
}

pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Non-blocking broadcast emitter. Slow subscribers drop events independently.
#[derive(Debug, Clone)]
pub struct TransportEventEmitter {
    tx: broadcast::Sender<TransportEvent>,
}

impl Default for TransportEventEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl TransportEventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: TransportEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
