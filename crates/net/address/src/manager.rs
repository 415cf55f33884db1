//! Reconciles configured, bound and observed addresses into the advertised set.

use std::fmt;
use std::sync::Arc;

use hashlink::LinkedHashSet;
use libp2p::{Multiaddr, PeerId};
use parking_lot::{Mutex, RwLock};
use strata_net_transport::{ListenAddrSource, TransportEvent};
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace, warn};

use crate::bound::BoundAddrs;
use crate::config::{AddressManagerConfig, MAX_OBSERVED_ADDRS};
use crate::debounce::Debounce;
use crate::filter::AnnounceFilter;
use crate::multiaddr::{is_path_addr, strip_peer_id, with_peer_id};
use crate::store::{PeerPatch, PeerStoreSink};

/// Observed addresses in first-seen order. `confirmed` is always a subset of
/// `observed`, and both hold at most `MAX_OBSERVED_ADDRS` entries.
#[derive(Debug, Default)]
struct ObservedAddrs {
    observed: LinkedHashSet<Multiaddr>,
    confirmed: LinkedHashSet<Multiaddr>,
}

impl ObservedAddrs {
    /// Record `addr`. Past the bound the oldest unconfirmed entry is evicted.
    fn observe(&mut self, addr: &Multiaddr) -> bool {
        if self.observed.contains(addr) {
            return false;
        }
        self.observed.insert(addr.clone());
        if self.observed.len() > MAX_OBSERVED_ADDRS {
            let oldest = self
                .observed
                .iter()
                .find(|a| !self.confirmed.contains(*a))
                .cloned();
            if let Some(oldest) = oldest {
                self.observed.remove(&oldest);
            }
        }
        self.observed.contains(addr)
    }

    /// Record and confirm `addr`. Past the bound the oldest confirmed entry
    /// leaves both sets.
    fn confirm(&mut self, addr: &Multiaddr) -> bool {
        if self.confirmed.contains(addr) {
            return false;
        }
        self.confirmed.insert(addr.clone());
        if self.confirmed.len() > MAX_OBSERVED_ADDRS {
            if let Some(oldest) = self.confirmed.pop_front() {
                self.observed.remove(&oldest);
            }
        }
        self.observe(addr);
        true
    }
}

#[derive(Debug, Default)]
struct Tasks {
    flush: Option<JoinHandle<()>>,
    watcher: Option<JoinHandle<()>>,
}

struct Inner {
    local_peer_id: PeerId,
    listen: Vec<Multiaddr>,
    announce: Vec<Multiaddr>,
    no_announce: Vec<Multiaddr>,
    announce_filter: AnnounceFilter,
    bound: Arc<dyn BoundAddrs>,
    peer_store: Arc<dyn PeerStoreSink>,
    observed: RwLock<ObservedAddrs>,
    debounce: Mutex<Debounce>,
    tasks: Mutex<Tasks>,
}

/// Owns the node's listen, announce and observed addresses.
///
/// Confirmed observations are debounced: a burst of confirmations produces a
/// single peer store write once no confirmation arrived for the configured
/// quiet period. Cloning is cheap and shares state.
#[derive(Clone)]
pub struct AddressManager {
    inner: Arc<Inner>,
}

impl AddressManager {
    pub fn new(
        config: AddressManagerConfig,
        local_peer_id: PeerId,
        bound: Arc<dyn BoundAddrs>,
        peer_store: Arc<dyn PeerStoreSink>,
    ) -> Self {
        let no_announce = config
            .no_announce
            .iter()
            .map(|addr| strip_peer_id(addr, &local_peer_id))
            .collect();

        Self {
            inner: Arc::new(Inner {
                local_peer_id,
                listen: config.listen,
                announce: config.announce,
                no_announce,
                announce_filter: config.announce_filter,
                bound,
                peer_store,
                observed: RwLock::new(ObservedAddrs::default()),
                debounce: Mutex::new(Debounce::new(config.quiet_period)),
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    pub fn local_peer_id(&self) -> PeerId {
        self.inner.local_peer_id
    }

    /// Configured listen addresses, duplicates and order preserved.
    pub fn listen_addrs(&self) -> Vec<Multiaddr> {
        self.inner.listen.clone()
    }

    pub fn announce_addrs(&self) -> Vec<Multiaddr> {
        self.inner.announce.clone()
    }

    /// Observed addresses in first-seen order, without the local peer id.
    pub fn observed_addrs(&self) -> Vec<Multiaddr> {
        self.inner.observed.read().observed.iter().cloned().collect()
    }

    pub fn confirmed_addrs(&self) -> Vec<Multiaddr> {
        self.inner.observed.read().confirmed.iter().cloned().collect()
    }

    /// The advertised address set.
    ///
    /// Announce addresses, then bound addresses, then confirmed observed
    /// addresses, deduplicated in that order. Every entry except path-style
    /// addresses ends with the local peer id exactly once.
    pub fn addresses(&self) -> Vec<Multiaddr> {
        self.inner.addresses()
    }

    /// Record an address a remote peer saw us at. Returns `true` if it was new.
    pub fn add_observed_addr(&self, addr: &Multiaddr) -> bool {
        let addr = strip_peer_id(addr, &self.inner.local_peer_id);
        let added = self.inner.observed.write().observe(&addr);
        if added {
            trace!(%addr, "new observed address");
        }
        added
    }

    /// Forget an observed address, confirmed or not.
    pub fn remove_observed_addr(&self, addr: &Multiaddr) -> bool {
        let addr = strip_peer_id(addr, &self.inner.local_peer_id);
        let mut observed = self.inner.observed.write();
        let removed = observed.observed.remove(&addr);
        let was_confirmed = observed.confirmed.remove(&addr);
        drop(observed);

        if was_confirmed {
            debug!(%addr, "confirmed address removed");
            self.inner.schedule_update();
        }
        removed || was_confirmed
    }

    /// Record a verified observed address and schedule a peer record update.
    pub fn confirm_observed_addr(&self, addr: &Multiaddr) {
        let addr = strip_peer_id(addr, &self.inner.local_peer_id);
        let newly_confirmed = self.inner.observed.write().confirm(&addr);
        if newly_confirmed {
            debug!(%addr, "observed address confirmed");
        }
        self.inner.schedule_update();
    }

    /// Whether a peer record update is waiting for its quiet period.
    pub fn is_update_pending(&self) -> bool {
        self.inner.debounce.lock().is_pending()
    }

    /// Schedule a peer record update whenever a listener starts or closes.
    ///
    /// Replaces a previously installed watcher.
    pub fn watch_transport_events(&self, mut events: broadcast::Receiver<TransportEvent>) {
        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime, transport events will not update the peer record");
            return;
        };

        let weak = Arc::downgrade(&self.inner);
        let watcher = handle.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => trace!(
                        listener = %event.listener().id(),
                        listening = event.is_listening(),
                        "bound addresses changed"
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "transport events lagged")
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.schedule_update();
            }
        });

        if let Some(previous) = self.inner.tasks.lock().watcher.replace(watcher) {
            previous.abort();
        }
    }

    /// Drop any pending peer record update and stop watching transport events.
    pub fn stop(&self) {
        self.inner.debounce.lock().cancel();
        let mut tasks = self.inner.tasks.lock();
        for task in [tasks.flush.take(), tasks.watcher.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

impl Inner {
    fn addresses(&self) -> Vec<Multiaddr> {
        // Snapshot first; `bound_addrs` takes the transport manager's locks.
        let confirmed: Vec<Multiaddr> = self.observed.read().confirmed.iter().cloned().collect();
        let bound = self.bound.bound_addrs();

        let mut unique = LinkedHashSet::new();
        for addr in self.announce.iter().cloned().chain(bound).chain(confirmed) {
            let addr = if is_path_addr(&addr) {
                addr
            } else {
                strip_peer_id(&addr, &self.local_peer_id)
            };
            if !self.no_announce.contains(&addr) && !unique.contains(&addr) {
                unique.insert(addr);
            }
        }

        self.announce_filter
            .apply(unique.into_iter().collect())
            .iter()
            .map(|addr| with_peer_id(addr, &self.local_peer_id))
            .collect()
    }

    fn schedule_update(self: &Arc<Self>) {
        let armed = self.debounce.lock().schedule(Instant::now());
        if !armed {
            trace!("peer record update deferred");
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime, peer record update dropped");
            self.debounce.lock().cancel();
            return;
        };

        let inner = Arc::clone(self);
        let flush = handle.spawn(async move { inner.flush_when_quiet().await });
        self.tasks.lock().flush = Some(flush);
    }

    async fn flush_when_quiet(&self) {
        loop {
            let deadline = self.debounce.lock().deadline();
            let Some(deadline) = deadline else {
                return;
            };
            sleep_until(deadline).await;

            let due = self.debounce.lock().take_if_due(Instant::now());
            if due {
                break;
            }
        }
        self.flush().await;
    }

    async fn flush(&self) {
        let multiaddrs = self.addresses();
        debug!(
            peer_id = %self.local_peer_id,
            count = multiaddrs.len(),
            "updating local peer record"
        );

        match self
            .peer_store
            .patch(&self.local_peer_id, PeerPatch { multiaddrs })
            .await
        {
            Ok(()) => metrics::counter!("address.peer_record.updates").increment(1),
            Err(error) => {
                metrics::counter!("address.peer_record.failures").increment(1);
                warn!(%error, "failed to update local peer record");
            }
        }
    }
}

impl ListenAddrSource for AddressManager {
    fn listen_addrs(&self) -> Vec<Multiaddr> {
        self.inner.listen.clone()
    }
}

impl fmt::Debug for AddressManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressManager")
            .field("local_peer_id", &self.inner.local_peer_id)
            .field("listen", &self.inner.listen)
            .field("announce", &self.inner.announce)
            .field("announce_filter", &self.inner.announce_filter)
            .finish_non_exhaustive()
    }
}
