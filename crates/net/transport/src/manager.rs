//! Transport registry with dial routing and listener lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use hashlink::LinkedHashMap;
use libp2p::Multiaddr;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::config::{FaultTolerance, TransportManagerConfig};
use crate::error::TransportError;
use crate::events::{ListenerId, TrackedListener, TransportEvent, TransportEventEmitter};
use crate::metrics::TransportMetrics;
use crate::notifier::ListenerNotifier;
use crate::traits::{
    BoxConnection, DialOptions, ListenAddrSource, Listener, ListenerOptions, Transport, Upgrader,
};

/// Registered transports in registration order.
type TransportMap = LinkedHashMap<String, Arc<dyn Transport>>;

/// Tracked listeners per transport tag, in creation order.
pub(crate) type ListenerMap = LinkedHashMap<String, Vec<TrackedListener>>;

/// State reachable from listener notifiers.
pub(crate) struct Shared {
    pub(crate) listeners: RwLock<ListenerMap>,
    pub(crate) events: TransportEventEmitter,
    pub(crate) metrics: TransportMetrics,
}

/// Owns the registered transports and their listeners.
///
/// Routes outbound dials to the first transport whose filter accepts the
/// address, drives listener startup and shutdown, and applies the configured
/// [`FaultTolerance`] when addresses cannot be bound.
///
/// Locks are never held across an `.await`, so `dial`, `add`, `remove` and the
/// accessors can run while a `listen` or `stop` is in flight.
pub struct TransportManager {
    transports: RwLock<TransportMap>,
    shared: Arc<Shared>,
    upgrader: Arc<dyn Upgrader>,
    fault_tolerance: FaultTolerance,
    started: AtomicBool,
}

impl TransportManager {
    pub fn new(config: TransportManagerConfig, upgrader: Arc<dyn Upgrader>) -> Self {
        Self {
            transports: RwLock::new(LinkedHashMap::new()),
            shared: Arc::new(Shared {
                listeners: RwLock::new(LinkedHashMap::new()),
                events: TransportEventEmitter::new(config.event_channel_capacity),
                metrics: TransportMetrics::default(),
            }),
            upgrader,
            fault_tolerance: config.fault_tolerance,
            started: AtomicBool::new(false),
        }
    }

    pub fn with_defaults(upgrader: Arc<dyn Upgrader>) -> Self {
        Self::new(TransportManagerConfig::default(), upgrader)
    }

    pub fn fault_tolerance(&self) -> FaultTolerance {
        self.fault_tolerance
    }

    /// Register a transport under its tag.
    pub fn add(&self, transport: Arc<dyn Transport>) -> Result<(), TransportError> {
        let tag = transport.tag().to_owned();
        if tag.is_empty() {
            return Err(TransportError::InvalidKey);
        }

        {
            let mut transports = self.transports.write();
            if transports.contains_key(&tag) {
                return Err(TransportError::DuplicateTransport { tag });
            }
            debug!(%tag, "adding transport");
            transports.insert(tag.clone(), transport);
        }

        let mut listeners = self.shared.listeners.write();
        if !listeners.contains_key(&tag) {
            listeners.insert(tag, Vec::new());
        }

        Ok(())
    }

    /// First registered transport whose filter accepts `addr`.
    ///
    /// Transports are expected to have non-overlapping filters; if two claim
    /// the same address the one registered first wins.
    pub fn transport_for_multiaddr(&self, addr: &Multiaddr) -> Option<Arc<dyn Transport>> {
        let candidate = std::slice::from_ref(addr);
        self.transports()
            .into_iter()
            .find(|transport| !transport.filter(candidate).is_empty())
    }

    /// Dial `addr` through the matching transport.
    ///
    /// Not retried; retry policy belongs to the caller.
    pub async fn dial(
        &self,
        addr: &Multiaddr,
        options: DialOptions,
    ) -> Result<BoxConnection, TransportError> {
        let Some(transport) = self.transport_for_multiaddr(addr) else {
            debug!(%addr, "no transport available for address");
            return Err(TransportError::TransportUnavailable { addr: addr.clone() });
        };

        self.shared.metrics.dials_total.increment(1);
        trace!(%addr, tag = transport.tag(), "dialing");

        let timeout = options.timeout;
        let dial = transport.dial(addr, Arc::clone(&self.upgrader), options);
        let result = match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, dial).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::DialTimeout { addr: addr.clone() }),
            },
            None => dial.await,
        };

        result.map_err(|err| {
            let err = err.into_dial_error(addr);
            self.shared.metrics.record_dial_failure(err.kind());
            debug!(%addr, tag = transport.tag(), error = %err, "dial failed");
            err
        })
    }

    /// Start listening on every address a registered transport supports.
    ///
    /// Listen attempts for one transport run concurrently and are all awaited.
    /// A transport counts as listening when at least one of its addresses
    /// bound. Transports are processed one after another; an error aborts the
    /// call without closing listeners already bound by earlier transports.
    pub async fn listen(&self, addrs: &[Multiaddr]) -> Result<(), TransportError> {
        if addrs.is_empty() {
            info!("no listen addresses configured, node will be dial only");
            return Ok(());
        }

        let transports: Vec<(String, Arc<dyn Transport>)> = self
            .transports
            .read()
            .iter()
            .map(|(tag, transport)| (tag.clone(), Arc::clone(transport)))
            .collect();

        let mut could_not_listen = Vec::new();

        for (tag, transport) in &transports {
            let supported = transport.filter(addrs);
            if supported.is_empty() {
                debug!(%tag, "transport supports none of the listen addresses");
                could_not_listen.push(tag.clone());
                continue;
            }

            let tag: Arc<str> = Arc::from(tag.as_str());
            let attempts = supported.into_iter().map(|addr| {
                let listener = self.create_listener(&tag, &**transport);
                async move {
                    let result = listener.listen(&addr).await;
                    (addr, result)
                }
            });

            let mut bound = 0usize;
            for (addr, result) in join_all(attempts).await {
                match result {
                    Ok(()) => {
                        bound += 1;
                        debug!(%tag, %addr, "listening");
                    }
                    Err(error) => {
                        self.shared.metrics.listen_failures_total.increment(1);
                        warn!(%tag, %addr, %error, "failed to listen");
                    }
                }
            }

            if bound == 0 && self.fault_tolerance != FaultTolerance::NoFatal {
                return Err(TransportError::NoValidAddresses {
                    transports: vec![tag.to_string()],
                });
            }
        }

        if could_not_listen.len() == transports.len() {
            match self.fault_tolerance {
                FaultTolerance::FatalAll => {
                    return Err(TransportError::NoValidAddresses {
                        transports: could_not_listen,
                    });
                }
                FaultTolerance::NoFatal => {
                    warn!(
                        transports = ?could_not_listen,
                        "no transport can listen on the configured addresses, node will be dial only"
                    );
                }
            }
        }

        Ok(())
    }

    fn create_listener(&self, tag: &Arc<str>, transport: &dyn Transport) -> Arc<dyn Listener> {
        let id = ListenerId::next();
        let notifier = ListenerNotifier::new(id, Arc::clone(tag), Arc::downgrade(&self.shared));
        let listener = transport.create_listener(ListenerOptions {
            upgrader: Arc::clone(&self.upgrader),
            notifier: notifier.clone(),
        });
        notifier.bind(&listener);

        let tracked = TrackedListener::new(id, Arc::clone(tag), Arc::clone(&listener));
        let mut listeners = self.shared.listeners.write();
        match listeners.get_mut(&**tag) {
            Some(list) => list.push(tracked),
            None => {
                listeners.insert(tag.to_string(), vec![tracked]);
            }
        }

        listener
    }

    pub fn start(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Initial listen using the configured listen addresses.
    pub async fn after_start<S>(&self, source: &S) -> Result<(), TransportError>
    where
        S: ListenAddrSource + ?Sized,
    {
        let addrs = source.listen_addrs();
        debug!(count = addrs.len(), "starting listeners");
        self.listen(&addrs).await
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Close every listener and reset the listener lists.
    ///
    /// Close failures are logged; this never fails.
    pub async fn stop(&self) {
        let tracked = self.listeners();
        let closes = tracked.iter().map(|tracked| async move {
            let result = tracked.listener().close().await;
            (tracked, result)
        });

        for (tracked, result) in join_all(closes).await {
            if let Err(error) = result {
                self.shared.metrics.close_failures_total.increment(1);
                warn!(
                    listener = %tracked.id(),
                    transport = tracked.transport(),
                    %error,
                    "failed to close listener"
                );
            }
        }

        for (_, list) in self.shared.listeners.write().iter_mut() {
            list.clear();
        }

        self.started.store(false, Ordering::Release);
        info!(closed = tracked.len(), "transport manager stopped");
    }

    /// Close all listeners of `tag` one at a time, then unregister it.
    pub async fn remove(&self, tag: &str) {
        debug!(%tag, "removing transport");

        loop {
            let next = self
                .shared
                .listeners
                .write()
                .get_mut(tag)
                .and_then(Vec::pop);
            let Some(tracked) = next else {
                break;
            };

            trace!(%tag, listener = %tracked.id(), "closing listener");
            if let Err(error) = tracked.listener().close().await {
                self.shared.metrics.close_failures_total.increment(1);
                warn!(%tag, listener = %tracked.id(), %error, "failed to close listener");
            }
        }

        self.transports.write().remove(tag);
        self.shared.listeners.write().remove(tag);
    }

    /// Remove every registered transport concurrently.
    pub async fn remove_all(&self) {
        let tags: Vec<String> = self.transports.read().keys().cloned().collect();
        join_all(tags.iter().map(|tag| self.remove(tag))).await;
    }

    /// Addresses all tracked listeners are bound to.
    pub fn addrs(&self) -> Vec<Multiaddr> {
        self.listeners()
            .iter()
            .flat_map(TrackedListener::addrs)
            .collect()
    }

    pub fn transports(&self) -> Vec<Arc<dyn Transport>> {
        self.transports.read().values().cloned().collect()
    }

    pub fn listeners(&self) -> Vec<TrackedListener> {
        self.shared
            .listeners
            .read()
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn listeners_for(&self, tag: &str) -> Vec<TrackedListener> {
        self.shared
            .listeners
            .read()
            .get(tag)
            .cloned()
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.shared.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::test_utils::{DialBehaviour, MockTransport, PassthroughUpgrader, addr};

    fn manager(fault_tolerance: FaultTolerance) -> TransportManager {
        TransportManager::new(
            TransportManagerConfig {
                fault_tolerance,
                ..Default::default()
            },
            Arc::new(PassthroughUpgrader),
        )
    }

    #[test]
    fn test_add_rejects_empty_tag() {
        let tm = manager(FaultTolerance::FatalAll);
        let result = tm.add(Arc::new(MockTransport::tcp("")));
        assert_matches!(result, Err(TransportError::InvalidKey));
        assert!(tm.transports().is_empty());
    }

    #[tokio::test]
    async fn test_add_duplicate_then_remove_and_re_add() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();

        let result = tm.add(Arc::new(MockTransport::tcp("tcp")));
        assert_matches!(result, Err(TransportError::DuplicateTransport { tag }) if tag == "tcp");

        tm.remove("tcp").await;
        assert!(tm.transports().is_empty());
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();
        assert_eq!(tm.transports().len(), 1);
    }

    #[test]
    fn test_transport_for_multiaddr_uses_registration_order() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();
        tm.add(Arc::new(MockTransport::tcp("tcp-a"))).unwrap();
        tm.add(Arc::new(MockTransport::tcp("tcp-b"))).unwrap();

        let found = tm
            .transport_for_multiaddr(&addr("/ip4/127.0.0.1/tcp/4001"))
            .unwrap();
        assert_eq!(found.tag(), "tcp-a");

        let found = tm.transport_for_multiaddr(&addr("/memory/7")).unwrap();
        assert_eq!(found.tag(), "memory");

        assert!(
            tm.transport_for_multiaddr(&addr("/ip4/127.0.0.1/udp/4001/quic-v1"))
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_dial_without_matching_transport_is_unavailable() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();

        let target = addr("/ip4/127.0.0.1/tcp/4001");
        let result = tm.dial(&target, DialOptions::default()).await;
        assert_matches!(result, Err(TransportError::TransportUnavailable { addr }) if addr == target);
    }

    #[tokio::test]
    async fn test_dial_routes_through_upgrader() {
        let tm = manager(FaultTolerance::FatalAll);
        let tcp = Arc::new(MockTransport::tcp("tcp"));
        tm.add(tcp.clone()).unwrap();

        let target = addr("/ip4/127.0.0.1/tcp/4001");
        let conn = tm.dial(&target, DialOptions::default()).await.unwrap();
        assert_eq!(conn.remote_addr(), &target);
        assert_eq!(tcp.dialed(), vec![target]);
    }

    #[tokio::test]
    async fn test_dial_retags_unclassified_failures() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(
            MockTransport::tcp("tcp").with_dial(DialBehaviour::Unclassified),
        ))
        .unwrap();

        let target = addr("/ip4/127.0.0.1/tcp/4001");
        let result = tm.dial(&target, DialOptions::default()).await;
        assert_matches!(result, Err(TransportError::TransportDialFailed { addr, .. }) if addr == target);
    }

    #[tokio::test]
    async fn test_dial_preserves_classified_failures() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(
            MockTransport::tcp("tcp").with_dial(DialBehaviour::Refuse),
        ))
        .unwrap();

        let result = tm
            .dial(&addr("/ip4/127.0.0.1/tcp/4001"), DialOptions::default())
            .await;
        assert_matches!(result, Err(TransportError::ConnectionRefused { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dial_honours_timeout() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp").with_dial(DialBehaviour::Hang)))
            .unwrap();

        let result = tm
            .dial(
                &addr("/ip4/127.0.0.1/tcp/4001"),
                DialOptions::with_timeout(Duration::from_secs(5)),
            )
            .await;
        assert_matches!(result, Err(TransportError::DialTimeout { .. }));
    }

    #[tokio::test]
    async fn test_listen_with_no_addresses_is_dial_only() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();

        tm.listen(&[]).await.unwrap();
        assert!(tm.listeners().is_empty());
        assert!(tm.addrs().is_empty());
    }

    #[tokio::test]
    async fn test_listen_binds_supported_addresses() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();

        let addrs = vec![
            addr("/ip4/127.0.0.1/tcp/4001"),
            addr("/ip4/127.0.0.1/tcp/4002"),
            addr("/memory/1"),
        ];
        tm.listen(&addrs).await.unwrap();

        assert_eq!(tm.listeners_for("tcp").len(), 2);
        assert_eq!(tm.listeners_for("memory").len(), 1);
        assert_eq!(tm.addrs(), addrs);
    }

    #[tokio::test]
    async fn test_listen_succeeds_when_one_address_binds() {
        let tm = manager(FaultTolerance::FatalAll);
        let bad = addr("/ip4/127.0.0.1/tcp/4002");
        tm.add(Arc::new(MockTransport::tcp("tcp").fail_listen_on(bad.clone())))
            .unwrap();

        let good = addr("/ip4/127.0.0.1/tcp/4001");
        tm.listen(&[good.clone(), bad]).await.unwrap();
        assert_eq!(tm.addrs(), vec![good]);
    }

    #[tokio::test]
    async fn test_listen_failure_is_fatal_under_fatal_all() {
        let tm = manager(FaultTolerance::FatalAll);
        let bad = addr("/ip4/127.0.0.1/tcp/4001");
        tm.add(Arc::new(MockTransport::tcp("tcp").fail_listen_on(bad.clone())))
            .unwrap();

        let result = tm.listen(&[bad]).await;
        assert_matches!(
            result,
            Err(TransportError::NoValidAddresses { transports }) if transports == vec!["tcp".to_string()]
        );
    }

    #[tokio::test]
    async fn test_listen_failure_is_tolerated_under_no_fatal() {
        let tm = manager(FaultTolerance::NoFatal);
        let bad = addr("/ip4/127.0.0.1/tcp/4001");
        tm.add(Arc::new(MockTransport::tcp("tcp").fail_listen_on(bad.clone())))
            .unwrap();

        tm.listen(&[bad]).await.unwrap();
        assert!(tm.addrs().is_empty());
    }

    #[tokio::test]
    async fn test_fatal_transport_keeps_earlier_listeners_bound() {
        let tm = manager(FaultTolerance::FatalAll);
        let bad = addr("/ip4/127.0.0.1/tcp/4001");
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();
        tm.add(Arc::new(MockTransport::tcp("tcp").fail_listen_on(bad.clone())))
            .unwrap();

        let result = tm.listen(&[addr("/memory/1"), bad]).await;
        assert_matches!(result, Err(TransportError::NoValidAddresses { .. }));
        assert_eq!(tm.addrs(), vec![addr("/memory/1")]);
    }

    #[tokio::test]
    async fn test_unmatched_addresses_fail_under_fatal_all() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();

        let result = tm.listen(&[addr("/ip4/127.0.0.1/udp/4001/quic-v1")]).await;
        assert_matches!(
            result,
            Err(TransportError::NoValidAddresses { transports })
                if transports == vec!["tcp".to_string(), "memory".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unmatched_addresses_are_logged_under_no_fatal() {
        let tm = manager(FaultTolerance::NoFatal);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();

        tm.listen(&[addr("/ip4/127.0.0.1/udp/4001/quic-v1")])
            .await
            .unwrap();
        assert!(tm.listeners().is_empty());
    }

    #[tokio::test]
    async fn test_listen_without_transports_fails_under_fatal_all() {
        let tm = manager(FaultTolerance::FatalAll);
        let result = tm.listen(&[addr("/ip4/127.0.0.1/tcp/4001")]).await;
        assert_matches!(
            result,
            Err(TransportError::NoValidAddresses { transports }) if transports.is_empty()
        );
    }

    #[tokio::test]
    async fn test_listen_without_transports_is_tolerated_under_no_fatal() {
        let tm = manager(FaultTolerance::NoFatal);
        tm.listen(&[addr("/ip4/127.0.0.1/tcp/4001")])
            .await
            .unwrap();
        assert!(tm.listeners().is_empty());
    }

    #[tokio::test]
    async fn test_dial_does_not_wait_for_listen() {
        let tm = Arc::new(manager(FaultTolerance::FatalAll));
        let bind = addr("/ip4/127.0.0.1/tcp/4001");
        tm.add(Arc::new(
            MockTransport::tcp("tcp").hang_listen_on(bind.clone()),
        ))
        .unwrap();

        let listening = tokio::spawn({
            let tm = Arc::clone(&tm);
            async move { tm.listen(&[bind]).await }
        });
        tokio::task::yield_now().await;
        assert!(!listening.is_finished());
        assert_eq!(tm.listeners().len(), 1);

        let target = addr("/ip4/10.0.0.2/tcp/4001");
        let conn = tokio::time::timeout(
            Duration::from_secs(1),
            tm.dial(&target, DialOptions::default()),
        )
        .await
        .expect("dial blocked on listen")
        .unwrap();
        assert_eq!(conn.remote_addr(), &target);

        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();
        assert_eq!(tm.transports().len(), 2);

        listening.abort();
    }

    #[tokio::test]
    async fn test_after_start_listens_on_source_addresses() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();

        tm.start();
        assert!(tm.is_started());
        let source = vec![addr("/ip4/127.0.0.1/tcp/4001")];
        tm.after_start(&source).await.unwrap();
        assert_eq!(tm.addrs(), source);
    }

    #[tokio::test]
    async fn test_listener_events_are_forwarded() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();
        let mut events = tm.subscribe();

        tm.listen(&[addr("/ip4/127.0.0.1/tcp/4001")]).await.unwrap();
        let event = events.recv().await.unwrap();
        assert_matches!(event, TransportEvent::Listening(ref l) if l.transport() == "tcp");

        let tracked = tm.listeners_for("tcp").remove(0);
        tracked.listener().close().await.unwrap();

        let event = events.recv().await.unwrap();
        assert_matches!(event, TransportEvent::Close(ref l) if l.id() == tracked.id());
        assert!(tm.listeners().is_empty());
    }

    #[tokio::test]
    async fn test_stop_closes_everything_and_is_idempotent() {
        let tm = manager(FaultTolerance::FatalAll);
        let tcp = Arc::new(MockTransport::tcp("tcp").fail_close());
        tm.add(tcp.clone()).unwrap();
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();

        tm.start();
        tm.listen(&[addr("/ip4/127.0.0.1/tcp/4001"), addr("/memory/1")])
            .await
            .unwrap();
        assert_eq!(tm.listeners().len(), 2);

        tm.stop().await;
        assert!(tm.listeners().is_empty());
        assert!(tm.addrs().is_empty());
        assert!(!tm.is_started());
        assert_eq!(tcp.closed().len(), 1);

        tm.stop().await;
        assert!(tm.listeners().is_empty());
        assert_eq!(tm.transports().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_closes_listeners_last_in_first_out() {
        let tm = manager(FaultTolerance::FatalAll);
        let tcp = Arc::new(MockTransport::tcp("tcp"));
        tm.add(tcp.clone()).unwrap();

        tm.listen(&[
            addr("/ip4/127.0.0.1/tcp/4001"),
            addr("/ip4/127.0.0.1/tcp/4002"),
            addr("/ip4/127.0.0.1/tcp/4003"),
        ])
        .await
        .unwrap();
        let created: Vec<_> = tm.listeners_for("tcp").iter().map(|l| l.id()).collect();

        tm.remove("tcp").await;

        let mut expected = created;
        expected.reverse();
        assert_eq!(tcp.closed(), expected);
        assert!(tm.transports().is_empty());
        assert!(tm.listeners().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_tag_is_a_noop() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp"))).unwrap();
        tm.remove("ws").await;
        assert_eq!(tm.transports().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_all_empties_registry() {
        let tm = manager(FaultTolerance::FatalAll);
        tm.add(Arc::new(MockTransport::tcp("tcp").fail_close()))
            .unwrap();
        tm.add(Arc::new(MockTransport::memory("memory"))).unwrap();
        tm.listen(&[addr("/ip4/127.0.0.1/tcp/4001"), addr("/memory/1")])
            .await
            .unwrap();

        tm.remove_all().await;
        assert!(tm.transports().is_empty());
        assert!(tm.listeners().is_empty());
    }

    #[test]
    fn test_accessors_are_empty_when_unconfigured() {
        let tm = manager(FaultTolerance::FatalAll);
        assert!(tm.transports().is_empty());
        assert!(tm.listeners().is_empty());
        assert!(tm.addrs().is_empty());
        assert!(tm.listeners_for("tcp").is_empty());
        assert!(!tm.is_started());
    }
}
