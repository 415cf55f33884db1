//! Listener lifecycle notifications back into the transport manager.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use tracing::trace;

use crate::events::{ListenerId, TrackedListener, TransportEvent};
use crate::manager::Shared;
use crate::traits::Listener;

/// Handle a listener uses to report `listening` and `closed`.
///
/// Notifications are handled synchronously: by the time `closed()` returns
/// the listener is no longer tracked and the event has been broadcast.
#[derive(Clone)]
pub struct ListenerNotifier {
    id: ListenerId,
    transport: Arc<str>,
    listener: Arc<OnceLock<Weak<dyn Listener>>>,
    shared: Weak<Shared>,
}

impl ListenerNotifier {
    pub(crate) fn new(id: ListenerId, transport: Arc<str>, shared: Weak<Shared>) -> Self {
        Self {
            id,
            transport,
            listener: Arc::new(OnceLock::new()),
            shared,
        }
    }

    /// A notifier attached to no manager. Notifications are dropped.
    pub fn detached() -> Self {
        Self::new(ListenerId::next(), Arc::from(""), Weak::new())
    }

    pub(crate) fn bind(&self, listener: &Arc<dyn Listener>) {
        let _ = self.listener.set(Arc::downgrade(listener));
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    fn tracked(&self) -> Option<TrackedListener> {
        let listener = self.listener.get()?.upgrade()?;
        Some(TrackedListener::new(
            self.id,
            Arc::clone(&self.transport),
            listener,
        ))
    }

    /// The listener started accepting connections.
    pub fn listening(&self) {
        let (Some(shared), Some(tracked)) = (self.shared.upgrade(), self.tracked()) else {
            return;
        };
        trace!(listener = %self.id, transport = %self.transport, "listener listening");
        shared.events.emit(TransportEvent::Listening(tracked));
    }

    /// The listener closed. Removes it from the tracked list.
    pub fn closed(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let removed = {
            let mut listeners = shared.listeners.write();
            listeners.get_mut(&*self.transport).and_then(|list| {
                let pos = list.iter().position(|l| l.id() == self.id)?;
                Some(list.remove(pos))
            })
        };

        shared.metrics.listeners_closed_total.increment(1);
        trace!(
            listener = %self.id,
            transport = %self.transport,
            was_tracked = removed.is_some(),
            "listener closed"
        );

        if let Some(tracked) = removed.or_else(|| self.tracked()) {
            shared.events.emit(TransportEvent::Close(tracked));
        }
    }
}

impl fmt::Debug for ListenerNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerNotifier")
            .field("id", &self.id)
            .field("transport", &self.transport)
            .finish()
    }
}
