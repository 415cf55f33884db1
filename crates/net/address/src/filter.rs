//! Announce filter applied to the advertised address set.

use std::fmt;
use std::sync::Arc;

use libp2p::Multiaddr;

type FilterFn = dyn Fn(Vec<Multiaddr>) -> Vec<Multiaddr> + Send + Sync;

/// Transform applied to the computed address set before it is advertised.
///
/// Defaults to the identity.
#[derive(Clone)]
pub struct AnnounceFilter(Option<Arc<FilterFn>>);

impl AnnounceFilter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Multiaddr>) -> Vec<Multiaddr> + Send + Sync + 'static,
    {
        Self(Some(Arc::new(f)))
    }

    /// Keep only addresses matching `predicate`.
    pub fn retain<P>(predicate: P) -> Self
    where
        P: Fn(&Multiaddr) -> bool + Send + Sync + 'static,
    {
        Self::new(move |addrs| addrs.into_iter().filter(|a| predicate(a)).collect())
    }

    pub fn identity() -> Self {
        Self(None)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_none()
    }

    pub fn apply(&self, addrs: Vec<Multiaddr>) -> Vec<Multiaddr> {
        match &self.0 {
            Some(f) => f(addrs),
            None => addrs,
        }
    }
}

impl Default for AnnounceFilter {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for AnnounceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            f.write_str("AnnounceFilter(identity)")
        } else {
            f.write_str("AnnounceFilter(custom)")
        }
    }
}
