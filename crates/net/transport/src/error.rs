//! Error types for transport registration, dialing and listening.

use libp2p::Multiaddr;

/// Boxed error used for failures a transport could not classify.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from the transport manager and the transports it drives.
///
/// Transports report their own failures through this type too. A failure
/// that carries no classification is reported as [`TransportError::Other`]
/// and re-tagged as [`TransportError::TransportDialFailed`] when it surfaces
/// from [`TransportManager::dial`](crate::TransportManager::dial).
#[derive(Debug, thiserror::Error, strum::EnumDiscriminants)]
#[strum_discriminants(name(TransportErrorKind))]
#[strum_discriminants(derive(Hash, strum::IntoStaticStr, strum::Display))]
pub enum TransportError {
    /// The transport exposes no usable identity tag.
    #[error("transport must have a valid tag")]
    InvalidKey,

    /// A transport is already registered under this tag.
    #[error("there is already a transport with the tag {tag}")]
    DuplicateTransport { tag: String },

    /// No registered transport accepts the address.
    #[error("no transport available for address {addr}")]
    TransportUnavailable { addr: Multiaddr },

    /// The transport failed to dial and gave no more specific reason.
    #[error("dial to {addr} failed: {source}")]
    TransportDialFailed {
        addr: Multiaddr,
        #[source]
        source: BoxError,
    },

    /// No listener could be bound, either for one transport or for all of them.
    #[error("no valid addresses were provided for transports [{}]", transports.join(", "))]
    NoValidAddresses { transports: Vec<String> },

    #[error("dial to {addr} timed out")]
    DialTimeout { addr: Multiaddr },

    #[error("connection to {addr} refused")]
    ConnectionRefused { addr: Multiaddr },

    #[error("connection upgrade failed: {reason}")]
    Upgrade { reason: String },

    #[error("failed to listen on {addr}: {reason}")]
    ListenFailed { addr: Multiaddr, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unclassified transport failure.
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    /// The kind of this error, usable as a metrics label.
    pub fn kind(&self) -> TransportErrorKind {
        TransportErrorKind::from(self)
    }

    /// Whether the error carries a classification of its own.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Wrap an arbitrary error as an unclassified transport failure.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    /// Re-tag an unclassified failure as a dial failure for `addr`.
    ///
    /// Classified errors are returned unchanged.
    pub(crate) fn into_dial_error(self, addr: &Multiaddr) -> Self {
        match self {
            Self::Other(source) => Self::TransportDialFailed {
                addr: addr.clone(),
                source,
            },
            err => err,
        }
    }
}
