//! Transport Manager Metrics

use metrics::Counter;

use crate::error::TransportErrorKind;

/// Transport Manager Metrics
#[derive(Clone, Debug)]
pub(crate) struct TransportMetrics {
    /// Number of dials routed to a transport
    pub(crate) dials_total: Counter,
    /// Number of listen attempts that failed to bind
    pub(crate) listen_failures_total: Counter,
    /// Number of listener close notifications
    pub(crate) listeners_closed_total: Counter,
    /// Number of listener closes that returned an error
    pub(crate) close_failures_total: Counter,
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self {
            dials_total: metrics::counter!("transport.dial.total"),
            listen_failures_total: metrics::counter!("transport.listen.failures"),
            listeners_closed_total: metrics::counter!("transport.listener.closed"),
            close_failures_total: metrics::counter!("transport.listener.close_failures"),
        }
    }
}

impl TransportMetrics {
    pub(crate) fn record_dial_failure(&self, kind: TransportErrorKind) {
        let kind: &'static str = kind.into();
        metrics::counter!("transport.dial.failures", "kind" => kind).increment(1);
    }
}
