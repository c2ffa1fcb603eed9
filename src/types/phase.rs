//! Connection lifecycle phase

use std::fmt;

use serde::Serialize;

/// Connection lifecycle state of the ingestion layer.
///
/// Exactly one value holds at any time, owned exclusively by the
/// [`ConnectionManager`](crate::ConnectionManager). `Disconnected` is the
/// only externally visible failure signal: it means "not currently
/// receiving data", whether because the stream dropped or because the
/// manager was never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionPhase {
    /// No transport; a retry may be pending
    Disconnected,
    /// Transport handshake in flight
    Connecting,
    /// Transport open, messages flowing
    Connected,
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionPhase::Disconnected => f.write_str("DISCONNECTED"),
            ConnectionPhase::Connecting => f.write_str("CONNECTING"),
            ConnectionPhase::Connected => f.write_str("CONNECTED"),
        }
    }
}
