//! Published stream state.
//!
//! The store decouples the ingestion core from whatever consumes it: the
//! core is the single writer, the rendering layer holds watch receivers.
//! Every setter publishes one whole snapshot, so readers always see the
//! most recent value and never a torn update.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::types::{ConnectionPhase, TelemetryFrame};

/// The externally observable snapshot of the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSnapshot {
    /// Latest accepted frame, `None` until the first message decodes
    pub frame: Option<TelemetryFrame>,

    /// Current connection lifecycle phase
    pub phase: ConnectionPhase,

    /// Frames accepted in the most recently completed 1-second window
    pub throughput: u64,
}

impl Default for StreamSnapshot {
    fn default() -> Self {
        Self { frame: None, phase: ConnectionPhase::Disconnected, throughput: 0 }
    }
}

/// Single-writer store publishing [`StreamSnapshot`] values to any number
/// of readers. Writes are last-write-wins.
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<StreamSnapshot>>,
}

impl StateStore {
    /// Create a store holding the initial snapshot: no frame, disconnected,
    /// zero throughput.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StreamSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the latest frame. Only called with frames that passed decoding.
    pub fn set_frame(&self, frame: TelemetryFrame) {
        self.tx.send_modify(|snapshot| snapshot.frame = Some(frame));
    }

    /// Publish a connection phase transition.
    pub fn set_phase(&self, phase: ConnectionPhase) {
        self.tx.send_modify(|snapshot| snapshot.phase = phase);
    }

    /// Publish the sample for the window that just completed.
    pub fn set_throughput(&self, sample: u64) {
        self.tx.send_modify(|snapshot| snapshot.throughput = sample);
    }

    /// Current snapshot by value.
    pub fn snapshot(&self) -> StreamSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<StreamSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
