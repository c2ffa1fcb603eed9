//! Connection lifecycle management.
//!
//! [`ConnectionManager`] owns the transport for its whole lifetime and is
//! the only component that touches the network. A single ingest task runs
//! the connect / read / retry cycle, which structurally guarantees at most
//! one live transport and at most one pending retry timer at any time.
//! Everything observable happens through the [`StateStore`]: the phase,
//! the latest frame, and the per-window throughput sample.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::decode::decode;
use crate::meter::ThroughputMeter;
use crate::state::{StateStore, StreamSnapshot};
use crate::transport::{Connector, Transport, WsConnector};
use crate::types::ConnectionPhase;

/// Fixed delay between a transport loss and the reconnect attempt.
///
/// Retries continue indefinitely with no backoff growth and no attempt
/// ceiling; the stream is expected to run unattended.
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Maintains one persistent telemetry stream and publishes its state.
///
/// # Concurrency
///
/// Shutdown is cooperative: [`shutdown`](Self::shutdown) cancels the ingest
/// task's token and the task exits at its next suspension point. On a
/// current-thread runtime that point is reached before any caller code runs
/// again, so the "no mutation after shutdown returns" guarantee is exact.
/// On a multi-thread runtime the task may still be unwinding for an instant
/// after `shutdown` returns; it re-checks the token before publishing a
/// frame, so no stale frame lands in the store, and a `start` issued in
/// that instant spawns a fresh task that coexists with the dying one only
/// until the latter observes its token.
///
/// # Example
///
/// ```rust,no_run
/// use lightsout_ingest::{ConnectionManager, resolve_endpoint};
///
/// #[tokio::main]
/// async fn main() {
///     let manager = ConnectionManager::new(resolve_endpoint("localhost"));
///     manager.start();
///
///     let mut state = manager.subscribe();
///     while state.changed().await.is_ok() {
///         let snapshot = state.borrow().clone();
///         println!("{} • {} fps", snapshot.phase, snapshot.throughput);
///     }
/// }
/// ```
pub struct ConnectionManager<C: Connector = WsConnector> {
    connector: Arc<C>,
    endpoint: String,
    store: StateStore,
    /// Token of the running ingest task, `None` when stopped
    live: Mutex<Option<CancellationToken>>,
}

impl ConnectionManager<WsConnector> {
    /// Create a manager targeting the given WebSocket endpoint.
    ///
    /// See [`resolve_endpoint`](crate::resolve_endpoint) for deriving the
    /// endpoint from the viewer's host; the manager itself treats it as an
    /// opaque string.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_connector(WsConnector, endpoint)
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager using a custom connector.
    pub fn with_connector(connector: C, endpoint: impl Into<String>) -> Self {
        Self {
            connector: Arc::new(connector),
            endpoint: endpoint.into(),
            store: StateStore::new(),
            live: Mutex::new(None),
        }
    }

    /// Start the ingest task.
    ///
    /// Transitions DISCONNECTED → CONNECTING and opens the transport.
    /// Calling `start` while the task is already running is a no-op.
    pub fn start(&self) {
        let mut live = self.live_guard();
        if live.is_some() {
            debug!("start ignored, ingest already running");
            return;
        }

        let cancel = CancellationToken::new();
        *live = Some(cancel.clone());

        let connector = Arc::clone(&self.connector);
        let endpoint = self.endpoint.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            ingest_task(connector, endpoint, store, cancel).await;
        });
    }

    /// Stop the ingest task and transition to DISCONNECTED.
    ///
    /// Cancels the pending retry timer and the throughput tick
    /// deterministically: once `shutdown` returns, no further state
    /// mutation occurs until [`start`](Self::start) is called again.
    /// Idempotent, including when never started.
    pub fn shutdown(&self) {
        let mut live = self.live_guard();
        match live.take() {
            Some(cancel) => {
                cancel.cancel();
                self.store.set_phase(ConnectionPhase::Disconnected);
                info!("ingest shut down");
            }
            None => debug!("shutdown ignored, ingest not running"),
        }
    }

    /// Current published state by value.
    pub fn snapshot(&self) -> StreamSnapshot {
        self.store.snapshot()
    }

    /// Subscribe to published state changes.
    pub fn subscribe(&self) -> watch::Receiver<StreamSnapshot> {
        self.store.subscribe()
    }

    /// Published state as a `Stream`, yielding the current snapshot
    /// immediately and every subsequent change.
    pub fn updates(&self) -> WatchStream<StreamSnapshot> {
        WatchStream::new(self.store.subscribe())
    }

    /// The endpoint this manager targets.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn live_guard(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        // Cancel the task on drop so no retry timer outlives the owner
        if let Some(cancel) = self.live_guard().take() {
            debug!("dropping connection manager, cancelling ingest task");
            cancel.cancel();
        }
    }
}

/// The single-task connect / read / retry cycle.
///
/// Every wait point selects on the cancellation token first (biased), so a
/// cancelled task acts on nothing that fires afterwards, and on the
/// throughput window so the tick keeps publishing through connects,
/// silence, and retry waits alike.
async fn ingest_task<C: Connector>(
    connector: Arc<C>,
    endpoint: String,
    store: StateStore,
    cancel: CancellationToken,
) {
    let mut meter = ThroughputMeter::default();
    info!(%endpoint, "ingest task started");

    'lifecycle: loop {
        store.set_phase(ConnectionPhase::Connecting);

        let connect = connector.connect(&endpoint);
        tokio::pin!(connect);
        let connected = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'lifecycle,
                result = &mut connect => break result,
                sample = meter.next_window() => store.set_throughput(sample),
            }
        };

        match connected {
            Ok(mut transport) => {
                info!("transport opened");
                store.set_phase(ConnectionPhase::Connected);

                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break 'lifecycle,
                        message = transport.next_message() => match message {
                            Ok(Some(payload)) => match decode(&payload) {
                                Ok(frame) => {
                                    // On a multi-thread runtime cancellation
                                    // can land between the select arm and
                                    // here; never publish past it
                                    if cancel.is_cancelled() {
                                        break 'lifecycle;
                                    }
                                    meter.record();
                                    store.set_frame(frame);
                                }
                                // Drop the message, keep the connection
                                Err(e) => warn!(error = %e, "dropping undecodable message"),
                            },
                            Ok(None) => {
                                info!("transport closed by peer");
                                break;
                            }
                            Err(e) => {
                                warn!(error = %e, "transport errored");
                                break;
                            }
                        },
                        sample = meter.next_window() => store.set_throughput(sample),
                    }
                }
            }
            Err(e) => warn!(error = %e, "connect failed"),
        }

        store.set_phase(ConnectionPhase::Disconnected);
        debug!(delay = ?RETRY_DELAY, "scheduling reconnect");

        let retry = tokio::time::sleep(RETRY_DELAY);
        tokio::pin!(retry);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'lifecycle,
                _ = &mut retry => break,
                sample = meter.next_window() => store.set_throughput(sample),
            }
        }
    }

    debug!("ingest task ended");
}
