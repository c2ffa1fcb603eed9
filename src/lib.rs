//! Resilient ingestion client for live vehicle telemetry.
//!
//! This crate is the live ingestion layer of a real-time telemetry viewer:
//! it maintains a persistent WebSocket stream from a telemetry producer,
//! recovers from disconnects with a fixed-delay retry, decodes inbound JSON
//! frames, and publishes the latest frame, connection phase, and a
//! frames-per-second throughput sample for a rendering layer to read.
//!
//! # Features
//!
//! - **Self-healing stream**: automatic reconnect 3 seconds after any
//!   transport loss, indefinitely
//! - **Crash-proof decoding**: a malformed message is dropped, never
//!   propagated and never fatal
//! - **Tear-free state**: one writer, any number of readers, whole-snapshot
//!   publication via a watch channel
//! - **Deterministic shutdown**: no timer fires after `shutdown()` returns
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lightsout_ingest::{ConnectionManager, resolve_endpoint};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = ConnectionManager::new(resolve_endpoint("localhost"));
//!     manager.start();
//!
//!     let mut updates = manager.updates();
//!     while let Some(snapshot) = updates.next().await {
//!         if let Some(frame) = &snapshot.frame {
//!             println!("{:.0} km/h gear {} ({} fps)", frame.speed, frame.gear, snapshot.throughput);
//!         }
//!     }
//! }
//! ```

pub mod decode;
pub mod endpoint;
mod error;
pub mod manager;
pub mod meter;
pub mod state;
pub mod transport;
pub mod types;

// Core exports
pub use decode::{DecodeError, decode};
pub use endpoint::{LOCAL_ENDPOINT, resolve_endpoint};
pub use error::{IngestError, Result};
pub use manager::{ConnectionManager, RETRY_DELAY};
pub use meter::{THROUGHPUT_WINDOW, ThroughputMeter};
pub use state::{StateStore, StreamSnapshot};
pub use transport::{Connector, Transport, WsConnector, WsTransport};
pub use types::{ConnectionPhase, Gear, TelemetryFrame};
