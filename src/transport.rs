//! Transport abstraction and the WebSocket implementation.
//!
//! The traits put a seam between the connection manager and the network so
//! the manager's state machine can be driven by scripted transports in
//! tests. Only the inbound direction is consumed; the outbound half of the
//! WebSocket exists solely for protocol bookkeeping (pong replies).

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use crate::error::{IngestError, Result};

/// One live bidirectional streaming connection, inbound side.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Receive the next raw payload.
    ///
    /// Returns:
    /// - `Ok(Some(payload))` - a message arrived
    /// - `Ok(None)` - the peer closed the stream (normal termination)
    /// - `Err(e)` - the transport failed
    async fn next_message(&mut self) -> Result<Option<String>>;
}

/// Opens transports to an endpoint. The endpoint is an opaque string as far
/// as the manager is concerned; only the connector interprets it.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Transport: Transport;

    /// Open one transport to the endpoint.
    async fn connect(&self, endpoint: &str) -> Result<Self::Transport>;
}

/// Production connector speaking WebSocket via tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

/// A live WebSocket transport (plain or TLS).
pub struct WsTransport {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&self, endpoint: &str) -> Result<WsTransport> {
        debug!(%endpoint, "opening websocket");
        let (inner, response) = connect_async(endpoint)
            .await
            .map_err(|e| IngestError::transport_with_source("websocket handshake failed", e))?;
        trace!(status = %response.status(), "websocket handshake complete");
        Ok(WsTransport { inner })
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn next_message(&mut self) -> Result<Option<String>> {
        loop {
            match self.inner.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) => {
                    debug!("websocket close frame received");
                    return Ok(None);
                }
                // Ping/pong are handled by tungstenite; binary frames are
                // not part of the telemetry wire format
                Some(Ok(other)) => {
                    trace!(kind = ?other, "skipping non-text websocket message");
                }
                Some(Err(e)) => {
                    return Err(IngestError::transport_with_source("websocket receive failed", e));
                }
            }
        }
    }
}
