//! Endpoint resolution.
//!
//! Configuration, not core logic: the manager accepts the resolved endpoint
//! as an opaque string. Resolution mirrors how the dashboard derives its
//! producer address: a local host talks plain WebSocket to the fixed local
//! port, while a forwarded dev host (Codespaces-style, where each port gets
//! its own hostname suffix) swaps the UI port suffix for the telemetry one
//! and upgrades to TLS.

/// Fixed endpoint used when running against a local producer.
pub const LOCAL_ENDPOINT: &str = "ws://localhost:3000/ws";

/// Hostname suffix of the dev UI port on forwarded hosts.
const UI_PORT_SUFFIX: &str = "-5173";

/// Hostname suffix of the telemetry port on forwarded hosts.
const TELEMETRY_PORT_SUFFIX: &str = "-3000";

/// Derive the telemetry endpoint from the host the viewer runs on.
pub fn resolve_endpoint(host: &str) -> String {
    if host == "localhost" || host == "127.0.0.1" {
        LOCAL_ENDPOINT.to_string()
    } else {
        format!("wss://{}/ws", host.replace(UI_PORT_SUFFIX, TELEMETRY_PORT_SUFFIX))
    }
}
