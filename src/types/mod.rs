//! Core types for telemetry stream representation.
//!
//! - [`TelemetryFrame`] is the fundamental data unit that flows through the
//!   system; everything published downstream is derived from it.
//! - [`Gear`] types the wire's symbolic gear strings.
//! - [`ConnectionPhase`] is the connection lifecycle state.

mod frame;
mod phase;

pub use frame::{Gear, InvalidGear, TelemetryFrame};
pub use phase::ConnectionPhase;
