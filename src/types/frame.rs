//! Telemetry frame types

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// One decoded snapshot of vehicle telemetry at a point in time.
///
/// Frames are immutable once constructed and replaced wholesale on each
/// accepted message. There is no partial merge: a frame either passed the
/// decoder as a unit or it never reaches the published state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    /// Vehicle speed in km/h (non-negative)
    pub speed: f64,

    /// Selected gear
    pub gear: Gear,

    /// Engine revolutions per minute
    pub rpm: u32,

    /// Throttle application in percent (0-100)
    pub throttle: f64,

    /// Brake input on the producer's scale.
    ///
    /// Producers disagree on whether this is a percentage or a pressed flag,
    /// so the raw number is stored verbatim; use [`TelemetryFrame::brake_applied`]
    /// for the boolean view.
    pub brake: f64,

    /// Track-local X coordinate
    pub x: f64,

    /// Track-local Y coordinate
    pub y: f64,
}

impl TelemetryFrame {
    /// Whether the brake is applied at all, regardless of the producer's scale.
    pub fn brake_applied(&self) -> bool {
        self.brake > 0.0
    }
}

/// Selected gear, parsed from the wire's symbolic string form.
///
/// The wire carries gears as strings (`"7"`, `"N"`, `"R"`); `Neutral` doubles
/// as the unknown/no-data marker, matching what consumers display before the
/// first frame arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gear {
    /// Reverse gear
    Reverse,
    /// Neutral, also the unknown/no-data marker
    Neutral,
    /// Forward gear 1-9
    Forward(u8),
}

impl FromStr for Gear {
    type Err = InvalidGear;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" | "r" => Ok(Gear::Reverse),
            "N" | "n" | "0" => Ok(Gear::Neutral),
            _ => match s.parse::<u8>() {
                Ok(n @ 1..=9) => Ok(Gear::Forward(n)),
                _ => Err(InvalidGear(s.to_string())),
            },
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gear::Reverse => f.write_str("R"),
            Gear::Neutral => f.write_str("N"),
            Gear::Forward(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Gear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a gear symbol is not part of the recognized set.
#[derive(Debug, Clone, Error)]
#[error("unrecognized gear symbol `{0}`")]
pub struct InvalidGear(pub String);
