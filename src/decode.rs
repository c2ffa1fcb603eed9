//! Wire payload decoding.
//!
//! Each inbound message is a single JSON object. Decoding either produces a
//! complete [`TelemetryFrame`] or a [`DecodeError`]; it never panics and a
//! failure never terminates the connection. Unknown extra fields are
//! ignored; missing required fields fail. No schema versioning is assumed.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{Gear, TelemetryFrame};

/// Error produced when an inbound payload cannot become a frame.
///
/// Decode failures are always recoverable: the message is dropped and the
/// published state is left untouched.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed payload: {source}")]
    MalformedSyntax {
        #[source]
        source: serde_json::Error,
    },

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DecodeError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidField { field, reason: reason.into() }
    }
}

/// Decode a raw inbound message into a telemetry frame.
///
/// Field values are taken exactly as the payload carries them; there is no
/// unit conversion and no rounding (serde_json's `float_roundtrip` feature
/// guarantees bit-exact doubles). `rpm` accepts integral-valued numbers
/// (some producers serialize it as a float) but rejects fractional ones,
/// and `gear` accepts signed integers alongside the symbolic strings.
pub fn decode(raw: &str) -> Result<TelemetryFrame, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| DecodeError::MalformedSyntax { source })?;
    let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let speed = require_number(obj, "speed")?;
    if speed < 0.0 {
        return Err(DecodeError::invalid("speed", format!("negative speed {speed}")));
    }

    let gear = require_gear(obj)?;
    let rpm = require_rpm(obj)?;

    let throttle = require_number(obj, "throttle")?;
    if !(0.0..=100.0).contains(&throttle) {
        return Err(DecodeError::invalid("throttle", format!("{throttle} outside 0-100")));
    }

    // Producer-defined scale, stored verbatim (see TelemetryFrame::brake)
    let brake = require_number(obj, "brake")?;

    let x = require_number(obj, "x")?;
    let y = require_number(obj, "y")?;

    Ok(TelemetryFrame { speed, gear, rpm, throttle, brake, x, y })
}

fn require_number(obj: &Map<String, Value>, field: &'static str) -> Result<f64, DecodeError> {
    let value = obj.get(field).ok_or(DecodeError::MissingField { field })?;
    value.as_f64().ok_or_else(|| DecodeError::invalid(field, format!("expected number, got {value}")))
}

fn require_gear(obj: &Map<String, Value>) -> Result<Gear, DecodeError> {
    let value = obj.get("gear").ok_or(DecodeError::MissingField { field: "gear" })?;
    if let Some(symbol) = value.as_str() {
        return symbol
            .parse()
            .map_err(|e: crate::types::InvalidGear| DecodeError::invalid("gear", e.to_string()));
    }
    // Leniency for producers that serialize gear as a signed integer
    // (-1 reverse, 0 neutral, 1-9 forward) instead of a symbolic string
    if let Some(n) = value.as_i64() {
        return match n {
            -1 => Ok(Gear::Reverse),
            0 => Ok(Gear::Neutral),
            1..=9 => Ok(Gear::Forward(n as u8)),
            _ => Err(DecodeError::invalid("gear", format!("gear number {n} out of range"))),
        };
    }
    Err(DecodeError::invalid("gear", format!("expected string or integer, got {value}")))
}

fn require_rpm(obj: &Map<String, Value>) -> Result<u32, DecodeError> {
    let value = require_number(obj, "rpm")?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(DecodeError::invalid("rpm", format!("expected non-negative integer, got {value}")));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REQUIRED_FIELDS: [&str; 7] = ["speed", "gear", "rpm", "throttle", "brake", "x", "y"];

    fn valid_payload() -> Value {
        json!({
            "speed": 250.0,
            "gear": "7",
            "rpm": 11000,
            "throttle": 95.0,
            "brake": 0.0,
            "x": 120.5,
            "y": -40.2
        })
    }

    #[test]
    fn well_formed_payload_decodes_exactly() {
        let frame = decode(&valid_payload().to_string()).unwrap();

        assert_eq!(frame.speed, 250.0);
        assert_eq!(frame.gear, Gear::Forward(7));
        assert_eq!(frame.rpm, 11000);
        assert_eq!(frame.throttle, 95.0);
        assert_eq!(frame.brake, 0.0);
        assert_eq!(frame.x, 120.5);
        assert_eq!(frame.y, -40.2);
    }

    #[test]
    fn each_missing_required_field_fails() {
        for field in REQUIRED_FIELDS {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().remove(field);

            match decode(&payload.to_string()) {
                Err(DecodeError::MissingField { field: reported }) => assert_eq!(reported, field),
                other => panic!("expected MissingField for `{field}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_syntax_is_reported_as_such() {
        assert!(matches!(decode("{not json"), Err(DecodeError::MalformedSyntax { .. })));
        assert!(matches!(decode(""), Err(DecodeError::MalformedSyntax { .. })));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(decode("[1, 2, 3]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode("42"), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let mut payload = valid_payload();
        let obj = payload.as_object_mut().unwrap();
        obj.insert("drs".into(), json!(1.0));
        obj.insert("driver_id".into(), json!("VER"));

        let frame = decode(&payload.to_string()).unwrap();
        assert_eq!(frame.speed, 250.0);
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let cases = [
            ("speed", json!(-1.0)),
            ("throttle", json!(150.0)),
            ("throttle", json!(-0.5)),
            ("rpm", json!(-200)),
            ("rpm", json!(1050.5)),
            ("gear", json!("D")),
            ("gear", json!(3.5)),
            ("gear", json!(10)),
            ("gear", json!(true)),
            ("x", json!("120.5")),
        ];

        for (field, bad) in cases {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().insert(field.to_string(), bad.clone());

            match decode(&payload.to_string()) {
                Err(DecodeError::InvalidField { field: reported, .. }) => {
                    assert_eq!(reported, field, "wrong field reported for {field}={bad}")
                }
                other => panic!("expected InvalidField for {field}={bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn floats_survive_decoding_bit_for_bit() {
        // Shortest-representation doubles must parse back to the exact
        // value the producer serialized, down to the last ulp
        let speed = 119.89750436925185_f64;
        let raw = format!(
            r#"{{"speed":{speed:?},"gear":"7","rpm":11000,"throttle":95.0,"brake":0.0,"x":120.5,"y":-40.2}}"#
        );

        let frame = decode(&raw).unwrap();
        assert_eq!(frame.speed.to_bits(), speed.to_bits());
    }

    #[test]
    fn integer_encoded_gear_is_accepted() {
        for (number, expected) in
            [(json!(-1), Gear::Reverse), (json!(0), Gear::Neutral), (json!(7), Gear::Forward(7))]
        {
            let mut payload = valid_payload();
            payload.as_object_mut().unwrap().insert("gear".into(), number);

            assert_eq!(decode(&payload.to_string()).unwrap().gear, expected);
        }
    }

    #[test]
    fn float_encoded_rpm_is_accepted() {
        // Some producers serialize rpm through f32, so "11000.0" appears on the wire
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().insert("rpm".into(), json!(11000.0));

        assert_eq!(decode(&payload.to_string()).unwrap().rpm, 11000);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_preserves_arbitrary_well_formed_payloads(
                speed in 0.0f64..450.0,
                gear in prop_oneof![Just("R"), Just("N"), Just("1"), Just("4"), Just("9")],
                rpm in 0u32..20000,
                throttle in 0.0f64..=100.0,
                brake in 0.0f64..=100.0,
                x in -5000.0f64..5000.0,
                y in -5000.0f64..5000.0,
            ) {
                let payload = json!({
                    "speed": speed,
                    "gear": gear,
                    "rpm": rpm,
                    "throttle": throttle,
                    "brake": brake,
                    "x": x,
                    "y": y,
                });

                let frame = decode(&payload.to_string()).unwrap();
                prop_assert_eq!(frame.speed, speed);
                prop_assert_eq!(frame.gear.to_string(), gear);
                prop_assert_eq!(frame.rpm, rpm);
                prop_assert_eq!(frame.throttle, throttle);
                prop_assert_eq!(frame.brake, brake);
                prop_assert_eq!(frame.x, x);
                prop_assert_eq!(frame.y, y);
            }

            #[test]
            fn arbitrary_garbage_never_panics(raw in ".*") {
                // Either outcome is fine, the decoder just must not panic
                let _ = decode(&raw);
            }
        }
    }
}
