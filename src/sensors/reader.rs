//! Sensor reader.
//! Pure evaluation of a descriptor against the last known payload.
use regex::Regex;
use std::sync::LazyLock;

use super::descriptor::{Conversions, Registers, SensorDescriptor};
use super::{Conversion, DecodeError, Result, SensorValue};
use crate::integration::qcells::{InverterIdentity, Payload};

static UNIQUE_ID_PREFIX: &str = "qcells_inverter";
static ENTITY_ID_INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").expect("invalid entity id regex"));

/// One decoded sensor, ready to be published.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub entity_id: String,
    pub unique_id: String,
    pub descriptor: SensorDescriptor,
    pub value: SensorValue,
}

/// Decode the value of `descriptor` from `payload`.
///
/// A single register is converted on its own. Combined registers are
/// converted one by one and summed. The number of conversions must match the
/// number of registers; this is checked here and not when the descriptor is
/// built.
pub fn decode(descriptor: &SensorDescriptor, payload: &Payload) -> Result<SensorValue> {
    match (descriptor.registers, descriptor.conversions) {
        (Registers::Single(position), Conversions::Identity) => {
            Ok(Conversion::Identity.apply(register(payload, position)?))
        }
        (Registers::Single(position), Conversions::Single(conversion))
        | (Registers::Single(position), Conversions::PerRegister(&[conversion])) => {
            Ok(conversion.apply(register(payload, position)?))
        }
        (Registers::Combined(positions), Conversions::Identity) => sum(
            payload,
            positions.iter().map(|&position| (position, Conversion::Identity)),
        ),
        (Registers::Combined(positions), Conversions::PerRegister(conversions))
            if positions.len() == conversions.len() =>
        {
            sum(
                payload,
                positions.iter().copied().zip(conversions.iter().copied()),
            )
        }
        (registers, conversions) => Err(DecodeError::ArityMismatch {
            registers: registers.len(),
            conversions: conversions.len(),
        }),
    }
}

/// Decode `descriptor` and attach the identifiers of the inverter it belongs to.
pub fn read(
    descriptor: &SensorDescriptor,
    identity: &InverterIdentity,
    payload: &Payload,
) -> Result<SensorReading> {
    let value = decode(descriptor, payload)?;
    Ok(SensorReading {
        entity_id: entity_id(descriptor, &identity.serial_number),
        unique_id: unique_id(descriptor, &identity.serial_number),
        descriptor: *descriptor,
        value,
    })
}

/// Stable identifier of a sensor: serial number plus zero padded register positions.
pub fn unique_id(descriptor: &SensorDescriptor, serial_number: &str) -> String {
    let positions: String = descriptor
        .registers
        .positions()
        .iter()
        .map(|position| format!("{position:03}"))
        .collect();
    format!("{UNIQUE_ID_PREFIX}_{serial_number}_{positions}")
}

/// Home Assistant entity id derived from the unique id.
pub fn entity_id(descriptor: &SensorDescriptor, serial_number: &str) -> String {
    let unique_id = unique_id(descriptor, serial_number).to_lowercase();
    format!(
        "sensor.{}",
        ENTITY_ID_INVALID_CHARS.replace_all(&unique_id, "_")
    )
}

fn register(payload: &Payload, position: usize) -> Result<i64> {
    payload
        .register(position)
        .ok_or(DecodeError::IndexOutOfRange {
            position,
            len: payload.data.len(),
        })
}

fn sum(
    payload: &Payload,
    registers: impl Iterator<Item = (usize, Conversion)>,
) -> Result<SensorValue> {
    let mut total = 0.0;
    for (position, conversion) in registers {
        match conversion.apply(register(payload, position)?) {
            SensorValue::Number(value) => total += value,
            SensorValue::Label(_) => return Err(DecodeError::NonNumericComposite),
        }
    }
    Ok(SensorValue::Number(total))
}
