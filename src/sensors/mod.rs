//! Inverter sensors.
//! Declarative descriptors for the registers of the `ReadRealTimeData` payload
//! and the pure functions decoding them.
pub mod conversions;
mod descriptor;
mod error;
mod reader;
mod table;

pub use conversions::Conversion;
pub use descriptor::{
    Conversions, Device, DeviceClass, Registers, SensorDescriptor, StateClass, Unit,
};
pub use error::{DecodeError, Result};
pub use reader::{SensorReading, decode, entity_id, read, unique_id};
pub use table::DESCRIPTORS;

use std::fmt;

/// A decoded sensor value.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    Number(f64),
    Label(String),
}

impl SensorValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SensorValue::Number(value) => Some(*value),
            SensorValue::Label(_) => None,
        }
    }
}

/// Formats the value as a Home Assistant state string.
/// Numbers are rounded to 3 decimals and printed without a trailing `.0`.
impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Number(value) => {
                let rounded = (value * 1000.0).round() / 1000.0;
                // avoid "-0"
                let rounded = if rounded == 0.0 { 0.0 } else { rounded };
                write!(f, "{rounded}")
            }
            SensorValue::Label(label) => f.write_str(label),
        }
    }
}
