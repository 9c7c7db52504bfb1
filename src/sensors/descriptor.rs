//! Sensor descriptors: how to extract and label one value from a payload.
use strum_macros::Display;

use super::Conversion;

/// Position(s) of a sensor in the payload's `Data` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registers {
    Single(usize),
    /// Registers decoded one by one and summed into one value.
    Combined(&'static [usize]),
}

impl Registers {
    pub fn positions(&self) -> &[usize] {
        match self {
            Registers::Single(position) => std::slice::from_ref(position),
            Registers::Combined(positions) => positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }
}

/// Conversion(s) applied to the raw register value(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversions {
    Identity,
    Single(Conversion),
    PerRegister(&'static [Conversion]),
}

impl Conversions {
    pub fn len(&self) -> usize {
        match self {
            Conversions::Identity | Conversions::Single(_) => 1,
            Conversions::PerRegister(conversions) => conversions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Unit {
    #[strum(serialize = "V")]
    Volt,
    #[strum(serialize = "A")]
    Ampere,
    #[strum(serialize = "W")]
    Watt,
    #[strum(serialize = "Hz")]
    Hertz,
    #[strum(serialize = "kWh")]
    KiloWattHour,
    #[strum(serialize = "%")]
    Percentage,
    #[strum(serialize = "°C")]
    Celsius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Voltage,
    Current,
    Power,
    Frequency,
    Energy,
    EnergyStorage,
    Battery,
    Temperature,
    Enum,
}

/// Aggregation kind of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StateClass {
    Measurement,
    /// Monotonically increasing total.
    TotalIncreasing,
    /// Resettable total.
    Total,
}

/// Part of the installation a sensor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Device {
    Inverter,
    Battery,
    Photovoltaik,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorDescriptor {
    pub name: &'static str,
    pub registers: Registers,
    pub unit: Option<Unit>,
    pub device_class: DeviceClass,
    pub conversions: Conversions,
    pub device: Device,
    pub state_class: Option<StateClass>,
}

impl SensorDescriptor {
    /// A measurement sensor without conversion.
    pub const fn new(
        registers: Registers,
        unit: Option<Unit>,
        device_class: DeviceClass,
        name: &'static str,
        device: Device,
    ) -> Self {
        SensorDescriptor {
            name,
            registers,
            unit,
            device_class,
            conversions: Conversions::Identity,
            device,
            state_class: Some(StateClass::Measurement),
        }
    }

    pub const fn with_conversion(self, conversion: Conversion) -> Self {
        SensorDescriptor {
            conversions: Conversions::Single(conversion),
            ..self
        }
    }

    pub const fn with_conversions(self, conversions: &'static [Conversion]) -> Self {
        SensorDescriptor {
            conversions: Conversions::PerRegister(conversions),
            ..self
        }
    }

    pub const fn with_state_class(self, state_class: Option<StateClass>) -> Self {
        SensorDescriptor {
            state_class,
            ..self
        }
    }
}
