//! Conversions from raw inverter registers to physical values.
use strum_macros::{Display, FromRepr};

use super::SensorValue;

const INT16_MAX: i64 = 0x7FFF;
const INT32_MAX: i64 = 0x7FFF_FFFF;

pub const UNKNOWN_INVERTER_MODE: &str = "unknown inverter mode";
pub const UNKNOWN_BATTERY_MODE: &str = "unknown battery mode";

pub fn div10(value: f64) -> f64 {
    value / 10.0
}

pub fn div100(value: f64) -> f64 {
    value / 100.0
}

/// Reinterpret an unsigned 16 bit register as two's complement.
pub fn to_signed16(value: i64) -> i64 {
    if value > INT16_MAX {
        value - (1 << 16)
    } else {
        value
    }
}

/// Reinterpret an unsigned 32 bit register as two's complement.
pub fn to_signed32(value: i64) -> i64 {
    if value > INT32_MAX {
        value - (1 << 32)
    } else {
        value
    }
}

pub fn twoway_div10(value: i64) -> f64 {
    div10(to_signed16(value) as f64)
}

pub fn twoway_div100(value: i64) -> f64 {
    div100(to_signed16(value) as f64)
}

/// Inverter operation mode as reported in register 19.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display, FromRepr)]
#[repr(u8)]
pub enum InverterMode {
    #[strum(serialize = "Waiting")]
    Waiting = 0,
    #[strum(serialize = "Checking")]
    Checking = 1,
    #[strum(serialize = "Normal")]
    Normal = 2,
    #[strum(serialize = "Off")]
    Off = 3,
    #[strum(serialize = "Permanent Fault")]
    PermanentFault = 4,
    #[strum(serialize = "Updating")]
    Updating = 5,
    #[strum(serialize = "EPS Check")]
    EpsCheck = 6,
    #[strum(serialize = "EPS Mode")]
    EpsMode = 7,
    #[strum(serialize = "Self Test")]
    SelfTest = 8,
    #[strum(serialize = "Idle")]
    Idle = 9,
    #[strum(serialize = "Standby")]
    Standby = 10,
}

/// Battery work mode as reported in register 168.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display, FromRepr)]
#[repr(u8)]
pub enum BatteryMode {
    #[strum(serialize = "Self Use Mode")]
    SelfUse = 0,
    #[strum(serialize = "Force Time Use")]
    ForceTimeUse = 1,
    #[strum(serialize = "Back Up Mode")]
    BackUp = 2,
    #[strum(serialize = "Feed-in Priority")]
    FeedInPriority = 3,
}

impl InverterMode {
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }
}

impl BatteryMode {
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }
}

/// Label for an inverter mode code. Unknown codes are not an error.
pub fn inverter_mode(code: i64) -> String {
    InverterMode::from_code(code)
        .map(|mode| mode.to_string())
        .unwrap_or_else(|| UNKNOWN_INVERTER_MODE.to_string())
}

/// Label for a battery mode code. Unknown codes are not an error.
pub fn battery_mode(code: i64) -> String {
    BatteryMode::from_code(code)
        .map(|mode| mode.to_string())
        .unwrap_or_else(|| UNKNOWN_BATTERY_MODE.to_string())
}

/// A named register conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    Div10,
    Div100,
    Signed16,
    Signed32,
    TwowayDiv10,
    TwowayDiv100,
    InverterModeLabel,
    BatteryModeLabel,
}

impl Conversion {
    pub fn apply(self, raw: i64) -> SensorValue {
        match self {
            Conversion::Identity => SensorValue::Number(raw as f64),
            Conversion::Div10 => SensorValue::Number(div10(raw as f64)),
            Conversion::Div100 => SensorValue::Number(div100(raw as f64)),
            Conversion::Signed16 => SensorValue::Number(to_signed16(raw) as f64),
            Conversion::Signed32 => SensorValue::Number(to_signed32(raw) as f64),
            Conversion::TwowayDiv10 => SensorValue::Number(twoway_div10(raw)),
            Conversion::TwowayDiv100 => SensorValue::Number(twoway_div100(raw)),
            Conversion::InverterModeLabel => SensorValue::Label(inverter_mode(raw)),
            Conversion::BatteryModeLabel => SensorValue::Label(battery_mode(raw)),
        }
    }
}
