//! QCells API Schemas
//! Data structures returned by the inverter's `ReadRealTimeData` operation.
use serde::{Deserialize, Serialize};

/// One snapshot of the inverter's register array plus its identity.
/// Registers are addressed by position, not by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "Data")]
    pub data: Vec<i64>,
    pub sn: String,
    pub ver: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub inverter_type: Option<i64>,
}

impl Payload {
    /// Raw register value at `position`, if present.
    pub fn register(&self, position: usize) -> Option<i64> {
        self.data.get(position).copied()
    }
}

/// Identity of an inverter, discovered from its first answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverterIdentity {
    pub serial_number: String,
    pub firmware_version: String,
}

impl From<&Payload> for InverterIdentity {
    fn from(payload: &Payload) -> Self {
        InverterIdentity {
            serial_number: payload.sn.clone(),
            firmware_version: payload.ver.clone(),
        }
    }
}
