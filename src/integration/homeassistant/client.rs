//! Home Assistant Client.
//! This client publishes decoded inverter sensors as Home Assistant states.

use super::Result;
use super::http_client::HttpClient;
use super::schemas::StateCreateOrUpdate;
use crate::integration::qcells::InverterIdentity;
use crate::sensors::{self, SensorDescriptor, SensorReading, StateClass};
use chrono::{DateTime, TimeZone};
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt::Display;

static MANUFACTURER: &str = "QCells";
static UNAVAILABLE: &str = "unavailable";

pub struct Client {
    http: HttpClient,
}

impl Client {
    /// Creates a new instance of `Client`.
    pub fn new(url: Url, token: String) -> Self {
        let http = HttpClient::new(url, token);
        Client { http }
    }

    /// Publish one sensor reading.
    /// `last_reset` is only sent for resettable totals.
    pub async fn set_sensor_state<Tz: TimeZone>(
        &self,
        reading: &SensorReading,
        identity: &InverterIdentity,
        last_reset: &DateTime<Tz>,
    ) -> Result<()>
    where
        Tz::Offset: Display,
    {
        let state = Self::create_sensor_state(reading, identity, last_reset);
        self.http.post_state(&reading.entity_id, &state).await
    }

    /// Mark the sensor of `descriptor` as unavailable.
    pub async fn set_sensor_unavailable(
        &self,
        descriptor: &SensorDescriptor,
        identity: &InverterIdentity,
    ) -> Result<()> {
        let entity_id = sensors::entity_id(descriptor, &identity.serial_number);
        let unique_id = sensors::unique_id(descriptor, &identity.serial_number);
        let state = StateCreateOrUpdate {
            state: UNAVAILABLE.to_string(),
            attributes: Some(Self::attributes(descriptor, &unique_id, identity)),
        };
        self.http.post_state(&entity_id, &state).await
    }

    fn attributes(
        descriptor: &SensorDescriptor,
        unique_id: &str,
        identity: &InverterIdentity,
    ) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::from([
            ("friendly_name".to_string(), descriptor.name.to_string()),
            ("unique_id".to_string(), unique_id.to_string()),
            ("device_class".to_string(), descriptor.device_class.to_string()),
            ("device".to_string(), format!("{MANUFACTURER} {}", descriptor.device)),
            ("serial_number".to_string(), identity.serial_number.clone()),
            ("sw_version".to_string(), identity.firmware_version.clone()),
        ]);
        if let Some(unit) = descriptor.unit {
            attributes.insert("unit_of_measurement".to_string(), unit.to_string());
        }
        attributes
    }

    fn create_sensor_state<Tz: TimeZone>(
        reading: &SensorReading,
        identity: &InverterIdentity,
        last_reset: &DateTime<Tz>,
    ) -> StateCreateOrUpdate
    where
        Tz::Offset: Display,
    {
        let descriptor = &reading.descriptor;
        let mut attributes = Self::attributes(descriptor, &reading.unique_id, identity);
        if let Some(state_class) = descriptor.state_class {
            attributes.insert("state_class".to_string(), state_class.to_string());
            if state_class == StateClass::Total {
                attributes.insert("last_reset".to_string(), last_reset.to_rfc3339());
            }
        }
        StateCreateOrUpdate {
            state: reading.value.to_string(),
            attributes: Some(attributes),
        }
    }
}
