//! Inverter Bridge Background Service.
//! Decodes every sensor of each fresh inverter payload and publishes it to Home Assistant.

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::poller::{self, PollEvent, Poller};
use crate::integration::homeassistant;
use crate::integration::qcells::{InverterIdentity, Payload};
use crate::sensors::{self, DESCRIPTORS, SensorDescriptor};

/// Outcome of publishing one payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub published: usize,
    pub decode_failures: usize,
    pub publish_failures: usize,
}

pub struct InverterBridgeService {
    poller: Arc<Poller>,
    homeassistant: Arc<homeassistant::Client>,
    identity: InverterIdentity,
    descriptors: &'static [SensorDescriptor],
}

impl InverterBridgeService {
    /// Creates a new instance publishing the full QCells register map.
    pub fn new(
        poller: Arc<Poller>,
        homeassistant: Arc<homeassistant::Client>,
        identity: InverterIdentity,
    ) -> Self {
        InverterBridgeService {
            poller,
            homeassistant,
            identity,
            descriptors: DESCRIPTORS,
        }
    }

    /// Replace the published sensors.
    pub fn with_descriptors(self, descriptors: &'static [SensorDescriptor]) -> Self {
        InverterBridgeService {
            descriptors,
            ..self
        }
    }

    /// Run until `shutdown` is cancelled.
    /// Fails only when the poller requires reauthentication.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), poller::Error> {
        self.poller
            .run(shutdown, |event| async move {
                let report = match event {
                    PollEvent::Updated(payload) => self.publish_payload(&payload).await,
                    PollEvent::Degraded => self.publish_unavailable().await,
                };
                log::debug!("Published: {report:?}");
            })
            .await
    }

    /// Decode every sensor from `payload` and publish it.
    /// Failing sensors are logged and skipped; the others are still published.
    pub async fn publish_payload(&self, payload: &Payload) -> PublishReport {
        let last_reset = Self::day_midnight(&Local::now().date_naive());
        let mut report = PublishReport::default();

        for descriptor in self.descriptors {
            let reading = match sensors::read(descriptor, &self.identity, payload) {
                Ok(reading) => reading,
                Err(e) => {
                    log::error!("Cannot decode sensor '{}': {e}", descriptor.name);
                    report.decode_failures += 1;
                    continue;
                }
            };
            match self
                .homeassistant
                .set_sensor_state(&reading, &self.identity, &last_reset)
                .await
            {
                Ok(()) => report.published += 1,
                Err(e) => {
                    log::error!("Failed to update {} in Home Assistant: {e}", reading.entity_id);
                    report.publish_failures += 1;
                }
            }
        }
        report
    }

    /// Mark every sensor unavailable while the inverter does not answer.
    pub async fn publish_unavailable(&self) -> PublishReport {
        log::warn!("Inverter unreachable, marking {} sensors unavailable", self.descriptors.len());
        let mut report = PublishReport::default();
        for descriptor in self.descriptors {
            match self
                .homeassistant
                .set_sensor_unavailable(descriptor, &self.identity)
                .await
            {
                Ok(()) => report.published += 1,
                Err(e) => {
                    log::error!("Failed to mark '{}' unavailable: {e}", descriptor.name);
                    report.publish_failures += 1;
                }
            }
        }
        report
    }

    /// Local midnight of `day`, the reset point of the daily totals.
    pub fn day_midnight(day: &NaiveDate) -> DateTime<Local> {
        // midnight can fall into a DST gap
        day.and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .unwrap_or_else(Local::now)
    }
}
