//! Integration tests for the InverterBridgeService.
use crate::mockserver_homeassistant::HomeAssistantMockServer;
use crate::mockserver_qcells::{FIRMWARE_VERSION, QCellsMockServer, SERIAL_NUMBER};
use qcellsbridge::integration::homeassistant::Client as HomeAssistantClient;
use qcellsbridge::integration::qcells::{Client as QCellsClient, InverterIdentity, Payload};
use qcellsbridge::sensors::{
    Conversion, DESCRIPTORS, Device, DeviceClass, Registers, SensorDescriptor, Unit,
};
use qcellsbridge::services::inverter_bridge::{InverterBridgeService, PublishReport};
use qcellsbridge::services::poller::{Error, Poller};
use std::sync::Arc;
use tokio::time::{Duration, sleep, timeout};
use tokio_util::sync::CancellationToken;

mod mockserver_homeassistant;

#[rustfmt::skip]
static BROKEN_DESCRIPTORS: &[SensorDescriptor] = &[
    SensorDescriptor::new(Registers::Single(14), Some(Unit::Watt), DeviceClass::Power, "QCells PV1 Power", Device::Photovoltaik),
    SensorDescriptor::new(Registers::Combined(&[14, 15]), Some(Unit::Watt), DeviceClass::Power, "QCells Total PV power", Device::Photovoltaik)
        .with_conversions(&[Conversion::Div10]),
    SensorDescriptor::new(Registers::Single(400), Some(Unit::Watt), DeviceClass::Power, "QCells Missing Register", Device::Inverter),
];

async fn mock_setup(
    max_failed_polls: u32,
) -> (QCellsMockServer, HomeAssistantMockServer, InverterBridgeService) {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
    let qcells_mockserver = QCellsMockServer::start().await;
    let homeassistant_mockserver = HomeAssistantMockServer::start().await;

    let qcells_client = Arc::new(QCellsClient::new(
        qcells_mockserver.url(),
        qcells_mockserver.password(),
        Duration::from_secs(2),
    ));
    let homeassistant_client = Arc::new(HomeAssistantClient::new(
        homeassistant_mockserver.url(),
        homeassistant_mockserver.token(),
    ));
    let poller = Arc::new(Poller::new(
        qcells_client,
        Duration::from_millis(10),
        max_failed_polls,
    ));

    let service = InverterBridgeService::new(
        poller,
        homeassistant_client,
        InverterIdentity {
            serial_number: SERIAL_NUMBER.into(),
            firmware_version: FIRMWARE_VERSION.into(),
        },
    );

    (qcells_mockserver, homeassistant_mockserver, service)
}

fn payload() -> Payload {
    serde_json::from_value(QCellsMockServer::payload()).expect("invalid sample payload")
}

#[tokio::test]
async fn test_publish_payload() {
    let (_qcells_mockserver, homeassistant_mockserver, service) = mock_setup(10).await;
    let mock = homeassistant_mockserver.mock_set_any_state().await;

    let report = service.publish_payload(&payload()).await;

    assert_eq!(
        report,
        PublishReport {
            published: DESCRIPTORS.len(),
            decode_failures: 0,
            publish_failures: 0,
        }
    );
    assert_eq!(mock.hits_async().await, DESCRIPTORS.len());
}

#[tokio::test]
async fn test_publish_payload_skips_undecodable_sensors() {
    let (_qcells_mockserver, homeassistant_mockserver, service) = mock_setup(10).await;
    let service = service.with_descriptors(BROKEN_DESCRIPTORS);
    let mock = homeassistant_mockserver.mock_set_any_state().await;

    let report = service.publish_payload(&payload()).await;

    assert_eq!(
        report,
        PublishReport {
            published: 1,
            decode_failures: 2,
            publish_failures: 0,
        }
    );
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_publish_payload_counts_publish_failures() {
    let (_qcells_mockserver, homeassistant_mockserver, service) = mock_setup(10).await;
    homeassistant_mockserver.mock_error_set_state().await;

    let report = service.publish_payload(&payload()).await;

    assert_eq!(report.published, 0);
    assert_eq!(report.decode_failures, 0);
    assert_eq!(report.publish_failures, DESCRIPTORS.len());
}

#[tokio::test]
async fn test_run_until_cancelled() {
    let (qcells_mockserver, homeassistant_mockserver, service) = mock_setup(10).await;
    let qcells_mock = qcells_mockserver.mock_read_real_time_data_ok().await;
    let homeassistant_mock = homeassistant_mockserver.mock_set_any_state().await;
    let token = CancellationToken::new();

    let run = service.run(token.clone());
    let cancel = async {
        sleep(Duration::from_millis(200)).await;
        token.cancel();
    };
    let (result, ()) = timeout(Duration::from_secs(5), async { tokio::join!(run, cancel) })
        .await
        .expect("Service did not stop in time");

    assert!(result.is_ok());
    assert!(qcells_mock.hits_async().await >= 1);
    assert!(homeassistant_mock.hits_async().await >= DESCRIPTORS.len());
}

#[tokio::test]
async fn test_run_stops_when_reauthentication_is_required() {
    let (qcells_mockserver, homeassistant_mockserver, service) = mock_setup(2).await;
    qcells_mockserver.mock_read_real_time_data_server_error().await;
    let homeassistant_mock = homeassistant_mockserver.mock_set_any_state().await;

    let result = timeout(
        Duration::from_secs(5),
        service.run(CancellationToken::new()),
    )
    .await
    .expect("Service did not stop in time");

    assert!(matches!(
        result,
        Err(Error::ReauthenticationRequired { failed_polls: 2 })
    ));
    // Marked unavailable once, on the first failed poll
    assert_eq!(homeassistant_mock.hits_async().await, DESCRIPTORS.len());
}

#[tokio::test]
async fn test_publish_unavailable() {
    let (_qcells_mockserver, homeassistant_mockserver, service) = mock_setup(10).await;
    let mock = homeassistant_mockserver.mock_set_any_state().await;

    let report = service.publish_unavailable().await;

    assert_eq!(
        report,
        PublishReport {
            published: DESCRIPTORS.len(),
            decode_failures: 0,
            publish_failures: 0,
        }
    );
    assert_eq!(mock.hits_async().await, DESCRIPTORS.len());
}
