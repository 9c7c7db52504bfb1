//! Dependency injection container for qcellsbridge.

use std::sync::Arc;

use super::config::Config;
use crate::integration::qcells::InverterIdentity;
use crate::integration::{homeassistant, qcells};
use crate::services::inverter_bridge::InverterBridgeService;
use crate::services::poller::Poller;

/// Container for application dependencies.
pub struct Container {
    config: Arc<Config>,
    qcells: Arc<qcells::Client>,
    homeassistant: Arc<homeassistant::Client>,
    poller: Arc<Poller>,
}

impl Container {
    /// Creates a new instance of the dependency injection container.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let qcells = Arc::new(qcells::Client::new(
            config.inverter_url.clone(),
            config.inverter_password.clone(),
            config.inverter_request_timeout.into(),
        ));

        let homeassistant = Arc::new(homeassistant::Client::new(
            config.homeassistant_url.clone(),
            config.homeassistant_token.clone(),
        ));

        let poller = Arc::new(Poller::new(
            Arc::clone(&qcells),
            config.inverter_poll_interval.into(),
            config.inverter_max_failed_polls,
        ));

        Self {
            config,
            qcells,
            homeassistant,
            poller,
        }
    }

    /// Returns a reference to the application config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a reference to the QCells inverter client.
    pub fn qcells_client(&self) -> Arc<qcells::Client> {
        Arc::clone(&self.qcells)
    }

    /// Returns a reference to the HomeAssistant client.
    pub fn homeassistant_client(&self) -> Arc<homeassistant::Client> {
        Arc::clone(&self.homeassistant)
    }

    /// Returns a reference to the inverter poller.
    pub fn poller(&self) -> Arc<Poller> {
        Arc::clone(&self.poller)
    }

    /// Builds the bridge for the inverter identified during setup.
    pub fn bridge_service(&self, identity: InverterIdentity) -> InverterBridgeService {
        InverterBridgeService::new(self.poller(), self.homeassistant_client(), identity)
    }
}
