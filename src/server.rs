//! Server
use crate::core::config::{APP_NAME, APP_VERSION, Config};
use crate::core::container::Container;
use crate::integration::qcells::InverterIdentity;
use crate::services::poller;
use reqwest::Url;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Cannot authenticate against the inverter at {0}")]
    AuthenticationFailed(Url),
    #[error(transparent)]
    ReauthenticationRequired(#[from] poller::Error),
}

/// Run the server with the given configuration and shutdown token.
/// The inverter credentials are checked once before polling starts.
pub async fn server(config: Config, shutdown_token: CancellationToken) -> Result<(), ServerError> {
    let container = Container::new(config);
    log::info!("{APP_NAME} v{APP_VERSION} started");

    let qcells = container.qcells_client();
    let identity = match qcells.check_authentication().await {
        auth if auth.authenticated => auth.result.as_ref().map(InverterIdentity::from),
        _ => None,
    };
    let Some(identity) = identity else {
        return Err(ServerError::AuthenticationFailed(qcells.url().clone()));
    };
    log::info!(
        "Connected to QCells inverter {} (firmware {})",
        identity.serial_number,
        identity.firmware_version
    );

    container.bridge_service(identity).run(shutdown_token).await?;
    Ok(())
}
