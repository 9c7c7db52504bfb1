//! qcellsbridge - Sync QCells hybrid inverter data to Home Assistant
//! The application is small enough to run on a single worker thread,
//! making it suitable for low-resource environments.
use anyhow::Context;
use envconfig::Envconfig;
use qcellsbridge::core::config::{Config, configure_logger};
use qcellsbridge::server::server;
use tokio::signal;
use tokio_util::sync::CancellationToken;

enum ExitCode {
    Success = 0,
    RuntimeError = 1,
    ConfigError = 2,
    AuthError = 3,
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::init_from_env().context("cannot read environment")?;
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() {
    dotenvy::dotenv().ok();
    configure_logger();

    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Failed to load configuration: {e:#}");
            std::process::exit(ExitCode::ConfigError as i32);
        }
    };

    let shutdown_token = CancellationToken::new();
    let server_shutdown_token = shutdown_token.clone();

    let mut app = tokio::spawn(async move { server(config, server_shutdown_token).await });

    // Wait for Ctrl+C, SIGTERM or the server giving up on its own
    let finished = tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("Received Ctrl+C, initiating graceful shutdown...");
            None
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to create terminate signal");
                sigterm.recv().await;
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            log::info!("Received SIGTERM, initiating graceful shutdown...");
            None
        }
        result = &mut app => Some(result),
    };

    let result = match finished {
        Some(result) => result,
        None => {
            shutdown_token.cancel();
            app.await
        }
    };

    match result {
        Ok(Ok(())) => {
            log::info!("Graceful shutdown completed");
            std::process::exit(ExitCode::Success as i32);
        }
        // both variants need new credentials
        Ok(Err(e)) => {
            log::error!("{e}");
            std::process::exit(ExitCode::AuthError as i32);
        }
        Err(e) => {
            log::error!("Application crashed: {e}");
            std::process::exit(ExitCode::RuntimeError as i32);
        }
    }
}
