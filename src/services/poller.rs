//! Inverter Poller.
//! Polls the inverter on a fixed interval, keeps the last good payload and
//! escalates to a reauthentication request after too many failed polls.

use std::future::Future;
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::integration::qcells::{self, Payload};

pub const DEFAULT_MAX_FAILED_POLLS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PollerState {
    Polling,
    Degrading,
    /// Terminal. A new poller with new credentials is needed.
    AuthFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Polling failed after {successful_polls} successful polls: {source}")]
    UpdateFailed {
        successful_polls: u32,
        #[source]
        source: qcells::Error,
    },
    #[error("Reauthentication required after {failed_polls} failed polls")]
    ReauthenticationRequired { failed_polls: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a tick of [`Poller::run`] reports.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Updated(Arc<Payload>),
    /// First failed poll in a row. The last payload is stale from now on.
    Degraded,
}

/// Snapshot of the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerStatus {
    pub state: PollerState,
    pub failed_polls: u32,
    pub successful_polls: u32,
    pub last_payload: Option<Arc<Payload>>,
}

impl Default for PollerStatus {
    fn default() -> Self {
        PollerStatus {
            state: PollerState::Polling,
            failed_polls: 0,
            successful_polls: 0,
            last_payload: None,
        }
    }
}

impl PollerStatus {
    fn record_success(&mut self, payload: Arc<Payload>) {
        self.state = PollerState::Polling;
        self.failed_polls = 0;
        self.successful_polls += 1;
        self.last_payload = Some(payload);
    }

    /// Returns the number of successful polls preceding this failure.
    /// The last payload is kept.
    fn record_failure(&mut self, max_failed_polls: u32) -> u32 {
        self.failed_polls += 1;
        self.state = if self.failed_polls >= max_failed_polls {
            PollerState::AuthFailed
        } else {
            PollerState::Degrading
        };
        std::mem::take(&mut self.successful_polls)
    }
}

pub struct Poller {
    client: Arc<qcells::Client>,
    interval: Duration,
    max_failed_polls: u32,
    status: RwLock<PollerStatus>,
    in_flight: Mutex<()>,
}

impl Poller {
    /// Creates a new instance of `Poller`.
    /// `interval` must not be zero. `max_failed_polls` is at least 1.
    pub fn new(client: Arc<qcells::Client>, interval: Duration, max_failed_polls: u32) -> Self {
        Poller {
            client,
            interval,
            max_failed_polls: max_failed_polls.max(1),
            status: RwLock::new(PollerStatus::default()),
            in_flight: Mutex::new(()),
        }
    }

    pub fn name(&self) -> String {
        format!("QCellsInverterPoller [{}]", self.client.url())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn status(&self) -> PollerStatus {
        self.status.read().await.clone()
    }

    /// Last successfully fetched payload, possibly stale.
    pub async fn latest(&self) -> Option<Arc<Payload>> {
        self.status.read().await.last_payload.clone()
    }

    /// Fetch once and update the state machine.
    /// Concurrent calls are serialised, so there is at most one request in flight.
    pub async fn poll(&self) -> Result<Arc<Payload>> {
        let _in_flight = self.in_flight.lock().await;
        {
            let status = self.status.read().await;
            if status.state == PollerState::AuthFailed {
                return Err(Error::ReauthenticationRequired {
                    failed_polls: status.failed_polls,
                });
            }
        }

        match self.client.fetch().await {
            Ok(payload) => {
                let payload = Arc::new(payload);
                let mut status = self.status.write().await;
                status.record_success(Arc::clone(&payload));
                log::debug!(
                    "{}: poll succeeded ({} in a row)",
                    self.name(),
                    status.successful_polls
                );
                Ok(payload)
            }
            Err(source) => {
                let mut status = self.status.write().await;
                let successful_polls = status.record_failure(self.max_failed_polls);
                if status.state == PollerState::AuthFailed {
                    log::error!(
                        "{}: {} consecutive failed polls, last error: {source}",
                        self.name(),
                        status.failed_polls
                    );
                    return Err(Error::ReauthenticationRequired {
                        failed_polls: status.failed_polls,
                    });
                }
                log::warn!(
                    "{}: polling failed after {successful_polls} successful polls ({}/{} failures): {source}",
                    self.name(),
                    status.failed_polls,
                    self.max_failed_polls
                );
                Err(Error::UpdateFailed {
                    successful_polls,
                    source,
                })
            }
        }
    }

    /// Poll on every tick until `shutdown` is cancelled or reauthentication is required.
    /// `on_event` is awaited before the next tick, so ticks never overlap.
    /// `Degraded` is sent once per run of failures.
    pub async fn run<F, Fut>(&self, shutdown: CancellationToken, mut on_event: F) -> Result<()>
    where
        F: FnMut(PollEvent) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!("{} started (every {:?})", self.name(), self.interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("{} stopped", self.name());
                    return Ok(());
                }
                _ = interval.tick() => {}
            }
            match self.poll().await {
                Ok(payload) => on_event(PollEvent::Updated(payload)).await,
                Err(Error::UpdateFailed { .. }) => {
                    if self.status.read().await.failed_polls == 1 {
                        on_event(PollEvent::Degraded).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
