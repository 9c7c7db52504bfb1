//! QCells Client.
//! This client is the higher level API client for the QCells inverter.
use super::http_client::HttpClient;
use super::schemas::Payload;
use super::Result;
use reqwest::Url;
use std::time::Duration;

pub struct Client {
    http: HttpClient,
}

/// Outcome of a credential check against the inverter.
#[derive(Debug, Clone, PartialEq)]
pub struct Authentication {
    pub authenticated: bool,
    pub result: Option<Payload>,
}

impl Client {
    /// Creates a new instance of `Client`.
    pub fn new(url: Url, password: String, timeout: Duration) -> Self {
        let http = HttpClient::new(url, password, timeout);
        Client { http }
    }

    /// Address of the inverter.
    pub fn url(&self) -> &Url {
        self.http.url()
    }

    /// Fetch the current register snapshot from the inverter.
    pub async fn fetch(&self) -> Result<Payload> {
        let text = self.http.read_real_time_data().await?;
        Self::parse_payload(&text)
    }

    /// Check that the inverter answers with the configured password.
    /// Never fails: any error means "not authenticated".
    pub async fn check_authentication(&self) -> Authentication {
        match self.fetch().await {
            Ok(payload) => Authentication {
                authenticated: true,
                result: Some(payload),
            },
            Err(e) => {
                log::debug!("Authentication check against {} failed: {e}", self.url());
                Authentication {
                    authenticated: false,
                    result: None,
                }
            }
        }
    }

    fn parse_payload(text: &str) -> Result<Payload> {
        Ok(serde_json::from_str::<Payload>(text)?)
    }
}
