//! QCells HTTP client.
//! This is the lower level client for the inverter's local API.
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use super::{Error, Result};

static READ_REAL_TIME_DATA: &str = "ReadRealTimeData";

pub struct HttpClient {
    client: Client,
    password: String,
    url: Url,
}

impl HttpClient {
    /// Creates a new instance of `HttpClient`.
    pub fn new(url: Url, password: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        HttpClient {
            client,
            password,
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request the real time data and return the raw response body.
    /// Anything but `200 OK` is an error, as is a timeout.
    pub async fn read_real_time_data(&self) -> Result<String> {
        log::debug!("Sending {READ_REAL_TIME_DATA} request to {}", self.url);
        let params = [("optType", READ_REAL_TIME_DATA), ("pwd", self.password.as_str())];
        let response = self
            .client
            .post(self.url.clone())
            .form(&params)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            log::debug!("{READ_REAL_TIME_DATA} rejected with status {status}");
            return Err(Error::UnexpectedStatus(status));
        }
        let text = response.text().await?;
        log::debug!("{READ_REAL_TIME_DATA} result: {text}");
        Ok(text)
    }
}
