//! Home Assistant Integration Module
//! Inverter sensors are pushed as entity states through the REST API.
mod client;
mod error;
mod http_client;
mod schemas;

pub use client::Client;
pub use error::{Error, Result};
