//! QCells Inverter Integration Module
//! The integration is done via the inverter's local HTTP JSON API.
mod client;
mod error;
mod http_client;
mod schemas;

pub use client::{Authentication, Client};
pub use error::{Error, Result};
pub use schemas::{InverterIdentity, Payload};
