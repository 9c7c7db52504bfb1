//! qcellsbridge - Sync QCells hybrid inverter data to Home Assistant.
pub mod core;
pub mod integration;
pub mod sensors;
pub mod server;
pub mod services;
