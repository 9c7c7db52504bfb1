pub mod inverter_bridge;
pub mod poller;
