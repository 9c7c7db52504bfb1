pub mod config;
pub mod container;
