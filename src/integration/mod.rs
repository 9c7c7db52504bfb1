pub mod homeassistant;
pub mod qcells;
