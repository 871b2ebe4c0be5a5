pub mod actions;
pub mod config;
pub mod types;

pub use actions::*;
pub use config::{BridgeConfig, DeviceConfig, TargetRange};
pub use types::{Attribute, BridgeStatus, DisplayUnits, ThermostatMode};
