use thermostat_common::Attribute;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection failure or non-2xx status from the device endpoint.
    #[error("device transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("target temperature {value} outside {min}..={max}")]
    TargetOutOfRange { value: f64, min: f64, max: f64 },

    #[error("{} is read-only", attribute.as_str())]
    UnsupportedWrite { attribute: Attribute },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
