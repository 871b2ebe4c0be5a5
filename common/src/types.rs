use serde::{Deserialize, Serialize};

use crate::actions::{
    ACTION_GET_CURRENT_HUMIDITY, ACTION_GET_CURRENT_TEMPERATURE, ACTION_GET_REQUIRED_TEMPERATURE,
    ACTION_SET_REQUIRED_TEMPERATURE,
};
use crate::config::TargetRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    CurrentTemperature,
    TargetTemperature,
    CurrentHumidity,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [
        Self::CurrentTemperature,
        Self::TargetTemperature,
        Self::CurrentHumidity,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::CurrentTemperature => 0,
            Self::TargetTemperature => 1,
            Self::CurrentHumidity => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentTemperature => "currentTemperature",
            Self::TargetTemperature => "targetTemperature",
            Self::CurrentHumidity => "currentHumidity",
        }
    }

    pub fn read_action(self) -> &'static str {
        match self {
            Self::CurrentTemperature => ACTION_GET_CURRENT_TEMPERATURE,
            Self::TargetTemperature => ACTION_GET_REQUIRED_TEMPERATURE,
            Self::CurrentHumidity => ACTION_GET_CURRENT_HUMIDITY,
        }
    }

    /// Only the target temperature can be written back to the device.
    pub fn write_action(self) -> Option<&'static str> {
        match self {
            Self::TargetTemperature => Some(ACTION_SET_REQUIRED_TEMPERATURE),
            Self::CurrentTemperature | Self::CurrentHumidity => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThermostatMode {
    Off,
    Heat,
}

impl ThermostatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
        }
    }

    /// There is no cooling action on the device, so the derived mode is
    /// either heating toward the target or off.
    pub fn derive(target: f64, current: f64) -> Self {
        if target > current {
            Self::Heat
        } else {
            Self::Off
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayUnits {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnits {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "CELSIUS",
            Self::Fahrenheit => "FAHRENHEIT",
        }
    }

    /// Accessory protocol code: 0 for Celsius, 1 for Fahrenheit.
    pub fn code(self) -> u8 {
        match self {
            Self::Celsius => 0,
            Self::Fahrenheit => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Celsius),
            1 => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "CELSIUS" | "C" | "0" => Some(Self::Celsius),
            "FAHRENHEIT" | "F" | "1" => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeStatus {
    pub name: String,
    #[serde(rename = "currentTemp")]
    pub current_temp: f64,
    #[serde(rename = "targetTemp")]
    pub target_temp: f64,
    #[serde(rename = "currentHumidity")]
    pub current_humidity: f64,
    pub mode: &'static str,
    #[serde(rename = "displayUnits")]
    pub display_units: &'static str,
    /// Bounds and step the consumer may pick a target from.
    #[serde(rename = "targetRange")]
    pub target_range: TargetRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn heats_only_when_target_exceeds_current() {
        assert_eq!(ThermostatMode::derive(22.0, 20.0), ThermostatMode::Heat);
        assert_eq!(ThermostatMode::derive(20.0, 22.0), ThermostatMode::Off);
        assert_eq!(ThermostatMode::derive(21.0, 21.0), ThermostatMode::Off);
    }

    #[test]
    fn only_target_temperature_is_writable() {
        assert_eq!(
            Attribute::TargetTemperature.write_action(),
            Some(ACTION_SET_REQUIRED_TEMPERATURE)
        );
        assert_eq!(Attribute::CurrentTemperature.write_action(), None);
        assert_eq!(Attribute::CurrentHumidity.write_action(), None);
    }

    #[test]
    fn attribute_indices_are_dense() {
        let indices: Vec<usize> = Attribute::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn display_units_round_trip_protocol_codes() {
        assert_eq!(
            DisplayUnits::from_code(DisplayUnits::Fahrenheit.code()),
            Some(DisplayUnits::Fahrenheit)
        );
        assert_eq!(DisplayUnits::from_code(7), None);
        assert_eq!(DisplayUnits::parse("fahrenheit"), Some(DisplayUnits::Fahrenheit));
        assert_eq!(DisplayUnits::parse("c"), Some(DisplayUnits::Celsius));
        assert_eq!(DisplayUnits::parse("kelvin"), None);
    }
}
