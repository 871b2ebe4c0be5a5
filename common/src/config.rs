use serde::{Deserialize, Serialize};

use crate::types::DisplayUnits;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for TargetRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 30.0,
            step: 0.1,
        }
    }
}

impl TargetRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }

    pub fn sanitize(&mut self) {
        let fallback = Self::default();
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            self.min = fallback.min;
            self.max = fallback.max;
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            self.step = fallback.step;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub name: String,
    pub device_address: String,
    pub listen_port: u16,
    #[serde(default)]
    pub target: TargetRange,
    #[serde(default)]
    pub display_units: DisplayUnits,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "Thermostat".to_string(),
            device_address: "127.0.0.1:6969".to_string(),
            listen_port: 8080,
            target: TargetRange::default(),
            display_units: DisplayUnits::Celsius,
        }
    }
}

impl BridgeConfig {
    pub fn sanitize(&mut self) {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            self.name = "Thermostat".to_string();
        }
        self.device_address = self.device_address.trim().to_string();
        self.target.sanitize();
    }

    /// Base URL of the device endpoint. Bare addresses get an `http://` scheme.
    pub fn device_url(&self) -> String {
        let address = self.device_address.trim();
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub listen_port: u16,
    pub initial_target: f64,
    pub initial_temperature: f64,
    pub initial_humidity: f64,
    pub max_temperature_offset: f64,
    pub sample_interval_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            listen_port: 6969,
            initial_target: 20.0,
            initial_temperature: 19.0,
            initial_humidity: 45.0,
            max_temperature_offset: 5.0,
            sample_interval_secs: 30,
        }
    }
}

impl DeviceConfig {
    pub fn sanitize(&mut self) {
        let fallback = Self::default();
        if !self.initial_target.is_finite() {
            self.initial_target = fallback.initial_target;
        }
        if !self.initial_temperature.is_finite() {
            self.initial_temperature = fallback.initial_temperature;
        }
        self.initial_humidity = if self.initial_humidity.is_finite() {
            self.initial_humidity.clamp(0.0, 100.0)
        } else {
            fallback.initial_humidity
        };
        if !self.max_temperature_offset.is_finite() || self.max_temperature_offset < 0.0 {
            self.max_temperature_offset = fallback.max_temperature_offset;
        }
        self.sample_interval_secs = self.sample_interval_secs.clamp(1, 3_600);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_address_gets_http_scheme() {
        let config = BridgeConfig {
            device_address: "192.168.1.40".to_string(),
            ..BridgeConfig::default()
        };
        assert_eq!(config.device_url(), "http://192.168.1.40");

        let config = BridgeConfig {
            device_address: " https://thermo.local/actions ".to_string(),
            ..BridgeConfig::default()
        };
        assert_eq!(config.device_url(), "https://thermo.local/actions");
    }

    #[test]
    fn target_range_is_inclusive() {
        let range = TargetRange::default();
        assert!(range.contains(0.0));
        assert!(range.contains(30.0));
        assert!(!range.contains(30.1));
        assert!(!range.contains(-0.5));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn sanitize_restores_inverted_range_and_blank_name() {
        let mut config = BridgeConfig {
            name: "   ".to_string(),
            target: TargetRange {
                min: 40.0,
                max: 10.0,
                step: 0.0,
            },
            ..BridgeConfig::default()
        };
        config.sanitize();

        assert_eq!(config.name, "Thermostat");
        assert_eq!(config.target, TargetRange::default());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{"name":"Hall","device_address":"10.0.0.5","listen_port":9000}"#,
        )
        .unwrap();

        assert_eq!(config.target, TargetRange::default());
        assert_eq!(config.display_units, DisplayUnits::Celsius);
    }

    #[test]
    fn device_sanitize_clamps_humidity_and_interval() {
        let mut config = DeviceConfig {
            initial_humidity: 140.0,
            sample_interval_secs: 0,
            max_temperature_offset: -1.0,
            ..DeviceConfig::default()
        };
        config.sanitize();

        assert_eq!(config.initial_humidity, 100.0);
        assert_eq!(config.sample_interval_secs, 1);
        assert_eq!(config.max_temperature_offset, 5.0);
    }
}
