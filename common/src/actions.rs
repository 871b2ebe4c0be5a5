use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ACTION_GET_CURRENT_TEMPERATURE: &str = "getCurrentTemperature";
pub const ACTION_GET_REQUIRED_TEMPERATURE: &str = "getRequiredTemperature";
pub const ACTION_GET_CURRENT_HUMIDITY: &str = "getCurrentHumidity";
pub const ACTION_SET_REQUIRED_TEMPERATURE: &str = "setRequiredTemperature";

pub const ACTION_GET_THERMOSTAT_STATE: &str = "getThermostatState";
pub const ACTION_GET_TEMPERATURE_OFFSET: &str = "getTemperatureOffset";
pub const ACTION_GET_LAST_UPDATE: &str = "getLastUpdate";
pub const ACTION_SET_TEMPERATURE_OFFSET: &str = "setTemperatureOffset";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// One entry of the `actions` array: a bare action name for reads, or a
/// single-key object pairing the action name with its value for writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionEntry {
    Get(String),
    Set(BTreeMap<String, Value>),
}

impl ActionEntry {
    pub fn get(action: &str) -> Self {
        Self::Get(action.to_string())
    }

    pub fn set(action: &str, value: impl Into<Value>) -> Self {
        Self::Set(BTreeMap::from([(action.to_string(), value.into())]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub actions: Vec<ActionEntry>,
}

impl ActionRequest {
    pub fn fetch(action: &str) -> Self {
        Self {
            actions: vec![ActionEntry::get(action)],
        }
    }

    pub fn push(action: &str, value: f64) -> Self {
        Self {
            actions: vec![ActionEntry::set(action, value)],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Numeric value reported under `action`, if the device sent one.
    pub fn number(&self, action: &str) -> Option<f64> {
        self.data.get(action).and_then(Value::as_f64)
    }
}

/// Pulls `data.<action>` out of a raw response body. Anything that is not a
/// JSON object carrying a number under that key reads as "nothing new".
/// Other top-level fields are ignored whatever their shape.
pub fn extract_number(body: &[u8], action: &str) -> Option<f64> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|response| response.get("data")?.get(action)?.as_f64())
}
