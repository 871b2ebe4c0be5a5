use serde_json::Value;
use thermostat_common::{
    ActionEntry, ActionRequest, ActionResponse, ACTION_GET_CURRENT_HUMIDITY,
    ACTION_GET_CURRENT_TEMPERATURE, ACTION_GET_LAST_UPDATE, ACTION_GET_REQUIRED_TEMPERATURE,
    ACTION_GET_TEMPERATURE_OFFSET, ACTION_GET_THERMOSTAT_STATE, ACTION_SET_REQUIRED_TEMPERATURE,
    ACTION_SET_TEMPERATURE_OFFSET, STATUS_ERROR, STATUS_SUCCESS,
};

use crate::state::DeviceState;

const WRONG_VALUE_TYPE: &str = "wrong value type";

/// Runs every action in order. A failing action marks the response as an
/// error but does not stop the ones after it.
pub fn perform(state: &mut DeviceState, request: &ActionRequest) -> ActionResponse {
    let mut response = ActionResponse {
        status: Some(STATUS_SUCCESS.to_string()),
        ..ActionResponse::default()
    };

    for entry in &request.actions {
        match entry {
            ActionEntry::Get(action) => apply(state, &mut response, action, None),
            ActionEntry::Set(values) => {
                for (action, value) in values {
                    apply(state, &mut response, action, Some(value));
                }
            }
        }
    }

    response
}

fn apply(
    state: &mut DeviceState,
    response: &mut ActionResponse,
    action: &str,
    value: Option<&Value>,
) {
    let result = match action {
        ACTION_GET_CURRENT_TEMPERATURE => Ok(Value::from(state.current_temperature())),
        ACTION_GET_REQUIRED_TEMPERATURE => Ok(Value::from(state.required_temperature())),
        ACTION_GET_CURRENT_HUMIDITY => Ok(Value::from(state.current_humidity())),
        ACTION_GET_THERMOSTAT_STATE => Ok(Value::from(state.is_heating())),
        ACTION_GET_TEMPERATURE_OFFSET => Ok(Value::from(state.temperature_offset())),
        ACTION_GET_LAST_UPDATE => Ok(Value::from(state.last_update())),
        ACTION_SET_REQUIRED_TEMPERATURE => coerce_number(value).map(|temperature| {
            state.set_required_temperature(temperature);
            Value::from(STATUS_SUCCESS)
        }),
        ACTION_SET_TEMPERATURE_OFFSET => coerce_number(value).and_then(|offset| {
            if state.set_temperature_offset(offset) {
                Ok(Value::from(STATUS_SUCCESS))
            } else {
                Err(format!(
                    "offset above maximum {}",
                    state.max_temperature_offset()
                ))
            }
        }),
        unknown => Err(format!("unknown action: {unknown}")),
    };

    match result {
        Ok(value) => {
            response.data.insert(action.to_string(), value);
        }
        Err(message) => {
            response
                .data
                .insert(action.to_string(), Value::from(STATUS_ERROR));
            response.status = Some(STATUS_ERROR.to_string());
            response.error = Some(message);
        }
    }
}

/// Setters accept numbers, and strings that parse as numbers.
fn coerce_number(value: Option<&Value>) -> Result<f64, String> {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|number| number.is_finite())
        .ok_or_else(|| WRONG_VALUE_TYPE.to_string())
}
