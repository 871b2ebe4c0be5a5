use thermostat_common::DeviceConfig;

#[derive(Debug, Clone)]
pub struct DeviceState {
    required_temperature: f64,
    sensor_temperature: f64,
    current_humidity: f64,
    temperature_offset: f64,
    max_temperature_offset: f64,
    last_update: i64,
}

impl DeviceState {
    pub fn new(config: &DeviceConfig, now_epoch: i64) -> Self {
        Self {
            required_temperature: config.initial_target,
            sensor_temperature: config.initial_temperature,
            current_humidity: config.initial_humidity,
            temperature_offset: 0.0,
            max_temperature_offset: config.max_temperature_offset,
            last_update: now_epoch,
        }
    }

    pub fn required_temperature(&self) -> f64 {
        self.required_temperature
    }

    /// Sensor reading with the calibration offset applied.
    pub fn current_temperature(&self) -> f64 {
        self.sensor_temperature + self.temperature_offset
    }

    pub fn current_humidity(&self) -> f64 {
        self.current_humidity
    }

    pub fn temperature_offset(&self) -> f64 {
        self.temperature_offset
    }

    pub fn max_temperature_offset(&self) -> f64 {
        self.max_temperature_offset
    }

    pub fn last_update(&self) -> i64 {
        self.last_update
    }

    /// Heating while the required temperature is above the current one.
    pub fn is_heating(&self) -> bool {
        self.required_temperature > self.current_temperature()
    }

    pub fn set_required_temperature(&mut self, value: f64) {
        self.required_temperature = value;
    }

    /// Rejects offsets above the configured maximum.
    pub fn set_temperature_offset(&mut self, value: f64) -> bool {
        if value > self.max_temperature_offset {
            return false;
        }
        self.temperature_offset = value;
        true
    }

    pub fn record_sample(&mut self, temperature: f64, humidity: f64, now_epoch: i64) {
        self.sensor_temperature = temperature;
        self.current_humidity = humidity.clamp(0.0, 100.0);
        self.last_update = now_epoch;
    }
}
