use std::sync::Arc;

use thermostat_common::{Attribute, BridgeStatus, DisplayUnits, TargetRange, ThermostatMode};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    attribute::{acknowledge, Ack, RefreshOutcome, SyncedAttribute, WriteOutcome},
    cache::StateCache,
    client::DeviceTransport,
    error::{Error, Result},
    notify::{Change, ChangeNotifier},
};

/// The thermostat surface handed to the accessory layer: three
/// device-backed attributes, a derived mode and local display units.
#[derive(Clone)]
pub struct DeviceProxy {
    name: String,
    cache: Arc<StateCache>,
    notifier: Arc<dyn ChangeNotifier>,
    target_range: TargetRange,
    current_temperature: SyncedAttribute,
    target_temperature: SyncedAttribute,
    current_humidity: SyncedAttribute,
}

impl DeviceProxy {
    pub fn new(
        name: impl Into<String>,
        transport: Arc<dyn DeviceTransport>,
        notifier: Arc<dyn ChangeNotifier>,
        target_range: TargetRange,
        display_units: DisplayUnits,
    ) -> Self {
        let cache = Arc::new(StateCache::new(display_units));
        let synced = |attribute| {
            SyncedAttribute::new(
                attribute,
                Arc::clone(&cache),
                Arc::clone(&transport),
                Arc::clone(&notifier),
            )
        };

        Self {
            name: name.into(),
            current_temperature: synced(Attribute::CurrentTemperature),
            target_temperature: synced(Attribute::TargetTemperature),
            current_humidity: synced(Attribute::CurrentHumidity),
            cache,
            notifier,
            target_range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_range(&self) -> TargetRange {
        self.target_range
    }

    pub fn attribute(&self, attribute: Attribute) -> &SyncedAttribute {
        match attribute {
            Attribute::CurrentTemperature => &self.current_temperature,
            Attribute::TargetTemperature => &self.target_temperature,
            Attribute::CurrentHumidity => &self.current_humidity,
        }
    }

    pub fn get_target_temperature(&self, ack: Ack<f64>) -> JoinHandle<RefreshOutcome> {
        self.target_temperature.get(ack)
    }

    /// A value outside the target range is answered with the unchanged cached
    /// target and reported as `TargetOutOfRange`. Nothing is sent to the device.
    pub fn set_target_temperature(
        &self,
        value: f64,
        ack: Ack<f64>,
    ) -> Result<JoinHandle<WriteOutcome>> {
        if !self.target_range.contains(value) {
            acknowledge(
                ack,
                self.target_temperature.cached(),
                Attribute::TargetTemperature.as_str(),
            );
            return Err(Error::TargetOutOfRange {
                value,
                min: self.target_range.min,
                max: self.target_range.max,
            });
        }
        self.target_temperature.set(value, ack)
    }

    /// Mode is re-derived and pushed once the refresh settles, whatever its
    /// outcome and whether or not the temperature moved.
    pub fn get_current_temperature(&self, ack: Ack<f64>) -> JoinHandle<RefreshOutcome> {
        acknowledge(
            ack,
            self.current_temperature.cached(),
            Attribute::CurrentTemperature.as_str(),
        );

        let this = self.clone();
        tokio::spawn(async move {
            let outcome = this.current_temperature.refresh().await;
            let mode = this.mode();
            debug!(mode = mode.as_str(), "pushing derived mode");
            this.notifier.notify(Change::Mode(mode));
            outcome
        })
    }

    pub fn get_current_humidity(&self, ack: Ack<f64>) -> JoinHandle<RefreshOutcome> {
        self.current_humidity.get(ack)
    }

    pub fn get_mode(&self, ack: Ack<ThermostatMode>) {
        acknowledge(ack, self.mode(), "mode");
    }

    pub fn mode(&self) -> ThermostatMode {
        ThermostatMode::derive(
            self.cache.read(Attribute::TargetTemperature),
            self.cache.read(Attribute::CurrentTemperature),
        )
    }

    pub fn get_display_units(&self, ack: Ack<DisplayUnits>) {
        let units = self.cache.display_units();
        debug!(units = units.as_str(), "responding with display units");
        acknowledge(ack, units, "displayUnits");
    }

    pub fn set_display_units(&self, units: DisplayUnits, ack: Ack<DisplayUnits>) {
        self.cache.set_display_units(units);
        debug!(units = units.as_str(), "set display units");
        acknowledge(ack, units, "displayUnits");
    }

    /// Cached view of every value. Never touches the device.
    pub fn status(&self) -> BridgeStatus {
        BridgeStatus {
            name: self.name.clone(),
            current_temp: self.cache.read(Attribute::CurrentTemperature),
            target_temp: self.cache.read(Attribute::TargetTemperature),
            current_humidity: self.cache.read(Attribute::CurrentHumidity),
            mode: self.mode().as_str(),
            display_units: self.cache.display_units().as_str(),
            target_range: self.target_range,
        }
    }
}
