use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use thermostat_common::{Attribute, DisplayUnits};

/// Last known device values. Every slot is a single atomic word, so reads
/// never block and a write swaps the old value out in one step: the
/// `changed` flag it returns is exact even when handlers race across threads.
#[derive(Debug)]
pub struct StateCache {
    values: [AtomicU64; 3],
    display_units: AtomicU8,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new(DisplayUnits::default())
    }
}

impl StateCache {
    pub fn new(display_units: DisplayUnits) -> Self {
        Self {
            values: [
                AtomicU64::new(0f64.to_bits()),
                AtomicU64::new(0f64.to_bits()),
                AtomicU64::new(0f64.to_bits()),
            ],
            display_units: AtomicU8::new(display_units.code()),
        }
    }

    pub fn read(&self, attribute: Attribute) -> f64 {
        f64::from_bits(self.values[attribute.index()].load(Ordering::Acquire))
    }

    /// Stores `value` and reports whether it differs from what it replaced.
    /// Comparison is exact numeric equality.
    pub fn write(&self, attribute: Attribute, value: f64) -> bool {
        let previous = self.values[attribute.index()].swap(value.to_bits(), Ordering::AcqRel);
        f64::from_bits(previous) != value
    }

    pub fn display_units(&self) -> DisplayUnits {
        DisplayUnits::from_code(self.display_units.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_display_units(&self, units: DisplayUnits) {
        self.display_units.store(units.code(), Ordering::Release);
    }
}
