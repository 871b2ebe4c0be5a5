//! Stale-while-revalidate bridge between an accessory layer that wants
//! immediate answers and a thermostat reachable only over HTTP.
//!
//! Every getter acknowledges from [`StateCache`] before the device is asked
//! anything; the refresh runs on a spawned task and notifies through a
//! [`ChangeNotifier`] only when the value moved. Target temperature writes are
//! applied locally first and never rolled back.

pub mod attribute;
pub mod cache;
pub mod client;
pub mod error;
pub mod host;
pub mod notify;
pub mod proxy;

#[cfg(test)]
mod testing;

pub use attribute::{Ack, RefreshOutcome, SyncedAttribute, WriteOutcome};
pub use cache::StateCache;
pub use client::{DeviceTransport, HttpDeviceClient};
pub use error::{Error, Result};
pub use notify::{BroadcastNotifier, Change, ChangeNotifier};
pub use proxy::DeviceProxy;
