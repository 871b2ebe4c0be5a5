use std::{fmt::Debug, sync::Arc};

use thermostat_common::Attribute;
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    cache::StateCache,
    client::DeviceTransport,
    error::{Error, Result},
    notify::{Change, ChangeNotifier},
};

/// Consumer-side acknowledgment, completed exactly once per hook call.
pub type Ack<T> = oneshot::Sender<T>;

pub(crate) fn acknowledge<T: Debug>(ack: Ack<T>, value: T, hook: &str) {
    if let Err(value) = ack.send(value) {
        warn!(hook, ?value, "consumer dropped acknowledgment");
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshOutcome {
    Updated(f64),
    Unchanged(f64),
    NoData,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteOutcome {
    Confirmed(f64),
    Failed,
}

/// One device-backed value: answered from the cache, revalidated in the
/// background, written optimistically.
#[derive(Clone)]
pub struct SyncedAttribute {
    attribute: Attribute,
    cache: Arc<StateCache>,
    transport: Arc<dyn DeviceTransport>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl SyncedAttribute {
    pub fn new(
        attribute: Attribute,
        cache: Arc<StateCache>,
        transport: Arc<dyn DeviceTransport>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            attribute,
            cache,
            transport,
            notifier,
        }
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn cached(&self) -> f64 {
        self.cache.read(self.attribute)
    }

    /// Acknowledges with the cached value before any network activity, then
    /// revalidates on a spawned task.
    pub fn get(&self, ack: Ack<f64>) -> JoinHandle<RefreshOutcome> {
        acknowledge(ack, self.cached(), self.attribute.as_str());
        let this = self.clone();
        tokio::spawn(async move { this.refresh().await })
    }

    /// Fetches the device value. Only a successful fetch that differs from the
    /// cache at comparison time notifies.
    pub async fn refresh(&self) -> RefreshOutcome {
        let action = self.attribute.read_action();
        let value = match self.transport.fetch(action).await {
            Ok(Some(value)) => value,
            Ok(None) => return RefreshOutcome::NoData,
            Err(err) => {
                warn!(action, "refresh failed: {err}");
                return RefreshOutcome::Failed;
            }
        };

        if !self.cache.write(self.attribute, value) {
            return RefreshOutcome::Unchanged(value);
        }

        debug!(attribute = self.attribute.as_str(), value, "updated cached value");
        self.notifier.notify(Change::Attribute {
            attribute: self.attribute,
            value,
        });
        RefreshOutcome::Updated(value)
    }

    /// Stores `value` and acknowledges it immediately, then pushes it to the
    /// device. A failed push is logged and the cache keeps `value`.
    pub fn set(&self, value: f64, ack: Ack<f64>) -> Result<JoinHandle<WriteOutcome>> {
        let action = self
            .attribute
            .write_action()
            .ok_or(Error::UnsupportedWrite {
                attribute: self.attribute,
            })?;

        self.cache.write(self.attribute, value);
        acknowledge(ack, value, self.attribute.as_str());

        let this = self.clone();
        Ok(tokio::spawn(async move { this.confirm(action, value).await }))
    }

    async fn confirm(&self, action: &'static str, value: f64) -> WriteOutcome {
        if let Err(err) = self.transport.push(action, value).await {
            warn!(action, value, "write not confirmed, cache left as written: {err}");
            return WriteOutcome::Failed;
        }

        // The confirmation is the latest completed response for this value.
        self.cache.write(self.attribute, value);
        debug!(attribute = self.attribute.as_str(), value, "device confirmed write");
        self.notifier.notify(Change::Attribute {
            attribute: self.attribute,
            value,
        });
        WriteOutcome::Confirmed(value)
    }
}
