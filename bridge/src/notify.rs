use thermostat_common::{Attribute, ThermostatMode};
use tokio::sync::broadcast;
use tracing::debug;

/// A value pushed to the consumer outside the call that discovered it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Attribute { attribute: Attribute, value: f64 },
    Mode(ThermostatMode),
}

pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, change: Change);
}

impl<F> ChangeNotifier for F
where
    F: Fn(Change) + Send + Sync,
{
    fn notify(&self, change: Change) {
        self(change)
    }
}

/// Fans changes out to every subscriber. Having no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Change>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify(&self, change: Change) {
        if self.tx.send(change).is_err() {
            debug!(?change, "no subscribers for change notification");
        }
    }
}
