//! Scripted device transport and recording notifier shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    client::DeviceTransport,
    error::{Error, Result},
    notify::Change,
};

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Value(f64),
    Absent,
    Fail,
}

struct Step {
    reply: Reply,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(String),
    Push(String, f64),
}

/// Answers calls from a queue. A gated step parks until its sender fires,
/// which lets a test decide the order in which in-flight calls complete.
/// An exhausted queue answers `Absent`.
#[derive(Default)]
pub struct ScriptedTransport {
    fetches: Mutex<VecDeque<Step>>,
    pushes: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_fetch(&self, reply: Reply) {
        self.fetches.lock().unwrap().push_back(Step { reply, gate: None });
    }

    pub fn on_fetch_gated(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.fetches.lock().unwrap().push_back(Step {
            reply,
            gate: Some(rx),
        });
        tx
    }

    pub fn on_push(&self, reply: Reply) {
        self.pushes.lock().unwrap().push_back(Step { reply, gate: None });
    }

    pub fn on_push_gated(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.pushes.lock().unwrap().push_back(Step {
            reply,
            gate: Some(rx),
        });
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn next(queue: &Mutex<VecDeque<Step>>) -> Reply {
        let step = queue.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Reply::Absent;
        };
        if let Some(gate) = step.gate {
            let _ = gate.await;
        }
        step.reply
    }
}

pub fn transport_error() -> Error {
    match reqwest::Client::new().get("not a url").build() {
        Err(err) => Error::Transport(err),
        Ok(_) => unreachable!("invalid url must not build"),
    }
}

#[async_trait]
impl DeviceTransport for ScriptedTransport {
    async fn fetch(&self, action: &str) -> Result<Option<f64>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Fetch(action.to_string()));
        match Self::next(&self.fetches).await {
            Reply::Value(value) => Ok(Some(value)),
            Reply::Absent => Ok(None),
            Reply::Fail => Err(transport_error()),
        }
    }

    async fn push(&self, action: &str, value: f64) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Push(action.to_string(), value));
        match Self::next(&self.pushes).await {
            Reply::Fail => Err(transport_error()),
            Reply::Value(_) | Reply::Absent => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    changes: Arc<Mutex<Vec<Change>>>,
}

impl Recorder {
    pub fn notifier(&self) -> impl Fn(Change) + Send + Sync + 'static {
        let changes = Arc::clone(&self.changes);
        move |change| changes.lock().unwrap().push(change)
    }

    pub fn changes(&self) -> Vec<Change> {
        self.changes.lock().unwrap().clone()
    }
}
