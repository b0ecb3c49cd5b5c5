//! Scripted in-memory player used by tests in this workspace.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::backend::{PlayerBackend, PlayerError};
use crate::dto::player_event::PlayerEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCall {
    Get(String),
    Set(String, Value),
    Command(String, Vec<Value>),
}

#[derive(Clone)]
pub struct FakePlayer {
    properties: Arc<Mutex<HashMap<String, Value>>>,
    failures: Arc<Mutex<HashMap<String, PlayerError>>>,
    calls: Arc<Mutex<Vec<PlayerCall>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Default for FakePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlayer {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(32);
        Self {
            properties: Default::default(),
            failures: Default::default(),
            calls: Default::default(),
            delay: Default::default(),
            event_tx,
        }
    }

    pub fn with_property(self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Every get, set or command using `name` fails with `error`.
    pub fn with_failure(self, name: &str, error: PlayerError) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(name.to_owned(), error);
        self
    }

    /// Delays every property read, simulating a player that stopped responding.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set(&self, name: &str, value: Value) {
        self.properties
            .lock()
            .unwrap()
            .insert(name.to_owned(), value);
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands and property writes, in order, without the reads.
    pub fn mutations(&self) -> Vec<PlayerCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, PlayerCall::Get(_)))
            .collect()
    }

    pub fn emit(&self, event: PlayerEvent) {
        let _ = self.event_tx.send(event);
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self, name: &str) -> Option<PlayerError> {
        self.failures.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl PlayerBackend for FakePlayer {
    async fn get_property(&self, name: &str) -> Result<Value, PlayerError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(PlayerCall::Get(name.to_owned()));
        if let Some(e) = self.failure(name) {
            return Err(e);
        }
        self.properties
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| PlayerError::PropertyUnavailable(name.to_owned()))
    }

    async fn set_property(&self, name: &str, value: Value) -> Result<(), PlayerError> {
        self.record(PlayerCall::Set(name.to_owned(), value.clone()));
        if let Some(e) = self.failure(name) {
            return Err(e);
        }
        self.set(name, value);
        Ok(())
    }

    async fn command(&self, name: &str, args: Vec<Value>) -> Result<Value, PlayerError> {
        self.record(PlayerCall::Command(name.to_owned(), args));
        match self.failure(name) {
            Some(e) => Err(e),
            None => Ok(Value::Null),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }
}
