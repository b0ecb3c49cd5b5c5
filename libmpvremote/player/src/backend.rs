use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::dto::player_event::PlayerEvent;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
    /// The property exists but has no value in the current playback state.
    #[error("property unavailable: {0}")]
    PropertyUnavailable(String),
    #[error("{0}")]
    Command(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Property and command access to a running player.
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    async fn get_property(&self, name: &str) -> Result<Value, PlayerError>;

    async fn set_property(&self, name: &str, value: Value) -> Result<(), PlayerError>;

    async fn command(&self, name: &str, args: Vec<Value>) -> Result<Value, PlayerError>;

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent>;
}
