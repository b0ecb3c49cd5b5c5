use serde_json::Value;
use strum::Display;

/// Notifications pushed by the player independently of any request.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum PlayerEvent {
    StatusChange { property: String, value: Value },
    Seek { end: f64 },
    Stopped,
}
