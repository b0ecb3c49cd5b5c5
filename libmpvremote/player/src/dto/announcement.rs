use serde::Serialize;
use serde_json::Value;

/// What the event reactor decided to tell connected observers about a player event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Announcement {
    StatusChange {
        property: String,
        value: Value,
        message: Option<String>,
    },
    Seek {
        end: f64,
        message: String,
    },
    Stopped,
}
