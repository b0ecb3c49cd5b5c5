use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{PlayerBackend, PlayerError};

/// Reads single properties without ever failing.
/// Anything the player can't supply comes back as `None` so the caller can apply its default.
#[derive(Clone)]
pub(crate) struct PropertyAccessor {
    backend: Arc<dyn PlayerBackend>,
}

impl PropertyAccessor {
    pub(crate) fn new(backend: Arc<dyn PlayerBackend>) -> Self {
        Self { backend }
    }

    pub(crate) async fn get(&self, name: &str) -> Option<Value> {
        match self.backend.get_property(name).await {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(PlayerError::PropertyUnavailable(_)) => {
                debug!("Property {name} unavailable");
                None
            }
            Err(e) => {
                warn!("Error getting property {name}: {e}");
                None
            }
        }
    }

    pub(crate) async fn get_bool(&self, name: &str) -> Option<bool> {
        let value = self.get(name).await?;
        convert(name, value, Value::as_bool)
    }

    pub(crate) async fn get_f64(&self, name: &str) -> Option<f64> {
        let value = self.get(name).await?;
        convert(name, value, Value::as_f64)
    }

    pub(crate) async fn get_i64(&self, name: &str) -> Option<i64> {
        let value = self.get(name).await?;
        // Numeric properties such as volume are reported as floats
        convert(name, value, |v| {
            v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
        })
    }

    pub(crate) async fn get_string(&self, name: &str) -> Option<String> {
        let value = self.get(name).await?;
        convert(name, value, |v| v.as_str().map(str::to_owned))
    }
}

fn convert<T>(name: &str, value: Value, f: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
    let converted = f(&value);
    if converted.is_none() {
        warn!("Unexpected value for property {name}: {value}");
    }
    converted
}
