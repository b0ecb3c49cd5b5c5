use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tap::TapFallible;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::assembler::SnapshotAssembler;
use crate::backend::{PlayerBackend, PlayerError};
use crate::dto::announcement::Announcement;
use crate::dto::player_event::PlayerEvent;
use crate::dto::snapshot::SnapshotField;
use crate::property::PropertyAccessor;
use crate::util::format_time;

/// Shows text on the player's OSD, or only logs it when OSD messages are turned off.
#[derive(Clone)]
pub(crate) struct OsdDisplay {
    backend: Arc<dyn PlayerBackend>,
    enabled: bool,
}

impl OsdDisplay {
    pub(crate) fn new(backend: Arc<dyn PlayerBackend>, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    /// Shows `text` when OSD messages are enabled, otherwise only logs it.
    pub(crate) async fn show(&self, text: &str, duration: Option<Duration>) {
        if !self.enabled {
            info!("OSD message: {text}");
            return;
        }
        self.show_text(text, duration).await;
    }

    pub(crate) async fn show_text(&self, text: &str, duration: Option<Duration>) {
        let mut args = vec![json!(text)];
        if let Some(duration) = duration {
            args.push(json!(duration.as_millis() as u64));
        }
        let _ = self
            .backend
            .command("show-text", args)
            .await
            .tap_err(|e| warn!("Error showing OSD message {text}: {e}"));
    }
}

pub(crate) struct EventReactor {
    backend: Arc<dyn PlayerBackend>,
    properties: PropertyAccessor,
    assembler: SnapshotAssembler,
    osd: OsdDisplay,
    announcement_tx: broadcast::Sender<Announcement>,
}

impl EventReactor {
    pub(crate) fn new(
        backend: Arc<dyn PlayerBackend>,
        assembler: SnapshotAssembler,
        osd: OsdDisplay,
        announcement_tx: broadcast::Sender<Announcement>,
    ) -> Self {
        Self {
            properties: PropertyAccessor::new(backend.clone()),
            backend,
            assembler,
            osd,
            announcement_tx,
        }
    }

    pub(crate) async fn run(self, mut events: broadcast::Receiver<PlayerEvent>) {
        info!("Event reactor started");
        loop {
            match events.recv().await {
                Ok(event) => {
                    let _ = self
                        .handle(event)
                        .await
                        .tap_err(|e| warn!("Error handling player event: {e}"));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event reactor fell behind, skipped {skipped} events");
                }
                Err(RecvError::Closed) => {
                    info!("Player event stream closed");
                    break;
                }
            }
        }
    }

    /// Reacts to a single event and returns the message that was displayed, if any.
    pub(crate) async fn handle(&self, event: PlayerEvent) -> Result<Option<String>, PlayerError> {
        let (announcement, message) = match event {
            PlayerEvent::StatusChange { property, value } => {
                let message = self.status_message(&property, &value).await?;
                let announcement = Announcement::StatusChange {
                    property,
                    value,
                    message: message.clone(),
                };
                (announcement, message)
            }
            PlayerEvent::Seek { end } => {
                let message = format!("Seek: {}", format_time(end));
                let announcement = Announcement::Seek {
                    end,
                    message: message.clone(),
                };
                (announcement, Some(message))
            }
            PlayerEvent::Stopped => {
                debug!("Playback stopped");
                (Announcement::Stopped, None)
            }
        };

        if let Some(message) = &message {
            self.osd.show(message, None).await;
        }
        // No receivers is fine, nobody is listening for pushes yet
        let _ = self.announcement_tx.send(announcement);

        Ok(message)
    }

    async fn status_message(
        &self,
        property: &str,
        value: &Value,
    ) -> Result<Option<String>, PlayerError> {
        let message = match property {
            "pause" => Some(if value.as_bool().unwrap_or(false) {
                "Pause".to_owned()
            } else {
                "Play".to_owned()
            }),
            "volume" => {
                let volume = value.as_f64().unwrap_or(0.0).round() as i64;
                Some(format!("Volume: {volume}%"))
            }
            "mute" => {
                if value.as_bool().unwrap_or(false) {
                    Some("Mute".to_owned())
                } else {
                    let volume = self.properties.get_i64("volume").await.unwrap_or(0);
                    Some(format!("Volume {volume}"))
                }
            }
            "path" => match value.as_str() {
                Some(path) if !path.is_empty() => Some(self.file_started(path).await?),
                _ => None,
            },
            "playlist-count" | "playlist-pos" => {
                debug!("{property} changed to {value}");
                None
            }
            other => {
                debug!("Ignoring change of {other}");
                None
            }
        };
        Ok(message)
    }

    async fn file_started(&self, path: &str) -> Result<String, PlayerError> {
        info!("Started playing {path}");
        // Timing adjustments only apply to the file they were made for
        self.backend.set_property("sub-delay", json!(0)).await?;
        self.backend.set_property("audio-delay", json!(0)).await?;

        let exclude: HashSet<SnapshotField> = SnapshotField::iter()
            .filter(|f| !matches!(f, SnapshotField::MediaTitle | SnapshotField::Filename))
            .collect();
        let snapshot = self.assembler.assemble(&exclude).await;

        Ok(format!(
            "Playing: {}",
            snapshot.display_title().unwrap_or_default()
        ))
    }
}

#[cfg(test)]
#[path = "./reactor_test.rs"]
mod reactor_test;
