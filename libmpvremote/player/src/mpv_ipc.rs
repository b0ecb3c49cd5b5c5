use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tap::TapFallible;
use tipsy::Endpoint;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::oneshot::Sender as OneShotSender;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, info, warn};

use crate::backend::{PlayerBackend, PlayerError};
use crate::dto::player_event::PlayerEvent;
use crate::two_way_channel::{TwoWayReceiver, TwoWaySender, two_way_channel};

const OBSERVED_PROPERTIES: &[&str] = &[
    "pause",
    "volume",
    "mute",
    "playlist-count",
    "playlist-pos",
    "path",
    "idle-active",
];
const SUCCESS: &str = "success";
const PROPERTY_UNAVAILABLE: &str = "property unavailable";

type IpcResult = Result<Value, PlayerError>;
type PendingRequests = Arc<Mutex<Pending>>;

struct PendingRequest {
    label: String,
    responder: OneShotSender<IpcResult>,
}

#[derive(Default)]
struct Pending {
    requests: HashMap<u64, PendingRequest>,
    /// Set when the read loop exits. Nothing answers requests after that.
    closed: bool,
}

fn connection_closed() -> PlayerError {
    PlayerError::Connection("mpv connection closed".to_owned())
}

#[derive(Debug, PartialEq)]
pub(crate) enum IpcMessage {
    Response {
        request_id: u64,
        error: String,
        data: Value,
    },
    PropertyChange {
        name: String,
        data: Value,
    },
    Event(String),
}

#[derive(Deserialize)]
struct RawMessage {
    request_id: Option<u64>,
    error: Option<String>,
    #[serde(default)]
    data: Value,
    event: Option<String>,
    name: Option<String>,
}

/// Parses one line received from the player's IPC socket.
pub(crate) fn parse_message(line: &str) -> Option<IpcMessage> {
    let raw: RawMessage = serde_json::from_str(line)
        .tap_err(|e| warn!("Invalid IPC message {line}: {e}"))
        .ok()?;

    match (raw.event, raw.request_id) {
        (Some(event), _) if event == "property-change" => Some(IpcMessage::PropertyChange {
            name: raw.name.unwrap_or_default(),
            data: raw.data,
        }),
        (Some(event), _) => Some(IpcMessage::Event(event)),
        (None, Some(request_id)) => Some(IpcMessage::Response {
            request_id,
            error: raw.error.unwrap_or_else(|| SUCCESS.to_owned()),
            data: raw.data,
        }),
        (None, None) => {
            debug!("Ignoring IPC message without event or request id: {line}");
            None
        }
    }
}

fn to_result(label: &str, error: String, data: Value) -> IpcResult {
    match error.as_str() {
        SUCCESS => Ok(data),
        PROPERTY_UNAVAILABLE => Err(PlayerError::PropertyUnavailable(label.to_owned())),
        _ => Err(PlayerError::Command(error)),
    }
}

/// Client for mpv's JSON IPC protocol (`--input-ipc-server`).
#[derive(Clone, Debug)]
pub struct MpvIpcClient {
    request_tx: TwoWaySender<Vec<Value>, IpcResult>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl MpvIpcClient {
    pub async fn connect(socket: impl Into<PathBuf>) -> Result<Self, PlayerError> {
        let socket = socket.into();
        info!("Connecting to mpv at {socket:?}");
        let stream = Endpoint::connect(socket.clone())
            .await
            .map_err(|e| PlayerError::Connection(format!("{}: {e}", socket.display())))?;
        Self::from_stream(stream).await
    }

    /// Runs the protocol over an already connected stream and starts observing properties.
    pub async fn from_stream<S>(stream: S) -> Result<Self, PlayerError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let (request_tx, request_rx) = two_way_channel();
        let (event_tx, _) = broadcast::channel(64);
        let pending = PendingRequests::default();

        tokio::spawn(write_loop(writer, request_rx, pending.clone()));
        tokio::spawn(read_loop(
            BufReader::new(reader),
            pending,
            event_tx.clone(),
            request_tx.clone(),
        ));

        let client = Self {
            request_tx,
            event_tx,
        };
        client.observe_properties().await?;
        Ok(client)
    }

    async fn observe_properties(&self) -> Result<(), PlayerError> {
        for (id, name) in OBSERVED_PROPERTIES.iter().enumerate() {
            self.send(vec![json!("observe_property"), json!(id + 1), json!(name)])
                .await?;
        }
        Ok(())
    }

    async fn send(&self, command: Vec<Value>) -> IpcResult {
        send_request(&self.request_tx, command).await
    }
}

async fn send_request(
    request_tx: &TwoWaySender<Vec<Value>, IpcResult>,
    command: Vec<Value>,
) -> IpcResult {
    request_tx
        .get_response(command)
        .await
        .map_err(PlayerError::Connection)?
}

#[async_trait]
impl PlayerBackend for MpvIpcClient {
    async fn get_property(&self, name: &str) -> Result<Value, PlayerError> {
        self.send(vec![json!("get_property"), json!(name)]).await
    }

    async fn set_property(&self, name: &str, value: Value) -> Result<(), PlayerError> {
        self.send(vec![json!("set_property"), json!(name), value])
            .await?;
        Ok(())
    }

    async fn command(&self, name: &str, args: Vec<Value>) -> Result<Value, PlayerError> {
        let mut command = Vec::with_capacity(args.len() + 1);
        command.push(json!(name));
        command.extend(args);
        self.send(command).await
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }
}

fn request_label(command: &[Value]) -> String {
    match command {
        // Property reads are labelled by the property so unavailable errors can name it
        [Value::String(cmd), Value::String(name), ..] if cmd.ends_with("_property") => {
            name.to_owned()
        }
        [Value::String(cmd), ..] => cmd.to_owned(),
        _ => String::new(),
    }
}

async fn write_loop<W>(
    mut writer: W,
    request_rx: TwoWayReceiver<Vec<Value>, IpcResult>,
    pending: PendingRequests,
) where
    W: AsyncWrite + Unpin,
{
    let mut next_id: u64 = 1;

    while let Ok((command, responder)) = request_rx.recv_async().await {
        let request_id = next_id;
        next_id += 1;
        let label = request_label(&command);

        let mut line = match serde_json::to_vec(&json!({
            "command": command,
            "request_id": request_id,
        })) {
            Ok(line) => line,
            Err(e) => {
                if let Some(responder) = responder {
                    let _ = responder.send(Err(PlayerError::Protocol(e.to_string())));
                }
                continue;
            }
        };
        line.push(b'\n');

        // Registered before writing so a fast reply always finds its caller
        {
            let mut pending = pending.lock().await;
            if pending.closed {
                debug!("Dropping {label} request, mpv connection is closed");
                if let Some(responder) = responder {
                    let _ = responder.send(Err(connection_closed()));
                }
                continue;
            }
            if let Some(responder) = responder {
                pending
                    .requests
                    .insert(request_id, PendingRequest { label, responder });
            }
        }

        if let Err(e) = writer.write_all(&line).await {
            error!("Error writing to mpv: {e}");
            if let Some(request) = pending.lock().await.requests.remove(&request_id) {
                let _ = request
                    .responder
                    .send(Err(PlayerError::Connection(e.to_string())));
            }
        }
    }
    debug!("IPC write loop finished");
}

async fn read_loop<R>(
    reader: R,
    pending: PendingRequests,
    event_tx: broadcast::Sender<PlayerEvent>,
    request_tx: TwoWaySender<Vec<Value>, IpcResult>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut seeking = false;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                error!("mpv closed the IPC connection");
                break;
            }
            Err(e) => {
                error!("Error reading from mpv: {e}");
                break;
            }
        };

        match parse_message(&line) {
            Some(IpcMessage::Response {
                request_id,
                error,
                data,
            }) => match pending.lock().await.requests.remove(&request_id) {
                Some(request) => {
                    let _ = request
                        .responder
                        .send(to_result(&request.label, error, data));
                }
                None => debug!("No caller waiting for request {request_id}"),
            },
            Some(IpcMessage::PropertyChange { name, data }) => {
                let event = if name == "idle-active" {
                    if data.as_bool() != Some(true) {
                        continue;
                    }
                    PlayerEvent::Stopped
                } else {
                    PlayerEvent::StatusChange {
                        property: name,
                        value: data,
                    }
                };
                let _ = event_tx.send(event);
            }
            Some(IpcMessage::Event(event)) => match event.as_str() {
                "seek" => seeking = true,
                "playback-restart" if seeking => {
                    seeking = false;
                    // Answered by this loop, so the lookup has to run elsewhere
                    let request_tx = request_tx.clone();
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        match send_request(
                            &request_tx,
                            vec![json!("get_property"), json!("time-pos")],
                        )
                        .await
                        {
                            Ok(position) => {
                                let end = position.as_f64().unwrap_or_default();
                                let _ = event_tx.send(PlayerEvent::Seek { end });
                            }
                            Err(e) => warn!("Error reading position after seek: {e}"),
                        }
                    });
                }
                other => debug!("Ignoring mpv event {other}"),
            },
            None => {}
        }
    }

    let mut pending = pending.lock().await;
    pending.closed = true;
    for (_, request) in pending.requests.drain() {
        let _ = request.responder.send(Err(connection_closed()));
    }
}

#[cfg(test)]
#[path = "./mpv_ipc_test.rs"]
mod mpv_ipc_test;
