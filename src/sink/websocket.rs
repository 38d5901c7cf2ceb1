//! # WebSocket Sink Module
//!
//! Delivers commands to the cockpit server over a WebSocket connection and
//! listens for server-pushed configuration overrides.
//!
//! ## Wire Format
//!
//! Every frame in both directions is a single JSON text message:
//!
//! ```json
//! {"name": "/pilot/move", "payload": {"action": "back", "speed": 0.2}}
//! ```
//!
//! The only inbound frame acted upon is `/gamepad/config`, whose payload is
//! a partial configuration override. Unknown inbound frames are ignored.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, StreamExt};
use futures_util::SinkExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::Overrides;
use crate::error::Result;

use super::CommandSink;

/// The frame name the server uses to push configuration overrides.
const CONFIG_FRAME_NAME: &str = "/gamepad/config";

/// Capacity of the override channel. Overrides are rare; one pending entry
/// is already more than the server ever sends in practice.
const OVERRIDE_CHANNEL_CAPACITY: usize = 8;

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

#[derive(Debug, Deserialize)]
struct InboundFrame {
    name: String,
    #[serde(default)]
    payload: Value,
}

/// Serializes one outbound command into its wire frame.
fn encode_frame(name: &str, payload: &Value) -> Result<String> {
    Ok(serde_json::to_string(&json!({ "name": name, "payload": payload }))?)
}

/// Parses an inbound text frame, returning the override it carries, if any.
///
/// Malformed frames and frames other than `/gamepad/config` yield `None`.
fn parse_override(text: &str) -> Option<Overrides> {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Ignoring malformed inbound frame: {}", e);
            return None;
        }
    };
    if frame.name != CONFIG_FRAME_NAME {
        debug!("Ignoring inbound frame: {}", frame.name);
        return None;
    }
    match serde_json::from_value(frame.payload) {
        Ok(overrides) => Some(overrides),
        Err(e) => {
            warn!("Ignoring malformed configuration override: {}", e);
            None
        }
    }
}

/// WebSocket-backed implementation of [`CommandSink`].
///
/// Created with [`WebSocketSink::connect`], which also hands back the channel
/// on which server-pushed configuration overrides arrive. Send failures
/// surface to the caller, which owns the reconnect decision.
pub struct WebSocketSink {
    writer: WsWriter,
    reader_task: JoinHandle<()>,
}

impl WebSocketSink {
    /// Connects to the cockpit server.
    ///
    /// Returns the sink and the receiving end of the override channel. A
    /// background task owns the read half of the connection; it forwards
    /// `/gamepad/config` payloads and exits when the server closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket handshake fails.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<Overrides>)> {
        let (stream, _) = connect_async(url).await?;
        info!("Connected to cockpit server at {}", url);

        let (writer, mut reader) = stream.split();
        let (override_tx, override_rx) = mpsc::channel(OVERRIDE_CHANNEL_CAPACITY);

        let reader_task = tokio::spawn(async move {
            while let Some(message) = reader.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if let Some(overrides) = parse_override(&text) {
                            if override_tx.send(overrides).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("Cockpit server closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok((Self { writer, reader_task }, override_rx))
    }
}

#[async_trait]
impl CommandSink for WebSocketSink {
    async fn send(&mut self, name: &str, payload: Value) -> Result<()> {
        let frame = encode_frame(name, &payload)?;
        self.writer.send(Message::Text(frame)).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.reader_task.abort();
        self.writer.close().await?;
        Ok(())
    }
}

impl Drop for WebSocketSink {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}
