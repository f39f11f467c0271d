//! WebSocket test client
//!
//! Speaks the room envelope `{message_type, content, room_id, user_id}` and
//! hides Ping/Pong traffic from the tests.

use std::time::Duration;

use anyhow::{bail, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message},
    MaybeTlsStream, WebSocketStream,
};

/// How long to wait for an expected frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(3);

/// A connected room client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    room_id: String,
    user_id: String,
}

/// What the server said when the connection ended
#[derive(Debug, PartialEq, Eq)]
pub enum Closed {
    /// Close frame with its code
    Code(u16),
    /// Close frame without a payload, or the stream simply ended
    NoCode,
}

impl WsClient {
    /// Open a connection to a full WebSocket URL
    pub async fn connect(url: &str, room_id: &str, user_id: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self {
            stream,
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// Authenticated connection
    pub async fn user(base: &str, room_id: &str, user_id: &str, token: &str) -> Result<Self> {
        let url = format!("{base}/rooms/{room_id}/ws?token={token}");
        Self::connect(&url, room_id, user_id).await
    }

    /// Guest connection
    pub async fn guest(base: &str, room_id: &str, guest_id: &str) -> Result<Self> {
        let url = format!("{base}/rooms/{room_id}/guest-ws/{guest_id}");
        Self::connect(&url, room_id, guest_id).await
    }

    /// Send an event on behalf of this client
    pub async fn send(&mut self, message_type: &str, content: Value) -> Result<()> {
        let frame = json!({
            "message_type": message_type,
            "content": content,
            "room_id": self.room_id,
            "user_id": self.user_id,
        });
        self.send_raw(frame.to_string()).await
    }

    /// Send an arbitrary text frame
    pub async fn send_raw(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Send a binary frame
    pub async fn send_binary(&mut self, data: Vec<u8>) -> Result<()> {
        self.stream.send(Message::Binary(data)).await?;
        Ok(())
    }

    /// Next envelope from the server, skipping control frames
    pub async fn next_message(&mut self) -> Result<Value> {
        loop {
            let frame = tokio::time::timeout(FRAME_TIMEOUT, self.stream.next()).await;
            match frame {
                Err(_) => bail!("timed out waiting for a frame"),
                Ok(None) => bail!("connection ended"),
                Ok(Some(Err(e))) => bail!("websocket error: {e}"),
                Ok(Some(Ok(Message::Text(text)))) => return Ok(serde_json::from_str(&text)?),
                Ok(Some(Ok(Message::Close(frame)))) => bail!("connection closed: {frame:?}"),
                Ok(Some(Ok(_))) => {}
            }
        }
    }

    /// Read until a message of `message_type` arrives, dropping others
    pub async fn expect(&mut self, message_type: &str) -> Result<Value> {
        loop {
            let message = self.next_message().await?;
            if message["message_type"] == message_type {
                return Ok(message);
            }
        }
    }

    /// Collect every envelope that arrives within `window`
    pub async fn collect_for(&mut self, window: Duration) -> Vec<Value> {
        let mut messages = Vec::new();
        let deadline = tokio::time::Instant::now() + window;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => {
                    if let Ok(value) = serde_json::from_str(&text) {
                        messages.push(value);
                    }
                }
                Ok(Some(Ok(Message::Close(_)) | Err(_))) | Ok(None) | Err(_) => break,
                Ok(Some(Ok(_))) => {}
            }
        }
        messages
    }

    /// Read until the server closes the connection
    pub async fn expect_close(&mut self, within: Duration) -> Result<Closed> {
        let deadline = tokio::time::Instant::now() + within;
        loop {
            match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Err(_) => bail!("connection still open"),
                Ok(None) | Ok(Some(Err(_))) => return Ok(Closed::NoCode),
                Ok(Some(Ok(Message::Close(Some(frame))))) => {
                    return Ok(Closed::Code(u16::from(frame.code)));
                }
                Ok(Some(Ok(Message::Close(None)))) => return Ok(Closed::NoCode),
                Ok(Some(Ok(_))) => {}
            }
        }
    }

    /// Send a Close frame and wait for the server to finish the handshake
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        while let Some(Ok(_)) = self.stream.next().await {}
        Ok(())
    }
}

/// HTTP status of a rejected WebSocket handshake
pub async fn handshake_status(url: &str) -> Option<u16> {
    match connect_async(url).await {
        Err(tungstenite::Error::Http(response)) => Some(response.status().as_u16()),
        _ => None,
    }
}
