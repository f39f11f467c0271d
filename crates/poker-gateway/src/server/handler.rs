//! WebSocket handlers
//!
//! Upgrades room connections and runs their socket tasks.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use poker_common::AppError;
use poker_core::Participant;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::api::ApiError;
use crate::connection::Connection;
use crate::handlers::{MessageDispatcher, PresenceHandler};
use crate::protocol::{CloseCode, WireMessage};
use crate::server::GatewayState;

/// Query string of the authenticated route
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Authenticated room connection
///
/// GET /rooms/{room_id}/ws?token=<jwt>
pub async fn room_ws_handler(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
    Query(query): Query<TokenQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    state.rooms().require(&room_id)?;

    let token = query.token.ok_or(ApiError::MissingAuth)?;
    let claims = state.jwt_service().validate(&token).map_err(|e| {
        tracing::debug!(room_id = %room_id, error = %e, "Rejected WebSocket token");
        ApiError::from(e)
    })?;

    let participant = Participant::user(claims.user_id(), claims.display_name());
    Ok(ws.on_upgrade(move |socket| handle_socket(state, socket, room_id, participant)))
}

/// Guest room connection
///
/// GET /rooms/{room_id}/guest-ws/{guest_id}
pub async fn guest_ws_handler(
    State(state): State<GatewayState>,
    Path((room_id, guest_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.rooms().require(&room_id)?;

    let guest = state
        .service_context()
        .guests()
        .verify(&guest_id, &room_id)
        .ok_or_else(|| {
            tracing::debug!(room_id = %room_id, guest_id = %guest_id, "Unknown guest");
            ApiError::App(AppError::forbidden("guest is not registered for this room"))
        })?;

    // Keep a profile the guest already edited in the room
    let participant = handle
        .lock()
        .participant(&guest.guest_id)
        .cloned()
        .unwrap_or_else(|| Participant::guest(guest.guest_id.clone(), guest.username.clone()));

    Ok(ws.on_upgrade(move |socket| handle_socket(state, socket, room_id, participant)))
}

/// How a socket ended
#[derive(Debug)]
enum Disconnect {
    /// Client sent a Close frame
    Clean,
    /// Stream error or the stream ended without a Close frame
    Abrupt(String),
    /// Server side close: queue overflow, heartbeat timeout, or a failed write
    Server(Option<CloseCode>),
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(
    state: GatewayState,
    socket: WebSocket,
    room_id: String,
    participant: Participant,
) {
    let ws_config = state.config().websocket.clone();
    let (tx, rx) = mpsc::channel::<WireMessage>(ws_config.outbound_buffer);

    let connection = Connection::new(
        Connection::generate_session_id(),
        room_id,
        participant.id.clone(),
        participant.is_guest,
        tx,
    );

    let greeting = match PresenceHandler::join(&state, &connection, participant) {
        Ok(greeting) => greeting,
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                room_id = %connection.room_id(),
                error = %e,
                "Failed to register connection"
            );
            return;
        }
    };

    let (ws_sink, ws_stream) = socket.split();

    let mut send_task = tokio::spawn(send_loop(
        connection.clone(),
        ws_sink,
        greeting,
        rx,
        ws_config.heartbeat_interval(),
    ));
    let mut recv_task = tokio::spawn(recv_loop(state.clone(), connection.clone(), ws_stream));
    let heartbeat_task = tokio::spawn(heartbeat_loop(
        connection.clone(),
        ws_config.heartbeat_interval(),
        ws_config.heartbeat_timeout(),
    ));

    let disconnect = tokio::select! {
        result = &mut recv_task => {
            connection.mark_closed();
            let _ = send_task.await;
            result.unwrap_or_else(|e| Disconnect::Abrupt(e.to_string()))
        }
        _ = &mut send_task => {
            recv_task.abort();
            Disconnect::Server(connection.close_code())
        }
    };
    heartbeat_task.abort();

    match &disconnect {
        Disconnect::Clean => tracing::info!(
            session_id = %connection.session_id(),
            room_id = %connection.room_id(),
            user_id = %connection.participant_id(),
            connected_ms = connection.age().as_millis(),
            "Client closed connection"
        ),
        Disconnect::Abrupt(reason) => tracing::warn!(
            session_id = %connection.session_id(),
            room_id = %connection.room_id(),
            user_id = %connection.participant_id(),
            reason = %reason,
            connected_ms = connection.age().as_millis(),
            "Connection dropped"
        ),
        Disconnect::Server(code) => tracing::warn!(
            session_id = %connection.session_id(),
            room_id = %connection.room_id(),
            user_id = %connection.participant_id(),
            close_code = ?code,
            connected_ms = connection.age().as_millis(),
            "Connection closed by server"
        ),
    }

    PresenceHandler::leave(&state, &connection);
}

/// Write the greeting, then drain the outbound queue into the socket and
/// ping on every interval
async fn send_loop(
    connection: Arc<Connection>,
    mut ws_sink: SplitSink<WebSocket, Message>,
    greeting: Vec<WireMessage>,
    mut rx: mpsc::Receiver<WireMessage>,
    heartbeat_interval: Duration,
) {
    for message in &greeting {
        if !write_message(&connection, &mut ws_sink, message).await {
            let _ = ws_sink.close().await;
            return;
        }
    }

    let mut ping = interval(heartbeat_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ping.tick().await;

    loop {
        tokio::select! {
            biased;

            code = connection.closed() => {
                if let Some(code) = code {
                    let frame = CloseFrame {
                        code: code.as_u16(),
                        reason: code.description().into(),
                    };
                    let _ = ws_sink.send(Message::Close(Some(frame))).await;
                }
                break;
            }
            message = rx.recv() => {
                let Some(message) = message else { break };
                if !write_message(&connection, &mut ws_sink, &message).await {
                    break;
                }
            }
            _ = ping.tick() => {
                if ws_sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = ws_sink.close().await;
}

/// Encode and write one message; false once the socket is unusable
async fn write_message(
    connection: &Connection,
    ws_sink: &mut SplitSink<WebSocket, Message>,
    message: &WireMessage,
) -> bool {
    let json = match message.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(
                session_id = %connection.session_id(),
                message_type = %message.message_type,
                error = %e,
                "Failed to encode outbound message"
            );
            return true;
        }
    };

    if let Err(e) = ws_sink.send(Message::Text(json)).await {
        tracing::debug!(
            session_id = %connection.session_id(),
            error = %e,
            "Failed to write to WebSocket"
        );
        return false;
    }
    true
}

/// Read frames until the client goes away
async fn recv_loop(
    state: GatewayState,
    connection: Arc<Connection>,
    mut ws_stream: SplitStream<WebSocket>,
) -> Disconnect {
    while let Some(frame) = ws_stream.next().await {
        connection.touch();

        match frame {
            Ok(Message::Text(text)) => handle_text_message(&state, &connection, &text),
            Ok(Message::Binary(_)) => {
                tracing::debug!(
                    session_id = %connection.session_id(),
                    "Discarding binary frame"
                );
            }
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
                tracing::trace!(session_id = %connection.session_id(), "Ping received");
            }
            Ok(Message::Pong(_)) => {
                tracing::trace!(session_id = %connection.session_id(), "Pong received");
            }
            Ok(Message::Close(_)) => return Disconnect::Clean,
            Err(e) => return Disconnect::Abrupt(e.to_string()),
        }
    }

    Disconnect::Abrupt("stream ended without close frame".to_string())
}

/// Decode and apply a text frame; undecodable frames are discarded
fn handle_text_message(state: &GatewayState, connection: &Connection, text: &str) {
    let message = match WireMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Discarding malformed frame"
            );
            return;
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        message_type = %message.message_type,
        "Received message"
    );

    MessageDispatcher::handle(state, connection, &message);
}

/// Close connections that have gone quiet
async fn heartbeat_loop(connection: Arc<Connection>, every: Duration, timeout: Duration) {
    let mut check_interval = interval(every);
    check_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        check_interval.tick().await;

        if connection.is_closed() {
            break;
        }

        let idle = connection.idle_for();
        if idle > timeout {
            tracing::warn!(
                session_id = %connection.session_id(),
                room_id = %connection.room_id(),
                idle_ms = idle.as_millis(),
                "Connection timed out (no inbound frames)"
            );
            connection.close(CloseCode::SessionTimeout);
            break;
        }
    }
}
