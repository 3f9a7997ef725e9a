//! services/api/src/web/ws_handler.rs
//!
//! The entry point and control loop for a WebSocket connection. A connection
//! starts with an empty subscription set; the client grows and shrinks it
//! with subscribe/unsubscribe messages while the loop forwards every hub
//! envelope whose topic is currently subscribed.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::web::protocol::{ClientMessage, EventEnvelope, Topic};
use crate::web::state::AppState;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let mut events = app_state.hub.subscribe();
    let mut topics: HashSet<Topic> = HashSet::new();

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Subscribe { topics: requested }) => {
                                topics.extend(requested);
                            }
                            Ok(ClientMessage::Unsubscribe { topics: dropped }) => {
                                for topic in &dropped {
                                    topics.remove(topic);
                                }
                            }
                            Err(e) => {
                                warn!("Failed to deserialize client message: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client sent close message.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                    None => {
                        info!("Client disconnected.");
                        break;
                    }
                }
            }
            published = events.recv() => {
                match published {
                    Ok((topic, event)) => {
                        if !topics.contains(&topic) {
                            continue;
                        }
                        let envelope = EventEnvelope { topic, event };
                        let json = match serde_json::to_string(&envelope) {
                            Ok(json) => json,
                            Err(e) => {
                                error!("Failed to serialize event envelope: {}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // Fire-and-forget: a slow client just misses what it
                    // could not keep up with.
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("Client lagged; dropped {} events", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!("WebSocket connection closed.");
}
