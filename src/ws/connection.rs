//! UI WebSocket connection loop.
//!
//! Handles the read/write loop for a single front-end connection:
//! topic subscription commands come in, filtered panel events go out.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::PanelEvent;
use crate::service::ControlPanel;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Sends the current panel snapshot on connect.
/// - Reads subscription commands from the client.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<PanelEvent>,
    panel: Arc<ControlPanel>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::all();

    let snapshot = crate::api::dto::PanelView::from(panel.snapshot().await);
    let hello = WsMessage::new(
        WsMessageType::Event,
        serde_json::json!({
            "event_type": "snapshot",
            "panel": serde_json::to_value(&snapshot).unwrap_or_default(),
        }),
    );
    if let Ok(json) = serde_json::to_string(&hello)
        && ws_tx.send(Message::text(json)).await.is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(panel_event) => {
                        if subs.matches(panel_event.topic()) {
                            let mut msg = WsMessage::new(
                                WsMessageType::Event,
                                serde_json::to_value(&panel_event).unwrap_or_default(),
                            );
                            msg.timestamp = *panel_event.timestamp();
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return error_response(String::new(), 400, "malformed JSON");
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return error_response(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { topics } => subs.subscribe(&topics),
        WsCommand::Unsubscribe { topics } => subs.unsubscribe(&topics),
    }

    let response = WsMessage {
        id: msg.id,
        msg_type: WsMessageType::Response,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({ "topics": subs.topics() }),
    };
    serde_json::to_string(&response).ok()
}

fn error_response(id: String, code: u16, message: &str) -> Option<String> {
    let err = WsMessage {
        id,
        msg_type: WsMessageType::Error,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({
            "code": code,
            "message": message,
        }),
    };
    serde_json::to_string(&err).ok()
}
