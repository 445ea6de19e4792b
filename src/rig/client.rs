//! Rig connection task.
//!
//! Dials the rig once, then runs a single read/write loop that:
//!
//! - drains the panel's command queue and emits each command as a
//!   Socket.IO event with an ack id,
//! - renders inbound `log` / `webcam` events into the [`ControlPanel`],
//! - answers pings and sends its own at the handshake's interval,
//! - logs acks and expires the ones the rig never answers.
//!
//! There is no reconnect. When the loop ends the panel is marked
//! disconnected and further commands fail with
//! [`PanelError::Disconnected`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::packet::Packet;
use super::wire::{self, RigMessage};
use crate::domain::{Channel, Command, ConnectionState};
use crate::error::PanelError;
use crate::service::ControlPanel;

/// WebSocket stream to the rig.
pub type RigSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection settings for the rig transport.
#[derive(Debug, Clone)]
pub struct RigOptions {
    /// Base WebSocket URL of the rig (e.g. `ws://127.0.0.1:9099`).
    pub endpoint: String,
    /// Ping interval used until the handshake announces one.
    pub ping_interval: Duration,
    /// How long to wait for an ack before giving up on it.
    pub ack_timeout: Duration,
}

impl RigOptions {
    /// Full Socket.IO URL for a WebSocket-only Engine.IO v3 session.
    #[must_use]
    pub fn socket_url(&self) -> String {
        format!(
            "{}/socket.io/?EIO=3&transport=websocket",
            self.endpoint.trim_end_matches('/')
        )
    }
}

/// Spawns the rig connection task.
///
/// The task owns `commands` for its whole life; the panel sees
/// [`PanelError::Disconnected`] once it exits.
pub fn spawn(
    options: RigOptions,
    commands: mpsc::Receiver<Command>,
    panel: Arc<ControlPanel>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        panel.set_connection(ConnectionState::Connecting).await;
        let url = options.socket_url();
        tracing::info!(%url, "connecting to rig");

        let reason = match connect(&url).await {
            Ok(socket) => run_connection(socket, commands, &panel, &options).await,
            Err(e) => {
                tracing::error!(%url, error = %e, "rig connection failed");
                e.to_string()
            }
        };

        tracing::warn!(%reason, "rig connection ended");
        panel
            .set_connection(ConnectionState::Disconnected { reason })
            .await;
    })
}

/// Opens the WebSocket to the rig.
///
/// # Errors
///
/// Returns [`PanelError::Transport`] if the connection or the WebSocket
/// handshake fails.
pub async fn connect(url: &str) -> Result<RigSocket, PanelError> {
    let (socket, _) = connect_async(url).await?;
    Ok(socket)
}

/// Runs the read/write loop until either side closes.
///
/// Returns the reason the connection ended.
pub async fn run_connection(
    socket: RigSocket,
    mut commands: mpsc::Receiver<Command>,
    panel: &ControlPanel,
    options: &RigOptions,
) -> String {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut acks = AckTracker::new(options.ack_timeout);
    let mut ping = ping_timer(options.ping_interval);

    loop {
        tokio::select! {
            // Command queued by the panel
            command = commands.recv() => {
                let Some(command) = command else {
                    return "command queue closed".to_string();
                };
                let ack_id = acks.register(&command);
                let packet = match wire::command_packet(&command, ack_id) {
                    Ok(packet) => packet,
                    Err(e) => {
                        tracing::error!(error = %e, kind = command.kind(), "dropping command");
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(Message::text(packet.encode())).await {
                    return format!("send failed: {e}");
                }
                tracing::debug!(
                    ack_id,
                    channel = %command.channel(),
                    kind = command.kind(),
                    "command sent"
                );
            }
            // Frame from the rig
            msg = ws_rx.next() => {
                let reaction = match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(text.as_str(), panel, &mut acks).await
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        Reaction::Close("closed by rig".to_string())
                    }
                    Some(Ok(_)) => Reaction::None,
                    Some(Err(e)) => Reaction::Close(format!("receive failed: {e}")),
                };
                match reaction {
                    Reaction::None => {}
                    Reaction::Reply(packet) => {
                        if let Err(e) = ws_tx.send(Message::text(packet.encode())).await {
                            return format!("send failed: {e}");
                        }
                    }
                    Reaction::Reschedule(period) => {
                        ping = ping_timer(period);
                    }
                    Reaction::Close(reason) => {
                        let _ = ws_tx.close().await;
                        return reason;
                    }
                }
            }
            // Keep-alive
            _ = ping.tick() => {
                acks.expire();
                if let Err(e) = ws_tx.send(Message::text(Packet::Ping.encode())).await {
                    return format!("ping failed: {e}");
                }
            }
        }
    }
}

/// What the loop should do after an inbound frame.
#[derive(Debug)]
enum Reaction {
    None,
    Reply(Packet),
    Reschedule(Duration),
    Close(String),
}

async fn handle_frame(frame: &str, panel: &ControlPanel, acks: &mut AckTracker) -> Reaction {
    let packet = match Packet::decode(frame) {
        Ok(packet) => packet,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed packet");
            return Reaction::None;
        }
    };

    match packet {
        Packet::Open(handshake) => {
            tracing::info!(
                sid = %handshake.sid,
                ping_interval_ms = handshake.ping_interval,
                "rig handshake"
            );
            panel
                .set_connection(ConnectionState::Connected {
                    sid: handshake.sid,
                })
                .await;
            if handshake.ping_interval > 0 {
                Reaction::Reschedule(Duration::from_millis(handshake.ping_interval))
            } else {
                Reaction::None
            }
        }
        Packet::Connect => {
            tracing::debug!("socket.io namespace connected");
            Reaction::None
        }
        Packet::Ping => Reaction::Reply(Packet::Pong),
        Packet::Pong | Packet::Noop => Reaction::None,
        Packet::Event { name, payload, .. } => {
            match wire::decode_push(&name, payload) {
                Ok(Some(event)) => {
                    tracing::trace!(channel = event.channel(), "push event");
                    panel.apply_push(event).await;
                }
                Ok(None) => tracing::debug!(%name, "ignoring unhandled event"),
                Err(e) => tracing::warn!(error = %e, "ignoring malformed event"),
            }
            Reaction::None
        }
        Packet::Ack { ack_id, payload } => {
            acks.resolve(ack_id, &wire::decode_ack(payload));
            Reaction::None
        }
        Packet::Error(reason) => {
            tracing::warn!(%reason, "rig reported an error");
            Reaction::None
        }
        Packet::Disconnect | Packet::Close => Reaction::Close("rig disconnected".to_string()),
    }
}

fn ping_timer(period: Duration) -> Interval {
    let period = period.max(Duration::from_millis(100));
    let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Command awaiting its ack.
#[derive(Debug, Clone, Copy)]
struct PendingAck {
    channel: Channel,
    kind: &'static str,
    sent_at: Instant,
}

/// Assigns ack ids and tracks outstanding acks.
///
/// Acks carry no required reaction: rejections and timeouts are only
/// logged.
#[derive(Debug)]
struct AckTracker {
    next_id: u64,
    timeout: Duration,
    pending: HashMap<u64, PendingAck>,
}

impl AckTracker {
    fn new(timeout: Duration) -> Self {
        Self {
            next_id: 1,
            timeout,
            pending: HashMap::new(),
        }
    }

    fn register(&mut self, command: &Command) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.insert(
            id,
            PendingAck {
                channel: command.channel(),
                kind: command.kind(),
                sent_at: Instant::now(),
            },
        );
        id
    }

    /// Resolves a pending ack. Returns `false` for unknown ids.
    fn resolve(&mut self, ack_id: u64, reply: &RigMessage) -> bool {
        let Some(pending) = self.pending.remove(&ack_id) else {
            tracing::debug!(ack_id, "ack for unknown or expired command");
            return false;
        };
        let text = reply.text.as_deref().unwrap_or_default();
        let elapsed_ms = u64::try_from(pending.sent_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        if reply.success {
            tracing::debug!(
                ack_id,
                channel = %pending.channel,
                kind = pending.kind,
                elapsed_ms,
                text,
                "command acknowledged"
            );
        } else {
            tracing::warn!(
                ack_id,
                channel = %pending.channel,
                kind = pending.kind,
                text,
                "command rejected by rig"
            );
        }
        true
    }

    /// Drops acks older than the timeout. Returns how many expired.
    fn expire(&mut self) -> usize {
        let timeout = self.timeout;
        let before = self.pending.len();
        self.pending.retain(|ack_id, pending| {
            let alive = pending.sent_at.elapsed() < timeout;
            if !alive {
                tracing::warn!(
                    ack_id,
                    channel = %pending.channel,
                    kind = pending.kind,
                    "no ack from rig"
                );
            }
            alive
        });
        before - self.pending.len()
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ok() -> RigMessage {
        RigMessage {
            success: true,
            text: Some("ok".to_string()),
        }
    }

    #[test]
    fn socket_url_targets_engine_io_v3() {
        let options = RigOptions {
            endpoint: "ws://rig.local:9099/".to_string(),
            ping_interval: Duration::from_secs(25),
            ack_timeout: Duration::from_secs(30),
        };
        assert_eq!(
            options.socket_url(),
            "ws://rig.local:9099/socket.io/?EIO=3&transport=websocket"
        );
    }

    #[test]
    fn ack_ids_increase() {
        let mut acks = AckTracker::new(Duration::from_secs(30));
        let a = acks.register(&Command::HomeXy);
        let b = acks.register(&Command::StopCapture);
        assert_eq!((a, b), (1, 2));
        assert_eq!(acks.pending(), 2);
    }

    #[test]
    fn resolve_removes_pending() {
        let mut acks = AckTracker::new(Duration::from_secs(30));
        let id = acks.register(&Command::HomeZ);
        assert!(acks.resolve(id, &ok()));
        assert!(!acks.resolve(id, &ok()));
        assert_eq!(acks.pending(), 0);
    }

    #[test]
    fn rejected_ack_is_still_resolved() {
        let mut acks = AckTracker::new(Duration::from_secs(30));
        let id = acks.register(&Command::StopCapture);
        let reply = RigMessage {
            success: false,
            text: Some("Bad steps".to_string()),
        };
        assert!(acks.resolve(id, &reply));
        assert_eq!(acks.pending(), 0);
    }

    #[test]
    fn expire_drops_stale_acks() {
        let mut acks = AckTracker::new(Duration::ZERO);
        acks.register(&Command::HomeXy);
        acks.register(&Command::HomeZ);
        assert_eq!(acks.expire(), 2);
        assert_eq!(acks.pending(), 0);
    }

    #[test]
    fn expire_keeps_fresh_acks() {
        let mut acks = AckTracker::new(Duration::from_secs(60));
        acks.register(&Command::HomeXy);
        assert_eq!(acks.expire(), 0);
        assert_eq!(acks.pending(), 1);
    }
}
