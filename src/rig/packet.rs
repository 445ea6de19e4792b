//! Engine.IO v3 / Socket.IO text packet codec.
//!
//! The rig speaks Socket.IO over a plain WebSocket. Every WebSocket text
//! frame carries exactly one packet:
//!
//! ```text
//! 0{"sid":"..","pingInterval":25000,..}   open (handshake)
//! 1                                       close
//! 2 / 3                                   ping / pong
//! 40 / 41                                 connect / disconnect
//! 42["log",{"text":"Done."}]              event
//! 4217["printer",{"text":"homexy"}]       event expecting ack 17
//! 4317[{"success":true,"text":"ok"}]      ack 17
//! 44"reason"                              error
//! 6                                       noop
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PanelError;

/// Handshake sent by the rig in the Engine.IO open packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Session id.
    pub sid: String,
    /// Transport upgrades offered (unused over a raw WebSocket).
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Interval between pings, in milliseconds.
    #[serde(default)]
    pub ping_interval: u64,
    /// Time without a ping after which the peer is considered gone.
    #[serde(default)]
    pub ping_timeout: u64,
}

/// A decoded Socket.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO open.
    Open(Handshake),
    /// Engine.IO close.
    Close,
    /// Engine.IO ping.
    Ping,
    /// Engine.IO pong.
    Pong,
    /// Engine.IO noop.
    Noop,
    /// Socket.IO connect on the default namespace.
    Connect,
    /// Socket.IO disconnect.
    Disconnect,
    /// Named event with a single payload.
    Event {
        /// Ack id requested by the sender, if any.
        ack_id: Option<u64>,
        /// Event name (the channel).
        name: String,
        /// Event payload; `Null` when absent.
        payload: Value,
    },
    /// Acknowledgement of a previously sent event.
    Ack {
        /// Ack id being answered.
        ack_id: u64,
        /// First ack argument; `Null` when absent.
        payload: Value,
    },
    /// Socket.IO error.
    Error(String),
}

impl Packet {
    /// Decodes one WebSocket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Protocol`] for empty frames, unknown packet
    /// types, or malformed JSON bodies.
    pub fn decode(frame: &str) -> Result<Self, PanelError> {
        let mut chars = frame.chars();
        let Some(kind) = chars.next() else {
            return Err(PanelError::Protocol("empty frame".to_string()));
        };
        let rest = chars.as_str();
        match kind {
            '0' => serde_json::from_str(rest)
                .map(Self::Open)
                .map_err(|e| PanelError::Protocol(format!("bad handshake: {e}"))),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => decode_message(rest),
            '6' => Ok(Self::Noop),
            other => Err(PanelError::Protocol(format!(
                "unknown engine.io packet type {other:?}"
            ))),
        }
    }

    /// Encodes the packet as a WebSocket text frame.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => format!(
                "0{}",
                serde_json::to_value(handshake).unwrap_or(Value::Null)
            ),
            Self::Close => "1".to_string(),
            Self::Ping => "2".to_string(),
            Self::Pong => "3".to_string(),
            Self::Noop => "6".to_string(),
            Self::Connect => "40".to_string(),
            Self::Disconnect => "41".to_string(),
            Self::Event {
                ack_id,
                name,
                payload,
            } => {
                let id = ack_id.map(|id| id.to_string()).unwrap_or_default();
                let args = Value::Array(vec![Value::from(name.as_str()), payload.clone()]);
                format!("42{id}{args}")
            }
            Self::Ack { ack_id, payload } => {
                format!("43{ack_id}{}", Value::Array(vec![payload.clone()]))
            }
            Self::Error(reason) => format!("44{}", Value::from(reason.as_str())),
        }
    }
}

fn decode_message(body: &str) -> Result<Packet, PanelError> {
    let mut chars = body.chars();
    let Some(kind) = chars.next() else {
        return Err(PanelError::Protocol("missing socket.io packet type".to_string()));
    };
    let rest = chars.as_str();
    match kind {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => {
            let (ack_id, args) = split_ack_id(rest)?;
            let mut args = parse_args(args)?.into_iter();
            let Some(Value::String(name)) = args.next() else {
                return Err(PanelError::Protocol("event without a name".to_string()));
            };
            Ok(Packet::Event {
                ack_id,
                name,
                payload: args.next().unwrap_or(Value::Null),
            })
        }
        '3' => {
            let (ack_id, args) = split_ack_id(rest)?;
            let Some(ack_id) = ack_id else {
                return Err(PanelError::Protocol("ack without an id".to_string()));
            };
            Ok(Packet::Ack {
                ack_id,
                payload: parse_args(args)?.into_iter().next().unwrap_or(Value::Null),
            })
        }
        '4' => Ok(Packet::Error(
            serde_json::from_str::<String>(rest).unwrap_or_else(|_| rest.to_string()),
        )),
        other => Err(PanelError::Protocol(format!(
            "unknown socket.io packet type {other:?}"
        ))),
    }
}

/// Splits the optional decimal ack id off the front of a packet body.
fn split_ack_id(body: &str) -> Result<(Option<u64>, &str), PanelError> {
    let end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let Some((digits, rest)) = body.split_at_checked(end) else {
        return Err(PanelError::Protocol("bad ack id".to_string()));
    };
    if digits.is_empty() {
        return Ok((None, rest));
    }
    digits
        .parse()
        .map(|id| (Some(id), rest))
        .map_err(|e| PanelError::Protocol(format!("bad ack id {digits:?}: {e}")))
}

fn parse_args(json: &str) -> Result<Vec<Value>, PanelError> {
    serde_json::from_str(json)
        .map_err(|e| PanelError::Protocol(format!("bad packet arguments: {e}")))
}
