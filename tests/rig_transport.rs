//! End-to-end tests of the rig transport against a fake Socket.IO rig.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

use rig_panel::domain::{ConnectionState, EventBus, StepSize};
use rig_panel::rig::{self, Packet, RigOptions};
use rig_panel::service::{ControlPanel, PanelSnapshot};

const HANDSHAKE: &str =
    r#"0{"sid":"fake-sid","upgrades":[],"pingInterval":25000,"pingTimeout":60000}"#;

struct Harness {
    panel: Arc<ControlPanel>,
    rig: WebSocketStream<TcpStream>,
}

async fn start() -> Harness {
    start_with(HANDSHAKE).await
}

async fn start_with(handshake: &str) -> Harness {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind failed: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("no local addr: {e}"));

    let (tx, rx) = mpsc::channel(16);
    let panel = Arc::new(ControlPanel::new(tx, EventBus::new(64), None));
    let options = RigOptions {
        endpoint: format!("ws://{addr}"),
        ping_interval: Duration::from_secs(60),
        ack_timeout: Duration::from_secs(30),
    };
    let _task = rig::spawn(options, rx, Arc::clone(&panel));

    let (stream, _) = listener
        .accept()
        .await
        .unwrap_or_else(|e| panic!("accept failed: {e}"));
    let mut rig = accept_async(stream)
        .await
        .unwrap_or_else(|e| panic!("websocket handshake failed: {e}"));

    send(&mut rig, handshake).await;
    send(&mut rig, "40").await;

    Harness { panel, rig }
}

async fn send(rig: &mut WebSocketStream<TcpStream>, frame: &str) {
    rig.send(Message::text(frame))
        .await
        .unwrap_or_else(|e| panic!("rig send failed: {e}"));
}

/// Reads frames until the next Socket.IO event from the panel.
async fn next_event(rig: &mut WebSocketStream<TcpStream>) -> Packet {
    let read = async {
        while let Some(msg) = rig.next().await {
            let Ok(Message::Text(text)) = msg else {
                continue;
            };
            let Ok(packet) = Packet::decode(text.as_str()) else {
                panic!("panel sent an undecodable frame: {text}");
            };
            if matches!(packet, Packet::Event { .. }) {
                return packet;
            }
        }
        panic!("panel closed the connection");
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for a command"))
}

/// Polls the panel until `check` holds.
async fn wait_for(panel: &ControlPanel, check: impl Fn(&PanelSnapshot) -> bool) -> PanelSnapshot {
    let poll = async {
        loop {
            let snapshot = panel.snapshot().await;
            if check(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), poll)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for panel state"))
}

#[tokio::test]
async fn handshake_marks_panel_connected() {
    let harness = start().await;
    let snapshot = wait_for(&harness.panel, |s| s.connection.is_connected()).await;
    assert_eq!(
        snapshot.connection,
        ConnectionState::Connected {
            sid: "fake-sid".to_string()
        }
    );
}

#[tokio::test]
async fn commands_reach_the_rig_on_their_channel() {
    let mut harness = start().await;

    harness.panel.select_step(StepSize::Hundred).await;
    let Ok(control) = "xyleft".parse() else {
        panic!("xyleft should be a control");
    };
    if let Err(e) = harness.panel.press(control).await {
        panic!("jog failed: {e}");
    }
    let Packet::Event {
        ack_id,
        name,
        payload,
    } = next_event(&mut harness.rig).await
    else {
        panic!("expected event");
    };
    assert_eq!(name, "printer");
    assert_eq!(payload, json!({ "text": "move", "body": { "axis": "X", "mm": -100 } }));
    let Some(ack_id) = ack_id else {
        panic!("commands should request an ack");
    };
    send(
        &mut harness.rig,
        &format!(r#"43{ack_id}[{{"success":true,"text":"ok"}}]"#),
    )
    .await;

    if let Err(e) = harness.panel.start_capture("100", "50", "4") {
        panic!("start failed: {e}");
    }
    let Packet::Event { name, payload, .. } = next_event(&mut harness.rig).await else {
        panic!("expected event");
    };
    assert_eq!(name, "panorama");
    assert_eq!(
        payload,
        json!({ "text": "start", "body": { "width": 100, "height": 50, "step": 4 } })
    );

    if let Err(e) = harness.panel.home_xy() {
        panic!("home failed: {e}");
    }
    let Packet::Event { name, payload, .. } = next_event(&mut harness.rig).await else {
        panic!("expected event");
    };
    assert_eq!(name, "printer");
    assert_eq!(payload, json!({ "text": "homexy" }));
}

#[tokio::test]
async fn push_events_update_the_view() {
    let mut harness = start().await;

    send(&mut harness.rig, r#"42["log",{"success":true,"text":"first"}]"#).await;
    send(&mut harness.rig, r#"42["log",{"success":true,"text":"T"}]"#).await;
    send(&mut harness.rig, r#"42["webcam",{"success":true,"text":"old"}]"#).await;
    send(&mut harness.rig, r#"42["webcam",{"success":true,"text":"P"}]"#).await;

    let snapshot = wait_for(&harness.panel, |s| {
        s.image_src.as_deref() == Some("data:image/png;base64,P")
    })
    .await;
    assert_eq!(snapshot.log, "\nfirst\nT");
}

#[tokio::test]
async fn malformed_frames_are_ignored() {
    let mut harness = start().await;

    send(&mut harness.rig, "42not json").await;
    send(&mut harness.rig, r#"42["log",{"success":true}]"#).await;
    send(&mut harness.rig, r#"42["status",{"text":"ignored"}]"#).await;
    send(&mut harness.rig, r#"42["log",{"success":true,"text":"still alive"}]"#).await;

    let snapshot = wait_for(&harness.panel, |s| !s.log.is_empty()).await;
    assert_eq!(snapshot.log, "\nstill alive");
    assert!(snapshot.connection.is_connected());
}

#[tokio::test]
async fn rig_ping_is_answered_with_pong() {
    let mut harness = start().await;
    send(&mut harness.rig, "2").await;

    let read = async {
        while let Some(msg) = harness.rig.next().await {
            if let Ok(Message::Text(text)) = msg
                && text.as_str() == "3"
            {
                return;
            }
        }
        panic!("connection closed before pong");
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .unwrap_or_else(|_| panic!("no pong"));
}

#[tokio::test]
async fn panel_pings_at_the_handshake_interval() {
    // The configured interval is 60s; only the handshake's 200ms can fire in time.
    let mut harness = start_with(
        r#"0{"sid":"fast-sid","upgrades":[],"pingInterval":200,"pingTimeout":1000}"#,
    )
    .await;

    let read = async {
        while let Some(msg) = harness.rig.next().await {
            if let Ok(Message::Text(text)) = msg
                && text.as_str() == "2"
            {
                return;
            }
        }
        panic!("connection closed before ping");
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .unwrap_or_else(|_| panic!("panel never pinged"));
}

#[tokio::test]
async fn rig_close_marks_panel_disconnected() {
    let mut harness = start().await;
    wait_for(&harness.panel, |s| s.connection.is_connected()).await;

    if let Err(e) = harness.rig.close(None).await {
        panic!("close failed: {e}");
    }

    wait_for(&harness.panel, |s| {
        matches!(s.connection, ConnectionState::Disconnected { .. })
    })
    .await;

    // The queue is gone with the connection task.
    let closed = async {
        loop {
            if harness.panel.home_z().is_err() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), closed)
        .await
        .unwrap_or_else(|_| panic!("commands still accepted after disconnect"));
}

#[tokio::test]
async fn unreachable_rig_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind failed: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("no local addr: {e}"));
    drop(listener);

    let (tx, rx) = mpsc::channel(4);
    let panel = Arc::new(ControlPanel::new(tx, EventBus::new(8), None));
    let options = RigOptions {
        endpoint: format!("ws://{addr}"),
        ping_interval: Duration::from_secs(60),
        ack_timeout: Duration::from_secs(30),
    };
    let task = rig::spawn(options, rx, Arc::clone(&panel));
    if let Err(e) = task.await {
        panic!("rig task panicked: {e}");
    }

    let snapshot = panel.snapshot().await;
    assert!(matches!(
        snapshot.connection,
        ConnectionState::Disconnected { .. }
    ));
}
