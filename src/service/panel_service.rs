//! Control panel service: owns the view state and turns interactions
//! into rig commands.

use chrono::Utc;
use tokio::sync::{RwLock, mpsc};

use crate::domain::{
    CaptureRequest, Command, ConnectionState, Control, EventBus, Jog, JogDirection, LogConsole,
    PanelEvent, PushEvent, StepControl, StepSelector, StepSize, WebcamView,
};
use crate::error::PanelError;

/// Mutable view state of the panel.
#[derive(Debug)]
struct PanelState {
    step: StepSelector,
    console: LogConsole,
    webcam: WebcamView,
    connection: ConnectionState,
}

/// Point-in-time copy of everything the panel displays.
#[derive(Debug, Clone)]
pub struct PanelSnapshot {
    /// Active jog step.
    pub step: StepSize,
    /// Enabled state of the three step buttons.
    pub step_controls: [StepControl; 3],
    /// Log console text.
    pub log: String,
    /// Image source of the latest frame, if any.
    pub image_src: Option<String>,
    /// Rig connection state.
    pub connection: ConnectionState,
}

/// View-model of the control panel.
///
/// Owns the step selection, log console, webcam view and connection
/// state behind one lock, and the sending half of the command queue that
/// the rig connection task drains. Every view mutation publishes a
/// [`PanelEvent`] on the [`EventBus`].
#[derive(Debug)]
pub struct ControlPanel {
    state: RwLock<PanelState>,
    commands: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl ControlPanel {
    /// Creates a panel in its initial state (10 mm step, empty log, no
    /// frame, connecting).
    #[must_use]
    pub fn new(
        commands: mpsc::Sender<Command>,
        event_bus: EventBus,
        log_max_bytes: Option<usize>,
    ) -> Self {
        Self {
            state: RwLock::new(PanelState {
                step: StepSelector::new(),
                console: LogConsole::new(log_max_bytes),
                webcam: WebcamView::new(),
                connection: ConnectionState::Connecting,
            }),
            commands,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Presses a button.
    ///
    /// Returns the command sent to the rig, or `None` for step buttons,
    /// which only change local state.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the command cannot be queued.
    pub async fn press(&self, control: Control) -> Result<Option<Command>, PanelError> {
        match control {
            Control::Jog(direction) => self.jog(direction).await.map(Some),
            Control::HomeZ => self.send(Command::HomeZ).map(Some),
            Control::HomeXy => self.send(Command::HomeXy).map(Some),
            Control::Step(size) => {
                self.select_step(size).await;
                Ok(None)
            }
            Control::StopCapture => self.stop_capture().map(Some),
        }
    }

    /// Selects the jog step. Returns `true` if the selection changed;
    /// selecting the active step does nothing.
    pub async fn select_step(&self, size: StepSize) -> bool {
        let changed = self.state.write().await.step.select(size);
        if changed {
            tracing::info!(step = %size, "step size selected");
            let _ = self.event_bus.publish(PanelEvent::StepChanged {
                step_mm: size.millimeters(),
                timestamp: Utc::now(),
            });
        } else {
            tracing::debug!(step = %size, "step size already active");
        }
        changed
    }

    /// Returns the active jog step.
    pub async fn step(&self) -> StepSize {
        self.state.read().await.step.active()
    }

    /// Jogs one axis by the active step.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the command cannot be queued.
    pub async fn jog(&self, direction: JogDirection) -> Result<Command, PanelError> {
        let step = self.step().await;
        self.send(Command::Move(Jog::new(direction, step)))
    }

    /// Homes the Z axis.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the command cannot be queued.
    pub fn home_z(&self) -> Result<Command, PanelError> {
        self.send(Command::HomeZ)
    }

    /// Homes the X and Y axes.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the command cannot be queued.
    pub fn home_xy(&self) -> Result<Command, PanelError> {
        self.send(Command::HomeXy)
    }

    /// Starts a panorama capture from the raw capture form fields.
    ///
    /// Nothing is sent if a field is not an integer or is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidInput`] on bad input, or a transport
    /// error if the command cannot be queued.
    pub fn start_capture(
        &self,
        width: &str,
        height: &str,
        steps: &str,
    ) -> Result<Command, PanelError> {
        let request = CaptureRequest::parse(width, height, steps).inspect_err(|e| {
            tracing::warn!(error = %e, "capture form rejected");
        })?;
        self.send(Command::StartCapture(request))
    }

    /// Aborts the running panorama capture.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the command cannot be queued.
    pub fn stop_capture(&self) -> Result<Command, PanelError> {
        self.send(Command::StopCapture)
    }

    /// Renders a push event from the rig.
    pub async fn apply_push(&self, event: PushEvent) {
        let timestamp = Utc::now();
        let update = {
            let mut state = self.state.write().await;
            match event {
                PushEvent::Log { text } => {
                    state.console.append(&text);
                    PanelEvent::LogAppended { text, timestamp }
                }
                PushEvent::Webcam { frame } => {
                    state.webcam.replace(frame);
                    PanelEvent::FrameUpdated {
                        image_src: state.webcam.image_src().unwrap_or_default(),
                        timestamp,
                    }
                }
            }
        };
        let _ = self.event_bus.publish(update);
    }

    /// Records a change of the rig connection state.
    pub async fn set_connection(&self, connection: ConnectionState) {
        {
            let mut state = self.state.write().await;
            if state.connection == connection {
                return;
            }
            state.connection = connection.clone();
        }
        tracing::info!(?connection, "rig connection state changed");
        let _ = self.event_bus.publish(PanelEvent::ConnectionChanged {
            connection,
            timestamp: Utc::now(),
        });
    }

    /// Returns the current rig connection state.
    pub async fn connection(&self) -> ConnectionState {
        self.state.read().await.connection.clone()
    }

    /// Returns a copy of the current view.
    pub async fn snapshot(&self) -> PanelSnapshot {
        let state = self.state.read().await;
        PanelSnapshot {
            step: state.step.active(),
            step_controls: *state.step.controls(),
            log: state.console.content().to_string(),
            image_src: state.webcam.image_src(),
            connection: state.connection.clone(),
        }
    }

    /// Returns the decoded bytes of the latest webcam frame.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NoFrame`] before the first frame, or
    /// [`PanelError::Protocol`] if the frame is not valid base64.
    pub async fn latest_frame(&self) -> Result<Vec<u8>, PanelError> {
        self.state.read().await.webcam.decode()
    }

    fn send(&self, command: Command) -> Result<Command, PanelError> {
        self.commands.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PanelError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => PanelError::Disconnected,
        })?;
        tracing::info!(
            channel = %command.channel(),
            kind = command.kind(),
            "command queued"
        );
        Ok(command)
    }
}
