//! Event types for the EmoTune event system
//!
//! Provides shared event definitions and the EventBus the workflow uses to
//! report transitions and user-visible notices to whatever front end is
//! attached (CLI printer, tests, a future GUI).

use crate::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Capture workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// No image
    #[default]
    Idle,
    /// Image accepted, not yet submitted
    Previewing,
    /// Waiting for the emotion endpoint (busy)
    Analyzing,
    /// Emotion known, waiting for songs (busy)
    Recommending,
    /// Terminal for this pass, success or reported failure
    Ready,
}

impl WorkflowPhase {
    /// Phases during which the busy flag is set
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowPhase::Analyzing | WorkflowPhase::Recommending)
    }
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// EmoTune client events
///
/// Serialized with a `type` tag so a front end can forward them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Workflow moved between phases
    PhaseChanged {
        old_phase: WorkflowPhase,
        new_phase: WorkflowPhase,
        /// Pass the transition belongs to
        generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// Message the user should see (replaces browser alerts)
    Notification {
        level: NoticeLevel,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Analysis finished with a recognized label
    EmotionDetected {
        generation: u64,
        emotion: Emotion,
        confidence: f64,
        timestamp: DateTime<Utc>,
    },

    /// Recommendation fetch finished
    RecommendationsReady {
        generation: u64,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A response arrived for a pass that is no longer current
    StaleResultDiscarded {
        generation: u64,
        current_generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// Player switched to a track
    TrackSelected {
        title: String,
        artist: String,
        embed_url: String,
        timestamp: DateTime<Utc>,
    },

    /// Camera stream acquired
    CameraOpened { timestamp: DateTime<Utc> },

    /// Camera stream released
    CameraReleased { timestamp: DateTime<Utc> },

    /// Login succeeded
    SessionStarted {
        user_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Logout completed (session email cleared, workflow reset)
    SessionEnded { timestamp: DateTime<Utc> },
}

/// Event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block the workflow)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use emotune_common::events::{ClientEvent, EventBus};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(ClientEvent::CameraOpened { timestamp: chrono::Utc::now() });
/// assert!(matches!(rx.try_recv(), Ok(ClientEvent::CameraOpened { .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ClientEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ClientEvent,
    ) -> Result<usize, broadcast::error::SendError<ClientEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }

    /// Emit a user-visible notice
    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit_lossy(ClientEvent::Notification {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
