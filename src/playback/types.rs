//! Playback session types shared by the controller, its backends and the UI.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::catalog::Track;

/// Duration reported before the real one is known. Never zero, so ratio
/// calculations in the UI cannot divide by zero.
pub const SENTINEL_DURATION_MS: u64 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No handle.
    #[default]
    Idle,
    /// Handle requested, not yet reported ready.
    Loading,
    Playing,
    Paused,
    /// The track played to the end. Published once, then `Idle`.
    Finished,
    /// Explicitly stopped. Published once, then `Idle`.
    Closed,
}

impl SessionState {
    /// True for the states in which a handle is live and controllable.
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
            SessionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Identifies the handle a status tick came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

/// One asynchronous status notification from a media handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTick {
    pub position_ms: u64,
    /// `None` until the backend knows the length of the resource.
    pub duration_ms: Option<u64>,
    pub is_playing: bool,
    pub is_loaded: bool,
    pub did_just_finish: bool,
    pub error: Option<String>,
    /// Transport commands (play, pause, seek) the handle had applied when
    /// this tick was sampled.
    pub transport: u64,
}

#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub handle: HandleId,
    pub tick: StatusTick,
}

pub type StatusSender = Sender<StatusEvent>;

/// Immutable view of the session, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub track: Option<Arc<Track>>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub playing: bool,
    pub state: SessionState,
    /// Most recent failure surfaced by the session (load or playback error).
    pub last_error: Option<String>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            track: None,
            position_ms: 0,
            duration_ms: SENTINEL_DURATION_MS,
            playing: false,
            state: SessionState::Idle,
            last_error: None,
        }
    }
}

impl PlaybackSnapshot {
    /// Position as a fraction of the duration, clamped to `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        let duration = self.duration_ms.max(SENTINEL_DURATION_MS) as f64;
        (self.position_ms as f64 / duration).clamp(0.0, 1.0)
    }

    /// True once a real duration has been reported.
    pub fn duration_known(&self) -> bool {
        self.duration_ms > SENTINEL_DURATION_MS
    }
}
