//! The playback session controller.
//!
//! Owns at most one media handle. Every operation is a blocking call made by
//! the owner; asynchronous status arrives from the handle over a channel and
//! is applied by `drain_status`. Ticks from handles that were already
//! released are discarded, so only the most recent `open` can affect state.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, trace, warn};

use crate::catalog::Track;

use super::backend::{MediaBackend, MediaHandle};
use super::error::{PlaybackError, Result};
use super::resource::resolve_media;
use super::types::{
    HandleId, PlaybackSnapshot, SENTINEL_DURATION_MS, SessionState, StatusEvent, StatusSender,
    StatusTick,
};

pub struct PlaybackController<B: MediaBackend> {
    backend: B,
    base_url: String,
    autoplay: bool,

    handle: Option<(HandleId, B::Handle)>,
    next_id: u64,

    track: Option<Arc<Track>>,
    position_ms: u64,
    duration_ms: u64,
    playing: bool,
    state: SessionState,
    last_error: Option<String>,
    /// Transport commands applied to the current handle. Ticks sampled
    /// before the latest one are stale.
    transport: u64,

    status_tx: StatusSender,
    status_rx: Receiver<StatusEvent>,
    subscribers: Vec<Sender<PlaybackSnapshot>>,
}

impl<B: MediaBackend> PlaybackController<B> {
    /// Create an idle controller. Track audio references are resolved
    /// against `base_url`.
    pub fn new(backend: B, base_url: impl Into<String>, autoplay: bool) -> Self {
        let (status_tx, status_rx) = mpsc::channel::<StatusEvent>();
        Self {
            backend,
            base_url: base_url.into(),
            autoplay,
            handle: None,
            next_id: 0,
            track: None,
            position_ms: 0,
            duration_ms: SENTINEL_DURATION_MS,
            playing: false,
            state: SessionState::Idle,
            last_error: None,
            transport: 0,
            status_tx,
            status_rx,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn active_handle(&self) -> Option<HandleId> {
        self.handle.as_ref().map(|(id, _)| *id)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            track: self.track.clone(),
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            playing: self.playing,
            state: self.state,
            last_error: self.last_error.clone(),
        }
    }

    /// Subscribe to snapshots. The current snapshot is delivered immediately,
    /// then one per change. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<PlaybackSnapshot> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Sender on which handles deliver their status ticks.
    #[cfg(test)]
    pub(crate) fn status_sender(&self) -> StatusSender {
        self.status_tx.clone()
    }

    /// Replace any current session with one for `track` and start loading it.
    ///
    /// The previous handle is stopped and unloaded before the new one is
    /// requested. On failure the controller is back in `Idle` with the
    /// error recorded in `last_error`.
    pub fn open(&mut self, track: Arc<Track>) -> Result<()> {
        self.release_handle();

        let id = self.allocate_id();
        self.track = Some(track.clone());
        self.position_ms = 0;
        self.duration_ms = SENTINEL_DURATION_MS;
        self.playing = false;
        self.last_error = None;
        self.transport = 0;
        self.state = SessionState::Loading;
        self.publish();

        let source = match resolve_media(&self.base_url, &track.audio) {
            Ok(s) => s,
            Err(e) => return Err(self.fail_load(e)),
        };
        info!(track_id = track.id, handle = id.0, %source, "opening track");

        match self
            .backend
            .load(id, &source, self.autoplay, self.status_tx.clone())
        {
            Ok((handle, initial)) => {
                self.handle = Some((id, handle));
                if let Some(reason) = initial.error {
                    self.release_handle();
                    return Err(self.fail_load(PlaybackError::load(source.to_string(), reason)));
                }
                self.apply_tick(initial);
                Ok(())
            }
            Err(e) => Err(self.fail_load(e)),
        }
    }

    /// Flip between `Playing` and `Paused`. Returns the new state.
    pub fn toggle_playback(&mut self) -> Result<SessionState> {
        self.drain_status();
        let state = self.state;
        let Some((_, handle)) = self.handle.as_mut() else {
            return Err(PlaybackError::InvalidState {
                operation: "toggle playback",
                state,
            });
        };

        match state {
            SessionState::Playing => {
                handle.pause()?;
                self.state = SessionState::Paused;
                self.playing = false;
            }
            SessionState::Paused => {
                handle.play()?;
                self.state = SessionState::Playing;
                self.playing = true;
            }
            _ => {
                return Err(PlaybackError::InvalidState {
                    operation: "toggle playback",
                    state,
                });
            }
        }

        self.transport += 1;
        debug!(state = %self.state, "toggled playback");
        self.publish();
        Ok(self.state)
    }

    /// Move to `position_ms`, clamped into `[0, duration]`. Returns the
    /// clamped position. Until the duration is known only the lower bound
    /// applies.
    ///
    /// The reported position changes immediately. If the handle refuses, the
    /// error is returned and the next status tick restores the real position.
    pub fn seek(&mut self, position_ms: i64) -> Result<u64> {
        self.drain_status();
        if self.handle.is_none() || !self.state.is_active() {
            return Err(PlaybackError::InvalidState {
                operation: "seek",
                state: self.state,
            });
        }

        let max = if self.duration_ms > SENTINEL_DURATION_MS {
            i64::try_from(self.duration_ms).unwrap_or(i64::MAX)
        } else {
            i64::MAX
        };
        let target = position_ms.clamp(0, max) as u64;
        self.position_ms = target;
        self.publish();

        if let Some((id, handle)) = self.handle.as_mut() {
            if let Err(e) = handle.seek(target) {
                warn!(handle = id.0, target, error = %e, "seek failed");
                return Err(e);
            }
            self.transport += 1;
        }
        Ok(target)
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_ms: i64) -> Result<u64> {
        let current = i64::try_from(self.position_ms).unwrap_or(i64::MAX);
        self.seek(current.saturating_add(delta_ms))
    }

    /// Stop and release the handle and reset the session. No-op when idle.
    pub fn close(&mut self) {
        if self.handle.is_none() && self.state == SessionState::Idle {
            return;
        }
        info!("closing playback session");
        self.end_session(SessionState::Closed);
    }

    /// Apply every status tick queued so far. Returns how many were read.
    pub fn drain_status(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.status_rx.try_recv() {
            self.handle_status(event);
            n += 1;
        }
        n
    }

    /// Apply one status event; events from released handles are ignored.
    pub fn handle_status(&mut self, event: StatusEvent) {
        if self.active_handle() != Some(event.handle) {
            trace!(handle = event.handle.0, "ignoring tick from released handle");
            return;
        }
        self.apply_tick(event.tick);
    }

    fn apply_tick(&mut self, tick: StatusTick) {
        if let Some(err) = tick.error {
            warn!(error = %err, state = %self.state, "media handle reported an error");
            self.release_handle();
            self.reset_session();
            self.last_error = Some(err);
            self.publish();
            return;
        }

        if !tick.is_loaded {
            return;
        }

        if tick.transport < self.transport && !tick.did_just_finish {
            trace!(
                sampled = tick.transport,
                current = self.transport,
                "ignoring tick sampled before the last transport command"
            );
            return;
        }

        if let Some(d) = tick.duration_ms.filter(|&d| d > 0) {
            self.duration_ms = d.max(SENTINEL_DURATION_MS);
        }
        self.position_ms = if self.duration_ms > SENTINEL_DURATION_MS {
            tick.position_ms.min(self.duration_ms)
        } else {
            tick.position_ms
        };

        if tick.did_just_finish {
            debug!("track finished");
            self.end_session(SessionState::Finished);
            return;
        }

        self.state = match self.state {
            SessionState::Loading if tick.is_playing || self.autoplay => SessionState::Playing,
            SessionState::Loading => SessionState::Paused,
            SessionState::Playing | SessionState::Paused if tick.is_playing => {
                SessionState::Playing
            }
            SessionState::Playing | SessionState::Paused => SessionState::Paused,
            other => other,
        };
        self.playing = self.state == SessionState::Playing;
        self.publish();
    }

    /// Release the handle, publish `reason`, then publish the reset `Idle`.
    fn end_session(&mut self, reason: SessionState) {
        self.release_handle();
        self.state = reason;
        self.playing = false;
        self.publish();
        self.reset_session();
        self.publish();
    }

    fn fail_load(&mut self, err: PlaybackError) -> PlaybackError {
        warn!(error = %err, "load failed");
        self.release_handle();
        self.reset_session();
        self.last_error = Some(err.to_string());
        self.publish();
        err
    }

    fn reset_session(&mut self) {
        self.track = None;
        self.position_ms = 0;
        self.duration_ms = SENTINEL_DURATION_MS;
        self.playing = false;
        self.state = SessionState::Idle;
    }

    fn release_handle(&mut self) {
        if let Some((id, mut handle)) = self.handle.take() {
            debug!(handle = id.0, "releasing media handle");
            if let Err(e) = handle.stop() {
                warn!(handle = id.0, error = %e, "stop failed during release");
            }
            if let Err(e) = handle.unload() {
                warn!(handle = id.0, error = %e, "unload failed during release");
            }
        }
    }

    fn allocate_id(&mut self) -> HandleId {
        self.next_id += 1;
        HandleId(self.next_id)
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl<B: MediaBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.release_handle();
    }
}
