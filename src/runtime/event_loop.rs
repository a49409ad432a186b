use std::fmt::Display;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, View};
use crate::catalog::{CatalogClient, SongId};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{MediaBackend, PlaybackController, PlaybackSnapshot, SessionState};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup;
use crate::ui;

/// Everything the loop drives, borrowed from `runtime::run`.
pub struct Services<'a, B: MediaBackend> {
    pub settings: &'a config::Settings,
    pub controller: &'a mut PlaybackController<B>,
    pub snapshots: &'a Receiver<PlaybackSnapshot>,
    pub catalog: &'a CatalogClient,
    pub mpris: &'a MprisHandle,
    pub control_rx: &'a Receiver<ControlCmd>,
}

/// What was last pushed to MPRIS, so it is only refreshed on change.
#[derive(Default)]
pub struct EventLoopState {
    last_mpris_track: Option<SongId>,
    last_mpris_state: SessionState,
    last_mpris_duration: u64,
}

impl EventLoopState {
    fn mpris_stale(&self, snapshot: &PlaybackSnapshot) -> bool {
        snapshot.track.as_ref().map(|t| t.id) != self.last_mpris_track
            || snapshot.state != self.last_mpris_state
            || snapshot.duration_ms != self.last_mpris_duration
    }

    fn mark_mpris(&mut self, snapshot: &PlaybackSnapshot) {
        self.last_mpris_track = snapshot.track.as_ref().map(|t| t.id);
        self.last_mpris_state = snapshot.state;
        self.last_mpris_duration = snapshot.duration_ms;
    }
}

/// Main terminal event loop: applies backend status, draws, and dispatches
/// input and MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    svc: &mut Services<'_, B>,
    state: &mut EventLoopState,
) -> Result<()> {
    loop {
        svc.controller.drain_status();
        while let Ok(snapshot) = svc.snapshots.try_recv() {
            app.apply_snapshot(snapshot);
        }

        if state.mpris_stale(&app.now_playing) {
            update_mpris(svc.mpris, app, &svc.settings.api.base_url);
            state.mark_mpris(&app.now_playing);
        }

        terminal.draw(|f| ui::draw(f, app, &svc.settings.ui, &svc.settings.controls))?;

        while let Ok(cmd) = svc.control_rx.try_recv() {
            if handle_control_cmd(cmd, app, svc) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, svc) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Log a failed action and show it on the status line.
fn report(app: &mut App, action: &str, err: impl Display) {
    warn!(action, error = %err, "action failed");
    app.set_status(format!("{action}: {err}"));
}

/// Open the selected track. A load failure reaches the status line through
/// the snapshot's `last_error`, so it is only logged here.
pub(super) fn open_selected<B: MediaBackend>(
    app: &mut App,
    controller: &mut PlaybackController<B>,
) {
    let Some(track) = app.selected_track() else {
        return;
    };
    app.clear_status();
    if let Err(e) = controller.open(track) {
        warn!(action = "open", error = %e, "action failed");
    }
}

fn toggle<B: MediaBackend>(app: &mut App, controller: &mut PlaybackController<B>) {
    if let Err(e) = controller.toggle_playback() {
        report(app, "play/pause", e);
    }
}

fn seek_by<B: MediaBackend>(app: &mut App, controller: &mut PlaybackController<B>, delta_ms: i64) {
    if let Err(e) = controller.seek_by(delta_ms) {
        report(app, "seek", e);
    }
}

fn handle_control_cmd<B: MediaBackend>(
    cmd: ControlCmd,
    app: &mut App,
    svc: &mut Services<'_, B>,
) -> bool {
    debug!(?cmd, "control command");
    let state = svc.controller.state();
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match state {
            SessionState::Paused => toggle(app, svc.controller),
            SessionState::Playing | SessionState::Loading => {}
            _ => open_selected(app, svc.controller),
        },
        ControlCmd::Pause => {
            if state == SessionState::Playing {
                toggle(app, svc.controller);
            }
        }
        ControlCmd::PlayPause => match state {
            SessionState::Playing | SessionState::Paused => toggle(app, svc.controller),
            SessionState::Loading => {}
            _ => open_selected(app, svc.controller),
        },
        ControlCmd::Stop => svc.controller.close(),
        ControlCmd::Next => {
            app.next();
            open_selected(app, svc.controller);
        }
        ControlCmd::Prev => {
            app.prev();
            open_selected(app, svc.controller);
        }
        ControlCmd::SeekBy(ms) => seek_by(app, svc.controller, ms),
    }
    false
}

fn handle_key_event<B: MediaBackend>(
    key: KeyEvent,
    app: &mut App,
    svc: &mut Services<'_, B>,
) -> bool {
    let scrub_ms = svc.settings.controls.scrub_seconds.saturating_mul(1000).min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Tab => app.cycle_view(),
        KeyCode::Esc => {
            if !app.back() {
                app.clear_status();
            }
        }
        KeyCode::Enter => {
            if app.view == View::Albums {
                open_album(app, svc.catalog);
            } else {
                open_selected(app, svc.controller);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => toggle(app, svc.controller),
        KeyCode::Char('L') => seek_by(app, svc.controller, scrub_ms),
        KeyCode::Char('H') => seek_by(app, svc.controller, -scrub_ms),
        KeyCode::Char('x') => svc.controller.close(),
        KeyCode::Char('f') => toggle_favorite(app, svc.catalog),
        KeyCode::Char('r') => match startup::refresh(svc.catalog, app) {
            Ok(()) => app.set_status("catalog refreshed"),
            Err(e) => report(app, "refresh", format!("{e:#}")),
        },
        _ => {}
    }
    false
}

fn open_album(app: &mut App, catalog: &CatalogClient) {
    let Some(album) = app.selected_album().cloned() else {
        return;
    };
    match catalog.album_music(album.id) {
        Ok(rows) => {
            app.clear_status();
            app.show_album(album, rows);
        }
        Err(e) => report(app, "open album", e),
    }
}

/// Flip the favorite flag of the selected track once the catalog accepts it.
fn toggle_favorite(app: &mut App, catalog: &CatalogClient) {
    let Some(track) = app.selected_track() else {
        return;
    };
    let favorite = !app.is_favorite(track.id);
    match catalog.set_favorite(track.id, favorite) {
        Ok(()) => {
            app.apply_favorite(track.id, favorite);
            app.set_status(if favorite {
                format!("added {:?} to favorites", track.title)
            } else {
                format!("removed {:?} from favorites", track.title)
            });
        }
        Err(e) => report(app, "favorite", e),
    }
}
