//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, View};
use crate::catalog::{Track, display_from_fields, format_millis};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::playback::{PlaybackSnapshot, SessionState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play / open album");
    map.insert("space/p", "play/pause");
    // H/L is filled dynamically from config.
    map.insert("x", "stop");
    map.insert("f", "favorite");
    map.insert("tab", "next view");
    map.insert("esc", "back");
    map.insert("r", "refresh");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "enter", "space/p", "H/L", "x", "f", "tab", "esc", "r", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
///
/// Total and remaining are omitted until the backend has reported a duration.
pub(crate) fn now_playing_time_text(snapshot: &PlaybackSnapshot, ui: &UiSettings) -> Option<String> {
    let known = snapshot.duration_known();
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_millis(snapshot.position_ms)),
            TimeField::Total if known => Some(format_millis(snapshot.duration_ms)),
            TimeField::Remaining if known => Some(format!(
                "-{}",
                format_millis(snapshot.duration_ms.saturating_sub(snapshot.position_ms))
            )),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// One line describing the session, e.g. `Song: Title - Artist [0:42 / 3:00] • playing`.
pub(crate) fn now_playing_text(snapshot: &PlaybackSnapshot, ui: &UiSettings) -> String {
    let Some(track) = snapshot.track.as_deref() else {
        return "Stopped".to_string();
    };
    let song = display_from_fields(
        track,
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    );
    let song = match now_playing_time_text(snapshot, ui) {
        Some(time) => format!("Song: {} [{}]", song, time),
        None => format!("Song: {}", song),
    };
    format!("{} • {}", song, snapshot.state)
}

fn track_row(app: &App, track: &Track, ui: &UiSettings) -> ListItem<'static> {
    let fav = if app.is_favorite(track.id) { "★ " } else { "  " };
    let text = format!(
        "{}{}",
        fav,
        display_from_fields(track, &ui.list_fields, &ui.list_separator)
    );
    if app.is_now_playing(track.id) {
        ListItem::new(text).style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        ListItem::new(text)
    }
}

fn list_title(app: &App) -> String {
    match (app.view, &app.open_album) {
        (View::AlbumSongs, Some(album)) => format!(" album: {} ", album.name),
        (view, _) => view.title().to_string(),
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Main list. Only the visible window is turned into ListItems.
    {
        let total = app.visible_len();
        let list_height = chunks[1].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = if app.view == View::Albums {
            app.albums[start..end]
                .iter()
                .map(|a| ListItem::new(format!("  {}", a.name)))
                .collect()
        } else {
            app.visible_tracks()[start..end]
                .iter()
                .map(|t| track_row(app, t, ui_settings))
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title(app)))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Now playing
    let snapshot = &app.now_playing;
    let np = Paragraph::new(now_playing_text(snapshot, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    let np = if snapshot.state == SessionState::Loading {
        np.slow_blink()
    } else {
        np
    };
    frame.render_widget(np, chunks[2]);

    // Progress plus the status line
    let status = app.status_message.as_deref().unwrap_or("");
    let gauge = Gauge::default()
        .block(Block::bordered().title(format!(" {} ", status)))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(snapshot.progress_ratio());
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests;
