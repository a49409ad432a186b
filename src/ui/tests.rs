use super::*;
use crate::catalog::Track;
use crate::config::{TrackDisplayField, UiSettings};
use crate::playback::{PlaybackSnapshot, SessionState};
use std::sync::Arc;

fn snapshot(position_ms: u64, duration_ms: u64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        track: Some(Arc::new(Track {
            id: 4,
            title: "Song".into(),
            artist: "Band".into(),
            duration: Some("3:00".into()),
            audio: "a.mp3".into(),
            thumbnail: None,
        })),
        position_ms,
        duration_ms,
        playing: true,
        state: SessionState::Playing,
        last_error: None,
    }
}

#[test]
fn time_text_uses_configured_fields() {
    let mut ui = UiSettings::default();
    assert_eq!(
        now_playing_time_text(&snapshot(42_000, 180_000), &ui).as_deref(),
        Some("0:42 / 3:00")
    );

    ui.now_playing_time_fields = vec![TimeField::Remaining];
    assert_eq!(
        now_playing_time_text(&snapshot(42_000, 180_000), &ui).as_deref(),
        Some("-2:18")
    );

    ui.now_playing_time_fields.clear();
    assert!(now_playing_time_text(&snapshot(0, 180_000), &ui).is_none());
}

#[test]
fn unknown_duration_shows_elapsed_only() {
    let ui = UiSettings::default();
    assert_eq!(
        now_playing_time_text(&snapshot(3_000, 1), &ui).as_deref(),
        Some("0:03")
    );
}

#[test]
fn now_playing_line_includes_state() {
    let mut ui = UiSettings::default();
    ui.now_playing_track_fields = vec![TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        now_playing_text(&snapshot(0, 180_000), &ui),
        "Song: Band - Song [0:00 / 3:00] • playing"
    );
    assert_eq!(now_playing_text(&PlaybackSnapshot::default(), &ui), "Stopped");
}

#[test]
fn controls_text_mentions_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.starts_with("[j/k] up/down"));
}
