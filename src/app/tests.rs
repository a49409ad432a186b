use super::*;
use crate::catalog::{Album, SongRow, Track};
use crate::playback::{PlaybackSnapshot, SessionState};
use std::sync::Arc;

fn t(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "Artist".into(),
        duration: None,
        audio: format!("uploads/{id}.mp3"),
        thumbnail: None,
    }
}

fn fav_row(song_id: i64) -> SongRow {
    SongRow {
        song_id: Some(song_id),
        id: Some(song_id + 100),
        title: Some(format!("fav {song_id}")),
        ..SongRow::default()
    }
}

fn app_with_library() -> App {
    let mut app = App::new();
    app.set_library(vec![t(1, "Alpha"), t(2, "Beta"), t(3, "Gamma")]);
    app
}

#[test]
fn next_and_prev_wrap_around() {
    let mut app = app_with_library();
    assert_eq!(app.selected, 0);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected_track().unwrap().title, "Beta");
}

#[test]
fn navigation_on_empty_view_is_a_no_op() {
    let mut app = App::new();
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn favorites_reuse_library_tracks() {
    let mut app = app_with_library();
    app.set_favorites(vec![fav_row(2), fav_row(42)]);

    assert!(app.is_favorite(2));
    assert!(app.is_favorite(42));
    assert!(!app.is_favorite(1));

    assert_eq!(app.favorite_tracks.len(), 2);
    assert!(Arc::ptr_eq(&app.favorite_tracks[0], &app.library[1]));
    // Not in the library: built from the row itself.
    assert_eq!(app.favorite_tracks[1].title, "fav 42");
}

#[test]
fn apply_favorite_updates_set_and_list() {
    let mut app = app_with_library();
    app.apply_favorite(3, true);
    assert!(app.is_favorite(3));
    assert_eq!(app.favorite_tracks.len(), 1);

    app.apply_favorite(3, true);
    assert_eq!(app.favorite_tracks.len(), 1);

    app.view = View::Favorites;
    app.selected = 0;
    app.apply_favorite(3, false);
    assert!(!app.is_favorite(3));
    assert!(app.favorite_tracks.is_empty());
    assert_eq!(app.selected, 0);
}

#[test]
fn views_cycle_and_album_back_navigation() {
    let mut app = app_with_library();
    app.set_albums(vec![Album {
        id: 7,
        name: "Road trip".into(),
        thumbnail: None,
    }]);

    app.next();
    app.cycle_view();
    assert_eq!(app.view, View::Favorites);
    assert_eq!(app.selected, 0);
    app.cycle_view();
    assert_eq!(app.view, View::Albums);
    assert_eq!(app.visible_len(), 1);
    assert_eq!(app.selected_album().unwrap().id, 7);
    assert!(app.selected_track().is_none());

    let album = app.selected_album().cloned().unwrap();
    app.show_album(album, vec![fav_row(1)]);
    assert_eq!(app.view, View::AlbumSongs);
    assert_eq!(app.selected_track().unwrap().id, 1);

    assert!(app.back());
    assert_eq!(app.view, View::Albums);
    assert!(app.open_album.is_none());
    assert!(!app.back());

    app.cycle_view();
    assert_eq!(app.view, View::Home);
}

#[test]
fn selection_is_clamped_when_list_shrinks() {
    let mut app = app_with_library();
    app.selected = 2;
    app.set_library(vec![t(1, "Alpha")]);
    assert_eq!(app.selected, 0);
}

#[test]
fn apply_snapshot_surfaces_new_errors_once() {
    let mut app = app_with_library();
    let track = app.library[0].clone();

    app.apply_snapshot(PlaybackSnapshot {
        track: Some(track),
        state: SessionState::Playing,
        playing: true,
        ..PlaybackSnapshot::default()
    });
    assert!(app.is_now_playing(1));
    assert!(!app.is_now_playing(2));
    assert!(app.status_message.is_none());

    let failed = PlaybackSnapshot {
        last_error: Some("failed to load".into()),
        ..PlaybackSnapshot::default()
    };
    app.apply_snapshot(failed.clone());
    assert_eq!(app.status_message.as_deref(), Some("failed to load"));
    assert!(!app.is_now_playing(1));

    app.clear_status();
    app.apply_snapshot(failed);
    assert!(app.status_message.is_none());
}
