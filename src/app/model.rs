//! Application model types: `App` and `View`.
//!
//! `App` mirrors what the catalog returned (songs, favorites, albums), tracks
//! the cursor in the active view and keeps the latest playback snapshot
//! published by the controller.

use std::sync::Arc;

use crate::catalog::{Album, FavoriteSet, SongId, SongRow, Track};
use crate::playback::PlaybackSnapshot;

/// The list currently shown in the main pane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Favorites,
    Albums,
    /// Songs of the album in `App::open_album`.
    AlbumSongs,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Home => " music ",
            View::Favorites => " favorites ",
            View::Albums => " albums ",
            View::AlbumSongs => " album ",
        }
    }

    /// The next top-level tab. An open album counts as the albums tab.
    pub fn next_tab(self) -> View {
        match self {
            View::Home => View::Favorites,
            View::Favorites => View::Albums,
            View::Albums | View::AlbumSongs => View::Home,
        }
    }
}

#[derive(Default)]
pub struct App {
    pub library: Vec<Arc<Track>>,
    pub favorites: FavoriteSet,
    pub favorite_tracks: Vec<Arc<Track>>,
    pub albums: Vec<Album>,
    pub open_album: Option<Album>,
    pub album_tracks: Vec<Arc<Track>>,

    pub view: View,
    /// Cursor position within the active view.
    pub selected: usize,

    pub now_playing: PlaybackSnapshot,
    pub status_message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the song list.
    pub fn set_library(&mut self, tracks: Vec<Track>) {
        self.library = tracks.into_iter().map(Arc::new).collect();
        self.clamp_selection();
    }

    /// Replace favorites from `get_fave` rows.
    pub fn set_favorites(&mut self, rows: Vec<SongRow>) {
        self.favorites = FavoriteSet::from_rows(&rows);
        self.favorite_tracks = self.rows_to_tracks(rows);
        self.clamp_selection();
    }

    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.albums = albums;
        self.clamp_selection();
    }

    /// Show the songs of `album`.
    pub fn show_album(&mut self, album: Album, rows: Vec<SongRow>) {
        self.album_tracks = self.rows_to_tracks(rows);
        self.open_album = Some(album);
        self.view = View::AlbumSongs;
        self.selected = 0;
    }

    /// Prefer the library's copy of a song so every view shares one `Arc`.
    fn rows_to_tracks(&self, rows: Vec<SongRow>) -> Vec<Arc<Track>> {
        rows.into_iter()
            .filter_map(|row| {
                let id = row.song_id()?;
                self.library
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .or_else(|| row.into_track().map(Arc::new))
            })
            .collect()
    }

    /// Record a favorite change the backend has confirmed.
    pub fn apply_favorite(&mut self, song_id: SongId, favorite: bool) {
        if favorite {
            self.favorites.insert(song_id);
            if !self.favorite_tracks.iter().any(|t| t.id == song_id) {
                if let Some(t) = self.library.iter().find(|t| t.id == song_id) {
                    self.favorite_tracks.push(t.clone());
                }
            }
        } else {
            self.favorites.remove(song_id);
            self.favorite_tracks.retain(|t| t.id != song_id);
        }
        self.clamp_selection();
    }

    pub fn is_favorite(&self, song_id: SongId) -> bool {
        self.favorites.contains(song_id)
    }

    /// Tracks shown by the active view (empty for the album list).
    pub fn visible_tracks(&self) -> &[Arc<Track>] {
        match self.view {
            View::Home => &self.library,
            View::Favorites => &self.favorite_tracks,
            View::AlbumSongs => &self.album_tracks,
            View::Albums => &[],
        }
    }

    pub fn visible_len(&self) -> usize {
        match self.view {
            View::Albums => self.albums.len(),
            _ => self.visible_tracks().len(),
        }
    }

    pub fn selected_track(&self) -> Option<Arc<Track>> {
        self.visible_tracks().get(self.selected).cloned()
    }

    pub fn selected_album(&self) -> Option<&Album> {
        match self.view {
            View::Albums => self.albums.get(self.selected),
            _ => None,
        }
    }

    /// Move selection to the next row, wrapping around.
    pub fn next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous row, wrapping around.
    pub fn prev(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn cycle_view(&mut self) {
        self.switch_to(self.view.next_tab());
    }

    /// Leave an open album. Returns false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        if self.view == View::AlbumSongs {
            self.open_album = None;
            self.album_tracks.clear();
            self.switch_to(View::Albums);
            true
        } else {
            false
        }
    }

    fn switch_to(&mut self, view: View) {
        self.view = view;
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Take the latest snapshot from the controller; a new error becomes the
    /// status line.
    pub fn apply_snapshot(&mut self, snapshot: PlaybackSnapshot) {
        if snapshot.last_error.is_some() && snapshot.last_error != self.now_playing.last_error {
            self.status_message = snapshot.last_error.clone();
        }
        self.now_playing = snapshot;
    }

    pub fn is_now_playing(&self, song_id: SongId) -> bool {
        self.now_playing
            .track
            .as_ref()
            .is_some_and(|t| t.id == song_id)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
