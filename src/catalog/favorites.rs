//! Local mirror of the user's favorites.
//!
//! The set is rebuilt from `get_fave` rows and only changes after the
//! backend confirms an `add_fave` / `remove_fave` call.

use std::collections::HashSet;

use super::model::{SongId, SongRow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: HashSet<SongId>,
}

impl FavoriteSet {
    /// Build the set from `get_fave` rows, skipping rows with no identifier.
    pub fn from_rows(rows: &[SongRow]) -> Self {
        Self {
            ids: rows.iter().filter_map(SongRow::song_id).collect(),
        }
    }

    pub fn contains(&self, id: SongId) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: SongId) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: SongId) {
        self.ids.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
