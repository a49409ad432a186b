use anyhow::{Context, Result};
use tracing::info;

use crate::app::{App, View};
use crate::catalog::CatalogClient;

/// Fetch songs, favorites and albums into `app`.
///
/// Songs load first so favorites and album rows can share their `Arc`s.
pub fn load_catalog(client: &CatalogClient, app: &mut App) -> Result<()> {
    let songs = client.my_music().context("loading songs")?;
    app.set_library(songs);

    let favorites = client.favorites().context("loading favorites")?;
    app.set_favorites(favorites);

    let albums = client.albums().context("loading albums")?;
    app.set_albums(albums);

    info!(
        endpoint = client.endpoint_url(),
        songs = app.library.len(),
        favorites = app.favorites.len(),
        albums = app.albums.len(),
        "catalog loaded"
    );
    Ok(())
}

/// Reload everything, including the songs of the open album.
pub fn refresh(client: &CatalogClient, app: &mut App) -> Result<()> {
    load_catalog(client, app)?;
    if let (View::AlbumSongs, Some(album)) = (app.view, app.open_album.clone()) {
        let rows = client
            .album_music(album.id)
            .with_context(|| format!("loading album {}", album.name))?;
        let selected = app.selected;
        app.show_album(album, rows);
        app.selected = selected.min(app.visible_len().saturating_sub(1));
    }
    Ok(())
}
