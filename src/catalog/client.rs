//! Blocking client for the catalog's JSON action endpoint.
//!
//! Every call is a `POST` of `{"action": ..., ...params}` to one endpoint;
//! the reply is `{"resultCode", "data"?, "resultMessage"?}` where a code of
//! 200 means success. Uploads go to the same endpoint as multipart form data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ApiSettings;

use super::address::join_base;
use super::error::{CatalogError, Result};
use super::model::{Album, AlbumId, SongId, SongRow, Track};

pub const RESULT_OK: i64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    GetMyMusic,
    GetFave,
    AddFave { song_id: SongId },
    RemoveFave { song_id: SongId },
    GetAllAlbum,
    AddAlbum { name: String },
    AddToAlbum { song_id: SongId, album_id: AlbumId },
    RemoveFromAlbum { song_id: SongId, album_id: AlbumId },
    GetAlbumMusic { id: AlbumId },
}

impl ApiRequest {
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::GetMyMusic => "get_my_music",
            ApiRequest::GetFave => "get_fave",
            ApiRequest::AddFave { .. } => "add_fave",
            ApiRequest::RemoveFave { .. } => "remove_fave",
            ApiRequest::GetAllAlbum => "get_all_album",
            ApiRequest::AddAlbum { .. } => "add_album",
            ApiRequest::AddToAlbum { .. } => "add_to_album",
            ApiRequest::RemoveFromAlbum { .. } => "remove_from_album",
            ApiRequest::GetAlbumMusic { .. } => "get_album_music",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "resultCode")]
    pub result_code: i64,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(rename = "resultMessage", default)]
    pub result_message: Option<String>,
}

impl ApiResponse {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))
    }

    /// Return the `data` payload, or `Rejected` when `resultCode != 200`.
    pub fn into_result(self) -> Result<Option<serde_json::Value>> {
        if self.result_code == RESULT_OK {
            Ok(self.data)
        } else {
            Err(CatalogError::Rejected {
                code: self.result_code,
                message: self
                    .result_message
                    .unwrap_or_else(|| "Something went wrong.".to_string()),
            })
        }
    }

    /// Decode `data` as `T`; a missing or `null` payload becomes `T::default()`.
    pub fn data_as<T: DeserializeOwned + Default>(self) -> Result<T> {
        match self.into_result()? {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(v) => serde_json::from_value(v).map_err(|e| CatalogError::Decode(e.to_string())),
        }
    }
}

/// Form fields for `upload_music`.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub artist: String,
    pub audio: PathBuf,
    pub thumbnail: Option<PathBuf>,
}

impl UploadRequest {
    /// Title, artist and an existing audio file are required.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() {
            return Err(CatalogError::InvalidRequest(
                "title, artist and audio file are required".to_string(),
            ));
        }
        if !self.audio.is_file() {
            return Err(CatalogError::InvalidRequest(format!(
                "audio file {} does not exist",
                self.audio.display()
            )));
        }
        if let Some(thumb) = &self.thumbnail {
            if !thumb.is_file() {
                return Err(CatalogError::InvalidRequest(format!(
                    "thumbnail {} does not exist",
                    thumb.display()
                )));
            }
        }
        Ok(())
    }

    fn to_form(&self) -> Result<multipart::Form> {
        let audio = multipart::Part::file(&self.audio)?
            .file_name(file_name_or(&self.audio, "audio.mp3"))
            .mime_str("audio/mpeg")?;

        let mut form = multipart::Form::new()
            .text("action", "upload_music")
            .text("title", self.title.trim().to_string())
            .text("artist", self.artist.trim().to_string())
            .part("audio", audio);

        if let Some(thumb) = &self.thumbnail {
            let part = multipart::Part::file(thumb)?
                .file_name("thumb.jpg")
                .mime_str("image/jpeg")?;
            form = form.part("thumbnail", part);
        }
        Ok(form)
    }
}

fn file_name_or(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub struct CatalogClient {
    http: Client,
    endpoint_url: String,
}

impl CatalogClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("playdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint_url: join_base(&settings.base_url, &settings.endpoint),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn call(&self, request: &ApiRequest) -> Result<ApiResponse> {
        debug!(action = request.action(), url = %self.endpoint_url, "catalog request");
        let body = self
            .http
            .post(&self.endpoint_url)
            .json(request)
            .send()?
            .error_for_status()?
            .text()?;
        ApiResponse::parse(&body)
    }

    fn fetch<T: DeserializeOwned + Default>(&self, request: ApiRequest) -> Result<T> {
        self.call(&request)?.data_as()
    }

    fn submit(&self, request: ApiRequest) -> Result<()> {
        let action = request.action();
        self.call(&request)?.into_result().map(|_| ()).inspect_err(|e| {
            warn!(action, error = %e, "catalog action failed");
        })
    }

    /// All songs. Rows that do not parse as a `Track` are skipped.
    pub fn my_music(&self) -> Result<Vec<Track>> {
        let rows: Vec<serde_json::Value> = self.fetch(ApiRequest::GetMyMusic)?;
        let total = rows.len();
        let tracks: Vec<Track> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Track>(row) {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(error = %e, "skipping malformed song row");
                    None
                }
            })
            .collect();
        debug!(total, kept = tracks.len(), "loaded music list");
        Ok(tracks)
    }

    pub fn favorites(&self) -> Result<Vec<SongRow>> {
        self.fetch(ApiRequest::GetFave)
    }

    pub fn add_favorite(&self, song_id: SongId) -> Result<()> {
        self.submit(ApiRequest::AddFave { song_id })
    }

    pub fn remove_favorite(&self, song_id: SongId) -> Result<()> {
        self.submit(ApiRequest::RemoveFave { song_id })
    }

    /// Add or remove a favorite depending on `favorite`.
    pub fn set_favorite(&self, song_id: SongId, favorite: bool) -> Result<()> {
        if favorite {
            self.add_favorite(song_id)
        } else {
            self.remove_favorite(song_id)
        }
    }

    pub fn albums(&self) -> Result<Vec<Album>> {
        self.fetch(ApiRequest::GetAllAlbum)
    }

    pub fn add_album(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "album name must not be empty".to_string(),
            ));
        }
        self.submit(ApiRequest::AddAlbum {
            name: name.to_string(),
        })
    }

    pub fn add_to_album(&self, song_id: SongId, album_id: AlbumId) -> Result<()> {
        self.submit(ApiRequest::AddToAlbum { song_id, album_id })
    }

    pub fn remove_from_album(&self, song_id: SongId, album_id: AlbumId) -> Result<()> {
        self.submit(ApiRequest::RemoveFromAlbum { song_id, album_id })
    }

    pub fn album_music(&self, album_id: AlbumId) -> Result<Vec<SongRow>> {
        self.fetch(ApiRequest::GetAlbumMusic { id: album_id })
    }

    /// Add each of `selected` not already in `existing`, stopping at the first
    /// failure. Returns how many songs were added.
    pub fn add_songs_to_album(
        &self,
        album_id: AlbumId,
        selected: &[SongId],
        existing: &[SongId],
    ) -> Result<usize> {
        let to_add = songs_missing_from(selected, existing);
        if to_add.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "selected songs are already in the album".to_string(),
            ));
        }
        for &song_id in &to_add {
            self.add_to_album(song_id, album_id)?;
        }
        Ok(to_add.len())
    }

    pub fn upload(&self, upload: &UploadRequest) -> Result<()> {
        upload.validate()?;
        let form = upload.to_form()?;
        info!(title = %upload.title, artist = %upload.artist, "uploading song");
        let body = self
            .http
            .post(&self.endpoint_url)
            .multipart(form)
            .send()?
            .error_for_status()?
            .text()?;
        ApiResponse::parse(&body)?.into_result().map(|_| ())
    }
}

/// `selected` minus `existing`, keeping order and dropping duplicates.
pub fn songs_missing_from(selected: &[SongId], existing: &[SongId]) -> Vec<SongId> {
    let mut out: Vec<SongId> = Vec::new();
    for &id in selected {
        if !existing.contains(&id) && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
