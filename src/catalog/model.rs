use serde::{Deserialize, Deserializer, Serialize};

pub type SongId = i64;
pub type AlbumId = i64;

/// A song as returned by `get_my_music`.
///
/// `audio` and `thumbnail` are paths relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Track {
    #[serde(deserialize_with = "lenient_id")]
    pub id: SongId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Display string as stored by the backend (e.g. `"3:05"`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default)]
    pub audio: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Album {
    #[serde(deserialize_with = "lenient_id")]
    pub id: AlbumId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

/// A row from `get_fave` or `get_album_music`.
///
/// These joins carry the song's fields plus a `song_id`; older rows only
/// have `id`, so the song identifier is `song_id` with `id` as fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongRow {
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub song_id: Option<SongId>,
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub id: Option<SongId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail: Option<String>,
}

impl SongRow {
    pub fn song_id(&self) -> Option<SongId> {
        self.song_id.or(self.id)
    }

    /// Convert into a playable `Track`; rows without any identifier are dropped.
    pub fn into_track(self) -> Option<Track> {
        let id = self.song_id()?;
        Some(Track {
            id,
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            duration: self.duration,
            audio: self.audio.unwrap_or_default(),
            thumbnail: self.thumbnail,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Num(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid identifier {s:?}"))),
        }
    }
}

// The backend is not consistent about numeric columns: ids arrive as either
// JSON numbers or numeric strings.
fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    RawId::deserialize(d)?.into_id()
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<RawId>::deserialize(d)? {
        Some(raw) => raw.into_id().map(Some),
        None => Ok(None),
    }
}

/// Accept strings or numbers; blank strings become `None`.
fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
