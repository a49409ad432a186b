//! Remote music catalog: song/album models, the JSON action client and
//! display helpers for catalog entries.

mod address;
mod client;
mod display;
mod error;
mod favorites;
mod model;

pub use address::{is_http_url, join_base};
pub use client::{ApiRequest, ApiResponse, CatalogClient, RESULT_OK, UploadRequest, songs_missing_from};
pub use display::{display_from_fields, format_millis};
pub use error::CatalogError;
pub use favorites::FavoriteSet;
pub use model::{Album, AlbumId, SongId, SongRow, Track};
