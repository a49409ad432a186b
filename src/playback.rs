//! Single-session playback: the session controller, its status feed, and
//! the media backends it drives.

mod backend;
mod controller;
mod error;
mod resource;
mod rodio_backend;
mod types;

pub use backend::{MediaBackend, MediaHandle};
pub use controller::PlaybackController;
pub use error::PlaybackError;
pub use resource::{MediaSource, resolve_media};
pub use rodio_backend::{RodioBackend, RodioHandle};
pub use types::{
    HandleId, PlaybackSnapshot, SENTINEL_DURATION_MS, SessionState, StatusEvent, StatusSender,
    StatusTick,
};
