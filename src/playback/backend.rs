//! The seam between the session controller and an audio implementation.

use super::error::Result;
use super::resource::MediaSource;
use super::types::{HandleId, StatusSender, StatusTick};

/// A live, stateful playback object bound to one resource.
///
/// Dropping a handle must silence it; the controller still calls `stop`
/// and `unload` explicitly before letting go.
///
/// Every successful `play`, `pause` and `seek` counts as one transport
/// command; ticks carry the count in `StatusTick::transport` as of when they
/// were sampled.
pub trait MediaHandle {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Relocate playback to `position_ms`.
    fn seek(&mut self, position_ms: u64) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    /// Release the decoder and any buffered data. No ticks follow.
    fn unload(&mut self) -> Result<()>;
}

/// Creates handles.
pub trait MediaBackend {
    type Handle: MediaHandle;

    /// Acquire a handle for `source`, tagging all of its ticks with `id`.
    ///
    /// Returns the handle together with its initial status; further status
    /// arrives asynchronously on `status`.
    fn load(
        &mut self,
        id: HandleId,
        source: &MediaSource,
        autoplay: bool,
        status: StatusSender,
    ) -> Result<(Self::Handle, StatusTick)>;
}
