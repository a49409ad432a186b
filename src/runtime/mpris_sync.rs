use crate::app::App;
use crate::mpris::MprisHandle;
use crate::playback::resolve_media;

pub fn update_mpris(mpris: &MprisHandle, app: &App, base_url: &str) {
    let snapshot = &app.now_playing;
    let track = snapshot.track.as_deref();
    let url = track
        .and_then(|t| resolve_media(base_url, &t.audio).ok())
        .map(|source| source.to_string());
    let duration = snapshot
        .duration_known()
        .then_some(snapshot.duration_ms);

    mpris.set_track_metadata(track, duration, url);
    mpris.set_playback(snapshot.state);
}
