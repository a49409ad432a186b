use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` according to `fields` and `sep`.
///
/// Blank fields are skipped; falls back to the title, then to `#<id>`.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => {
                if !track.title.trim().is_empty() {
                    parts.push(track.title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if !track.artist.trim().is_empty() {
                    parts.push(track.artist.trim().to_string());
                }
            }
            TrackDisplayField::Duration => {
                if let Some(d) = track.duration.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(d.to_string());
                }
            }
            TrackDisplayField::Id => parts.push(format!("#{}", track.id)),
        }
    }

    if !parts.is_empty() {
        parts.join(sep)
    } else if !track.title.trim().is_empty() {
        track.title.trim().to_string()
    } else {
        format!("#{}", track.id)
    }
}

/// Format milliseconds as `m:ss` (minutes are not zero-padded).
pub fn format_millis(millis: u64) -> String {
    let total_secs = millis / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
