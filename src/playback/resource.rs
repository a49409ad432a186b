//! Resolving a track's audio reference into something a backend can open.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::{is_http_url, join_base};

use super::error::{PlaybackError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Remote(String),
    Local(PathBuf),
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Remote(url) => f.write_str(url),
            MediaSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve `reference` against `base`.
///
/// Absolute `http(s)://` and `file://` references are used as-is. Otherwise
/// the reference is joined onto `base`, which is a URL or, when it has no
/// scheme, a local directory.
pub fn resolve_media(base: &str, reference: &str) -> Result<MediaSource> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(PlaybackError::load("<empty>", "track has no audio reference"));
    }

    if is_http_url(reference) {
        return Ok(MediaSource::Remote(reference.to_string()));
    }
    if let Some(path) = reference.strip_prefix("file://") {
        return Ok(MediaSource::Local(PathBuf::from(path)));
    }

    let base = base.trim();
    if is_http_url(base) {
        Ok(MediaSource::Remote(join_base(base, reference)))
    } else if let Some(dir) = base.strip_prefix("file://") {
        Ok(MediaSource::Local(Path::new(dir).join(reference.trim_start_matches('/'))))
    } else if base.is_empty() {
        Ok(MediaSource::Local(PathBuf::from(reference)))
    } else {
        Ok(MediaSource::Local(Path::new(base).join(reference.trim_start_matches('/'))))
    }
}
