//! `rodio`-based media backend.
//!
//! Each handle owns one `Sink` on the shared output stream. A ticker thread
//! per handle reports position and completion until the handle is released
//! or the sink drains.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, trace};

use super::backend::{MediaBackend, MediaHandle};
use super::error::{PlaybackError, Result};
use super::resource::MediaSource;
use super::types::{HandleId, StatusEvent, StatusSender, StatusTick};

pub struct RodioBackend {
    stream: OutputStream,
    http: reqwest::blocking::Client,
    tick_interval: Duration,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default(tick_interval: Duration, fetch_timeout: Duration) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Backend(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        let http = reqwest::blocking::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| PlaybackError::Backend(e.to_string()))?;

        Ok(Self {
            stream,
            http,
            tick_interval,
        })
    }

    fn fetch(&self, source: &MediaSource) -> Result<Vec<u8>> {
        match source {
            MediaSource::Remote(url) => {
                let response = self
                    .http
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| PlaybackError::load(url.as_str(), e))?;
                let bytes = response
                    .bytes()
                    .map_err(|e| PlaybackError::load(url.as_str(), e))?;
                Ok(bytes.to_vec())
            }
            MediaSource::Local(path) => {
                std::fs::read(path).map_err(|e| PlaybackError::load(path.display().to_string(), e))
            }
        }
    }
}

impl MediaBackend for RodioBackend {
    type Handle = RodioHandle;

    fn load(
        &mut self,
        id: HandleId,
        source: &MediaSource,
        autoplay: bool,
        status: StatusSender,
    ) -> Result<(RodioHandle, StatusTick)> {
        let bytes = self.fetch(source)?;
        debug!(handle = id.0, bytes = bytes.len(), %source, "fetched audio");

        let decoder = decode(source, bytes)?;
        let duration_ms = decoder.total_duration().map(|d| d.as_millis() as u64);

        let sink = Arc::new(Sink::connect_new(self.stream.mixer()));
        sink.pause();
        sink.append(decoder);
        if autoplay {
            sink.play();
        }

        let released = Arc::new(AtomicBool::new(false));
        let transport = Arc::new(AtomicU64::new(0));
        spawn_ticker(
            id,
            sink.clone(),
            released.clone(),
            transport.clone(),
            duration_ms,
            self.tick_interval,
            status,
        );

        let initial = StatusTick {
            position_ms: 0,
            duration_ms,
            is_playing: autoplay,
            is_loaded: true,
            ..StatusTick::default()
        };
        Ok((
            RodioHandle {
                sink,
                released,
                transport,
            },
            initial,
        ))
    }
}

/// Decode in-memory audio. Passing the byte length lets rodio compute a
/// duration for streams without a length header.
fn decode(source: &MediaSource, bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>> {
    let len = bytes.len() as u64;
    let mut builder = Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(len)
        .with_seekable(true);

    let name = source.to_string();
    if let Some(ext) = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        if matches!(ext.as_str(), "mp3" | "flac" | "ogg" | "wav" | "m4a") {
            builder = builder.with_hint(&ext);
        }
    }

    builder
        .build()
        .map_err(|e| PlaybackError::load(name, e))
}

fn spawn_ticker(
    id: HandleId,
    sink: Arc<Sink>,
    released: Arc<AtomicBool>,
    transport: Arc<AtomicU64>,
    duration_ms: Option<u64>,
    interval: Duration,
    status: StatusSender,
) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            if released.load(Ordering::Acquire) {
                break;
            }

            // Read the counter before sampling so a command racing this tick
            // makes it stale rather than wrong.
            let applied = transport.load(Ordering::Acquire);
            let finished = sink.empty();
            let tick = StatusTick {
                position_ms: sink.get_pos().as_millis() as u64,
                duration_ms,
                is_playing: !finished && !sink.is_paused(),
                is_loaded: true,
                did_just_finish: finished,
                error: None,
                transport: applied,
            };
            if status.send(StatusEvent { handle: id, tick }).is_err() || finished {
                break;
            }
        }
        trace!(handle = id.0, "ticker stopped");
    });
}

pub struct RodioHandle {
    sink: Arc<Sink>,
    released: Arc<AtomicBool>,
    transport: Arc<AtomicU64>,
}

impl RodioHandle {
    fn applied(&self) {
        self.transport.fetch_add(1, Ordering::Release);
    }
}

impl MediaHandle for RodioHandle {
    fn play(&mut self) -> Result<()> {
        self.sink.play();
        self.applied();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.sink.pause();
        self.applied();
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<()> {
        self.sink
            .try_seek(Duration::from_millis(position_ms))
            .map_err(|e| PlaybackError::Backend(format!("seek to {position_ms}ms failed: {e}")))?;
        self.applied();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.sink.pause();
        Ok(())
    }

    fn unload(&mut self) -> Result<()> {
        self.released.store(true, Ordering::Release);
        self.sink.stop();
        Ok(())
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.released.store(true, Ordering::Release);
        self.sink.stop();
    }
}
