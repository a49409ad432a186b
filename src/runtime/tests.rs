use super::cli::{Command, UploadArgs};
use super::event_loop::open_selected;
use crate::app::App;
use crate::catalog::Track;
use crate::playback::{
    HandleId, MediaBackend, MediaHandle, MediaSource, PlaybackController, PlaybackError,
    StatusSender, StatusTick,
};
use std::path::PathBuf;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_arguments_runs_the_tui() {
    assert_eq!(Command::parse(&[]).unwrap(), None);
}

#[test]
fn upload_accepts_optional_thumbnail() {
    let cmd = Command::parse(&args(&["upload", "Song", "Band", "song.mp3"])).unwrap();
    assert_eq!(
        cmd,
        Some(Command::Upload(UploadArgs {
            title: "Song".into(),
            artist: "Band".into(),
            audio: PathBuf::from("song.mp3"),
            thumbnail: None,
        }))
    );

    let cmd = Command::parse(&args(&["upload", "Song", "Band", "song.mp3", "cover.jpg"])).unwrap();
    match cmd {
        Some(Command::Upload(u)) => assert_eq!(u.thumbnail, Some(PathBuf::from("cover.jpg"))),
        other => panic!("unexpected {other:?}"),
    }

    assert!(Command::parse(&args(&["upload", "Song"])).is_err());
}

#[test]
fn album_commands_parse_ids() {
    assert_eq!(
        Command::parse(&args(&["album-add", "3", "10", "11"])).unwrap(),
        Some(Command::AlbumAdd {
            album: 3,
            songs: vec![10, 11]
        })
    );
    assert_eq!(
        Command::parse(&args(&["album-remove", "3", "10"])).unwrap(),
        Some(Command::AlbumRemove { album: 3, song: 10 })
    );
    assert!(Command::parse(&args(&["album-add", "3"])).is_err());
    assert!(Command::parse(&args(&["album-remove", "x", "10"])).is_err());
}

#[test]
fn album_new_joins_words() {
    assert_eq!(
        Command::parse(&args(&["album-new", "Road", "trip"])).unwrap(),
        Some(Command::AlbumNew("Road trip".into()))
    );
    assert!(Command::parse(&args(&["album-new", "  "])).is_err());
}

#[test]
fn unknown_command_is_rejected() {
    let err = Command::parse(&args(&["dance"])).unwrap_err();
    assert!(err.to_string().contains("unknown command"));
    assert_eq!(
        Command::parse(&args(&["--help"])).unwrap(),
        Some(Command::Help)
    );
}

struct NoHandle;

impl MediaHandle for NoHandle {
    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn pause(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn seek(&mut self, _position_ms: u64) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn stop(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
    fn unload(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Every load fails to decode.
struct BrokenBackend;

impl MediaBackend for BrokenBackend {
    type Handle = NoHandle;

    fn load(
        &mut self,
        _id: HandleId,
        source: &MediaSource,
        _autoplay: bool,
        _status: StatusSender,
    ) -> Result<(NoHandle, StatusTick), PlaybackError> {
        Err(PlaybackError::load(source.to_string(), "not audio"))
    }
}

#[test]
fn failed_open_shows_the_load_error_once() {
    let mut ctl = PlaybackController::new(BrokenBackend, "http://music.test/", true);
    let snapshots = ctl.subscribe();

    let mut app = App::new();
    app.set_library(vec![Track {
        id: 1,
        title: "Song".into(),
        artist: "Band".into(),
        duration: None,
        audio: "uploads/1.mp3".into(),
        thumbnail: None,
    }]);

    open_selected(&mut app, &mut ctl);
    assert!(app.status_message.is_none());

    for snapshot in snapshots.try_iter() {
        app.apply_snapshot(snapshot);
    }
    assert_eq!(
        app.status_message.as_deref(),
        Some("failed to load http://music.test/uploads/1.mp3: not audio")
    );
}
