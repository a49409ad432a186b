use super::*;
use std::sync::mpsc;

fn make_track(id: i64) -> Track {
    Track {
        id,
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        duration: Some("0:01".to_string()),
        audio: "uploads/test.mp3".to_string(),
        thumbnail: None,
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        state,
        rx,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track(7);
    handle.set_track_metadata(
        Some(&track),
        Some(1_234),
        Some("http://localhost/uploads/test.mp3".to_string()),
    );

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.url.as_deref(), Some("http://localhost/uploads/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/playdeck/track/7")
        );
    }

    handle.set_track_metadata(None, None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn negative_ids_still_form_valid_object_paths() {
    let path = track_object_path(-3).unwrap();
    assert_eq!(path.as_str(), "/org/playdeck/track/n3");
}

#[test]
fn playback_status_maps_session_state() {
    let (iface, state, _rx) = iface();

    for (session, expected) in [
        (SessionState::Idle, "Stopped"),
        (SessionState::Loading, "Stopped"),
        (SessionState::Playing, "Playing"),
        (SessionState::Paused, "Paused"),
        (SessionState::Finished, "Stopped"),
        (SessionState::Closed, "Stopped"),
    ] {
        state.lock().unwrap().playback = session;
        assert_eq!(iface.playback_status(), expected, "{session}");
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    let handle = MprisHandle { state };
    handle.set_track_metadata(
        Some(&make_track(1)),
        Some(42),
        Some("file:///tmp/test.mp3".to_string()),
    );

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn methods_forward_control_commands() {
    let (iface, _state, rx) = iface();
    iface.play_pause();
    iface.seek(-5_000_000);
    iface.next();

    assert_eq!(rx.try_recv().unwrap(), ControlCmd::PlayPause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SeekBy(-5_000));
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Next);
}

#[test]
fn oversized_duration_is_left_out_of_metadata() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_track_metadata(Some(&make_track(2)), Some(u64::MAX), None);
    assert_eq!(state.lock().unwrap().length_micros, None);

    handle.set_track_metadata(Some(&make_track(2)), Some(i64::MAX as u64 / 1000), None);
    assert!(state.lock().unwrap().length_micros.unwrap() > 0);
}
