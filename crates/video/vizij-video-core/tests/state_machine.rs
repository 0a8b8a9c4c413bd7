use vizij_video_core::sim::SimCall;
use vizij_video_core::{
    LoadTicket, MediaEvent, MediaPlayer, PlayerConfig, PlayerError, PlayerEvent, PlayerState,
    SimulatedMedia, SimulatedMediaCfg, TextureBinding,
};

fn manual_player() -> MediaPlayer<SimulatedMedia> {
    MediaPlayer::new(SimulatedMedia::manual(), PlayerConfig::default()).unwrap()
}

fn states(events: &[PlayerEvent]) -> Vec<PlayerState> {
    events
        .iter()
        .filter_map(|e| match e {
            PlayerEvent::StateChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn valid_source_walks_every_state_in_order() {
    let mut player = manual_player();
    assert!(!player.can_play());

    let ticket = player.set_source("clip.mp4").unwrap();
    assert_eq!(player.state(), PlayerState::Loading);
    assert!(!player.can_play());

    player.resource_mut().signal_ready();
    player.update(0.0);
    assert!(player.can_play());

    let events = player.drain_events();
    assert_eq!(
        states(&events),
        vec![
            PlayerState::NoSource,
            PlayerState::Loading,
            PlayerState::Ready
        ]
    );
    assert_eq!(
        events[0],
        PlayerEvent::StateChanged {
            from: PlayerState::Uninitialized,
            to: PlayerState::NoSource
        }
    );
    assert_eq!(player.surface().texture, TextureBinding::LiveVideo { ticket });
}

#[test]
fn ready_rebuilds_geometry_to_media_aspect() {
    let media = SimulatedMedia::new(SimulatedMediaCfg {
        width: 1920,
        height: 1080,
        ..Default::default()
    });
    let mut player = MediaPlayer::new(media, PlayerConfig::default()).unwrap();
    assert_eq!(player.surface().size(), (1.0, 1.0));

    player.set_source("wide.mp4").unwrap();
    player.update(0.0);

    let surface = player.surface();
    assert!((surface.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    assert_eq!(surface.geometry_revision, 1);
    assert!(surface.visible);
    assert!(player.affordance().visible);
}

#[test]
fn second_source_wins_the_race() {
    let mut player = manual_player();
    let first = player.set_source("first.mp4").unwrap();
    let second = player.set_source("second.mp4").unwrap();
    assert_ne!(first, second);

    // The superseded load reports late; it must not drive READY.
    player.resource_mut().signal_ready_for(first);
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::Loading);

    player.resource_mut().signal_ready_for(second);
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(player.source_uri(), Some("second.mp4"));

    let events = player.drain_events();
    assert!(events.contains(&PlayerEvent::LoadSuperseded { ticket: first }));
    assert!(events.contains(&PlayerEvent::StaleSignalIgnored { ticket: first }));
}

#[test]
fn stale_ready_after_reaching_ready_is_ignored() {
    let mut player = manual_player();
    let first = player.set_source("first.mp4").unwrap();
    let second = player.set_source("second.mp4").unwrap();
    player.resource_mut().signal_ready_for(second);
    player.update(0.0);
    let revision = player.surface().geometry_revision;

    player.handle_event(MediaEvent::CanPlay { ticket: first });
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(player.surface().geometry_revision, revision);
}

#[test]
fn clear_source_from_ready_returns_to_no_source() {
    let mut player = MediaPlayer::new(SimulatedMedia::default(), PlayerConfig::default()).unwrap();
    player.set_source("clip.mp4").unwrap();
    player.update(0.0);
    assert!(player.can_play());

    player.clear_source().unwrap();
    assert_eq!(player.state(), PlayerState::NoSource);
    assert!(!player.can_play());
    assert_eq!(player.source_uri(), None);
    assert_eq!(player.surface().texture, TextureBinding::Cleared);
    assert!(player.surface().visible);
    assert!(!player.affordance().visible);
    assert!(player.resource().sources().is_empty());
}

#[test]
fn clear_source_without_source_is_a_no_op() {
    let mut player = manual_player();
    player.drain_events();
    player.clear_source().unwrap();
    assert!(player.drain_events().is_empty());
    assert!(!player.resource().calls().contains(&SimCall::ClearSources));
}

#[test]
fn play_and_pause_do_nothing_until_ready() {
    let mut player = manual_player();
    player.play().unwrap();
    player.pause().unwrap();
    assert!(!player.toggle_playback().unwrap());

    player.set_source("clip.mp4").unwrap();
    player.play().unwrap();
    player.pause().unwrap();

    let calls = player.resource().calls();
    assert!(!calls.contains(&SimCall::Play));
    assert!(!calls.contains(&SimCall::Pause));
    assert!(player.is_paused());
}

#[test]
fn invalid_sources_are_rejected_without_side_effects() {
    let mut player = manual_player();
    player.drain_events();
    for bad in ["", "   "] {
        let err = player.set_source(bad).unwrap_err();
        assert!(matches!(err, PlayerError::InvalidArgument { .. }));
    }
    assert_eq!(player.state(), PlayerState::NoSource);
    assert!(player.resource().calls().is_empty());
    assert!(player.drain_events().is_empty());
}

#[test]
fn resource_failure_is_returned_and_falls_back_to_no_source() {
    let mut player = MediaPlayer::new(SimulatedMedia::default(), PlayerConfig::default()).unwrap();
    player.set_source("good.mp4").unwrap();
    player.update(0.0);
    assert!(player.can_play());

    player.resource_mut().fail_next_attach("codec missing");
    let err = player.set_source("bad.mp4").unwrap_err();
    assert!(matches!(err, PlayerError::Media(_)));
    assert_eq!(player.state(), PlayerState::NoSource);
    assert_eq!(player.source_uri(), None);
    assert!(player
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::MediaFailed { .. })));
}

#[test]
fn error_signal_while_loading_drops_the_source() {
    let mut player = manual_player();
    player.set_source("broken.mp4").unwrap();
    let ticket = player.current_ticket().unwrap();
    player.resource_mut().signal_error_for(ticket, "network");
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::NoSource);
    assert_eq!(player.source_uri(), None);
}

#[test]
fn error_from_superseded_load_does_not_disturb_the_current_one() {
    let mut player = manual_player();
    let first = player.set_source("first.mp4").unwrap();
    player.resource_mut().signal_error_for(first, "404");
    let second = player.set_source("second.mp4").unwrap();
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::Loading);
    assert_eq!(player.source_uri(), Some("second.mp4"));
    assert!(player
        .drain_events()
        .contains(&PlayerEvent::StaleSignalIgnored { ticket: first }));

    player.resource_mut().signal_ready_for(second);
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(player.source_uri(), Some("second.mp4"));
}

#[test]
fn unattributed_error_is_reported_without_leaving_loading() {
    let mut player = manual_player();
    player.set_source("clip.mp4").unwrap();
    player.drain_events();
    player.resource_mut().emit(MediaEvent::Error {
        ticket: None,
        message: "decoder hiccup".into(),
    });
    player.update(0.0);
    assert_eq!(player.state(), PlayerState::Loading);
    assert_eq!(
        player.drain_events(),
        vec![PlayerEvent::MediaFailed {
            message: "decoder hiccup".into()
        }]
    );
}

#[test]
fn error_for_live_load_keeps_ready() {
    let mut player = manual_player();
    let ticket = player.set_source("clip.mp4").unwrap();
    player.resource_mut().signal_ready();
    player.update(0.0);
    player.drain_events();

    player.handle_event(MediaEvent::Error {
        ticket: Some(ticket),
        message: "decode stall".into(),
    });
    assert_eq!(player.state(), PlayerState::Ready);
    assert!(matches!(
        player.drain_events()[..],
        [PlayerEvent::MediaFailed { .. }]
    ));
}

#[test]
fn repeated_readiness_for_live_load_is_quiet() {
    let mut player = manual_player();
    let ticket = player.set_source("clip.mp4").unwrap();
    player.resource_mut().signal_ready();
    player.update(0.0);
    player.drain_events();
    let revision = player.surface().geometry_revision;

    // Browsers raise canplay again after seeks and loop wrap-around.
    player.handle_event(MediaEvent::CanPlay { ticket });
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(player.surface().geometry_revision, revision);
    assert!(player.drain_events().is_empty());
}

#[test]
fn failed_clear_keeps_the_source() {
    let mut player = manual_player();
    player.set_source("clip.mp4").unwrap();
    player.resource_mut().signal_ready();
    player.update(0.0);

    player.resource_mut().fail_next_clear("element detached");
    let err = player.clear_source().unwrap_err();
    assert!(matches!(err, PlayerError::Media(_)));
    assert_eq!(player.state(), PlayerState::Ready);
    assert_eq!(player.source_uri(), Some("clip.mp4"));
    assert_eq!(player.resource().sources().len(), 1);
    assert!(player.can_play());
}

#[test]
fn initial_source_from_config_starts_loading() {
    let cfg = PlayerConfig::default().with_source("coffee.mp4");
    let mut player = MediaPlayer::new(SimulatedMedia::manual(), cfg).unwrap();
    assert_eq!(player.state(), PlayerState::Loading);
    assert_eq!(player.source_uri(), Some("coffee.mp4"));
    assert_eq!(player.current_ticket(), Some(LoadTicket(1)));
    player.resource_mut().signal_ready();
    player.update(0.0);
    assert!(player.can_play());
}

#[test]
fn blank_initial_source_starts_without_one() {
    for text in [r#"{ "source": "" }"#, r#"{ "source": "   " }"#] {
        let cfg = PlayerConfig::from_json(text).unwrap();
        let player = MediaPlayer::new(SimulatedMedia::default(), cfg).unwrap();
        assert_eq!(player.state(), PlayerState::NoSource);
        assert_eq!(player.source_uri(), None);
        assert!(player.resource().calls().is_empty());
    }
}

#[test]
fn failing_initial_source_fails_construction() {
    let mut media = SimulatedMedia::default();
    media.fail_next_attach("codec missing");
    let cfg = PlayerConfig::default().with_source("clip.mp4");
    let err = MediaPlayer::new(media, cfg).unwrap_err();
    assert!(matches!(err, PlayerError::Media(_)));
}

#[test]
fn players_are_independent() {
    let mut a = manual_player();
    let mut b = manual_player();
    a.set_source("a.mp4").unwrap();
    a.resource_mut().signal_ready();
    a.update(0.0);

    assert!(a.can_play());
    assert_eq!(b.state(), PlayerState::NoSource);
    b.set_source("b.mp4").unwrap();
    assert_eq!(a.source_uri(), Some("a.mp4"));
    assert_eq!(b.current_ticket(), Some(LoadTicket(1)));
}
