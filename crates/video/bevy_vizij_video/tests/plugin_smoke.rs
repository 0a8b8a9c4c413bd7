use bevy::prelude::*;
use bevy_vizij_video::{
    PlaybackCommand, VideoPlayerEvent, VideoPlayerSettings, VizijVideoPlugin,
};

#[test]
fn plugin_registers_settings_and_events() {
    let mut app = App::new();
    // it should insert settings and both event queues when the plugin is added
    app.add_plugins(MinimalPlugins)
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<Assets<Image>>()
        .add_plugins(VizijVideoPlugin);

    assert!(app.world().get_resource::<VideoPlayerSettings>().is_some());
    assert!(app.world().get_resource::<Events<PlaybackCommand>>().is_some());
    assert!(app.world().get_resource::<Events<VideoPlayerEvent>>().is_some());
}

/// it should run a few frames with no players without panicking
#[test]
fn updates_without_players() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<Assets<Image>>()
        .add_plugins(VizijVideoPlugin);

    for _ in 0..3 {
        app.update();
    }
    let settings = app.world().resource::<VideoPlayerSettings>();
    assert_eq!(settings.glyph_resolution, 64);
}
