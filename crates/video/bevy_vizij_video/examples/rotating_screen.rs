//! A video screen floating above a ground plane, gently swinging around its
//! vertical axis. Left-click the screen to toggle playback once it can play.
//!
//! Run with `cargo run -p bevy_vizij_video --example rotating_screen`.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_vizij_video::{
    screen_hit, PlaybackAction, PlaybackCommand, VideoPlayer, VideoPlayerBundle, VideoPlayerEvent,
    VizijVideoPlugin,
};
use vizij_video_core::{PlayerConfig, SimulatedMedia, SimulatedMediaCfg};

/// Per-frame yaw step and the swing limit, in radians.
const YAW_SPEED: f32 = 0.002;
const YAW_LIMIT: f32 = 0.4;

#[derive(Component)]
struct Swing {
    direction: f32,
}

fn main() -> anyhow::Result<()> {
    let config = PlayerConfig::from_json(&vizij_video_test_fixtures::configs::json("demo")?)?;
    let player = VideoPlayer::new(
        SimulatedMedia::new(SimulatedMediaCfg {
            duration: 6.0,
            ..Default::default()
        }),
        config,
    )?;

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(VizijVideoPlugin)
        .insert_resource(PendingPlayer(Some(player)))
        .add_systems(Startup, setup)
        .add_systems(Update, (swing, click_to_toggle, log_player_events))
        .run();
    Ok(())
}

#[derive(Resource)]
struct PendingPlayer(Option<VideoPlayer>);

fn setup(
    mut commands: Commands,
    mut pending: ResMut<PendingPlayer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0.0, 0.6, 2.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        transform: Transform::from_xyz(1.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(6.0, 6.0)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.25, 0.28),
            ..default()
        }),
        ..default()
    });

    if let Some(player) = pending.0.take() {
        commands.spawn((
            VideoPlayerBundle::new(player, Transform::from_xyz(0.0, 0.5, 0.0)),
            Swing { direction: 1.0 },
        ));
    }
}

fn swing(mut screens: Query<(&mut Transform, &mut Swing)>) {
    for (mut transform, mut swing) in screens.iter_mut() {
        let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        let next = yaw + YAW_SPEED * swing.direction;
        if next.abs() > YAW_LIMIT {
            swing.direction = -swing.direction;
        }
        transform.rotation = Quat::from_rotation_y(next.clamp(-YAW_LIMIT, YAW_LIMIT));
    }
}

fn click_to_toggle(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    screens: Query<(Entity, &VideoPlayer, &GlobalTransform)>,
    mut out: EventWriter<PlaybackCommand>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = windows.get_single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    for (entity, player, transform) in screens.iter() {
        if !player.0.can_play() {
            continue;
        }
        let aspect = player.0.surface().aspect_ratio;
        if screen_hit(ray, transform, aspect).is_some() {
            out.send(PlaybackCommand::new(entity, PlaybackAction::Toggle));
        }
    }
}

fn log_player_events(mut events: EventReader<VideoPlayerEvent>) {
    for ev in events.read() {
        info!("{:?}: {:?}", ev.entity, ev.event);
    }
}
