use bevy::log::{debug, warn};
use bevy::math::primitives::Rectangle;
use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use vizij_video_core::{MediaResource, PlayerError, Rgb, TextureBinding};

use crate::components::{FrameTarget, PlayAffordanceMarker, VideoPlayer, VideoScreen};
use crate::resources::{PlaybackAction, PlaybackCommand, VideoPlayerEvent, VideoPlayerSettings};

fn srgb(c: Rgb) -> Color {
    Color::srgb_u8(c.r(), c.g(), c.b())
}

/// White right-pointing triangle on a transparent square, used as the alpha
/// mask of the play affordance.
pub fn play_glyph_image(resolution: u32) -> Image {
    let n = resolution.max(8);
    let mut data = Vec::with_capacity((n * n * 4) as usize);
    let (left, right) = (0.3, 0.75);
    for y in 0..n {
        for x in 0..n {
            let u = (x as f32 + 0.5) / n as f32;
            let v = (y as f32 + 0.5) / n as f32;
            // Half-height of the triangle shrinks linearly from left to right.
            let half = 0.25 * (right - u) / (right - left);
            let inside = u >= left && u <= right && (v - 0.5).abs() <= half;
            let a = if inside { 255 } else { 0 };
            data.extend_from_slice(&[255, 255, 255, a]);
        }
    }
    Image::new(
        Extent3d {
            width: n,
            height: n,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn blank_frame(width: u32, height: u32) -> Image {
    Image::new_fill(
        Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Gives every new player its screen mesh, material and affordance child.
pub fn attach_visuals_system(
    mut commands: Commands,
    settings: Res<VideoPlayerSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut glyph: Local<Option<Handle<Image>>>,
    added: Query<(Entity, &VideoPlayer), Without<VideoScreen>>,
) {
    for (entity, player) in added.iter() {
        let glyph = glyph
            .get_or_insert_with(|| images.add(play_glyph_image(settings.glyph_resolution)))
            .clone();
        let surface = player.0.surface();
        let affordance = player.0.affordance();

        let mesh = meshes.add(Mesh::from(Rectangle::new(surface.aspect_ratio, 1.0)));
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        });

        let overlay = commands
            .spawn((
                PbrBundle {
                    mesh: meshes.add(Mesh::from(Rectangle::new(affordance.size, affordance.size))),
                    material: materials.add(StandardMaterial {
                        base_color: srgb(affordance.tint),
                        base_color_texture: Some(glyph),
                        alpha_mode: AlphaMode::Mask(settings.alpha_cutoff),
                        unlit: true,
                        ..default()
                    }),
                    transform: Transform::from_xyz(0.0, 0.0, affordance.z_offset),
                    visibility: Visibility::Hidden,
                    ..default()
                },
                PlayAffordanceMarker { owner: entity },
            ))
            .id();

        commands
            .entity(entity)
            .insert((
                mesh.clone(),
                material.clone(),
                VideoScreen {
                    mesh,
                    material,
                    affordance: overlay,
                    applied_revision: surface.geometry_revision,
                    frame: None,
                },
            ))
            .add_child(overlay);
        debug!("attached video screen to {entity:?}");
    }
}

fn apply_action(player: &mut VideoPlayer, action: &PlaybackAction) -> Result<(), PlayerError> {
    let p = &mut player.0;
    match action {
        PlaybackAction::Play => p.play(),
        PlaybackAction::Pause => p.pause(),
        PlaybackAction::Toggle => p.toggle_playback().map(|_| ()),
        PlaybackAction::SetSource(uri) => p.set_source(uri).map(|_| ()),
        PlaybackAction::ClearSource => p.clear_source(),
        PlaybackAction::SetVolume(v) => {
            p.set_volume(*v);
            Ok(())
        }
        PlaybackAction::SetMuted(m) => {
            p.set_muted(*m);
            Ok(())
        }
        PlaybackAction::SetLoop(l) => {
            p.set_loop(*l);
            Ok(())
        }
        PlaybackAction::SetAutoplay(a) => {
            p.set_autoplay(*a);
            Ok(())
        }
    }
}

/// Applies queued [`PlaybackCommand`]s in the order they were sent.
pub fn apply_commands_system(
    mut commands_in: EventReader<PlaybackCommand>,
    mut players: Query<&mut VideoPlayer>,
) {
    for cmd in commands_in.read() {
        let Ok(mut player) = players.get_mut(cmd.entity) else {
            warn!("playback command for {:?} which has no VideoPlayer", cmd.entity);
            continue;
        };
        if let Err(err) = apply_action(&mut player, &cmd.action) {
            warn!("{:?} on {:?} failed: {err}", cmd.action, cmd.entity);
        }
    }
}

/// Advances each resource by the frame delta and forwards player notifications.
pub fn pump_players_system(
    time: Res<Time>,
    mut players: Query<(Entity, &mut VideoPlayer)>,
    mut out: EventWriter<VideoPlayerEvent>,
) {
    let dt = time.delta_seconds();
    for (entity, mut player) in players.iter_mut() {
        player.0.update(dt);
        for event in player.0.drain_events() {
            out.send(VideoPlayerEvent { entity, event });
        }
    }
}

/// Mirrors surface/affordance descriptors into meshes, materials and visibility.
pub fn sync_visuals_system(
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut screens: Query<
        (&VideoPlayer, &mut VideoScreen, &mut Visibility),
        Without<PlayAffordanceMarker>,
    >,
    mut overlays: Query<&mut Visibility, With<PlayAffordanceMarker>>,
) {
    for (player, mut screen, mut visibility) in screens.iter_mut() {
        let surface = player.0.surface();

        if screen.applied_revision != surface.geometry_revision {
            if let Some(mesh) = meshes.get_mut(&screen.mesh) {
                *mesh = Mesh::from(Rectangle::new(surface.aspect_ratio, 1.0));
            }
            screen.applied_revision = surface.geometry_revision;
        }

        match surface.texture {
            TextureBinding::LiveVideo { ticket } => {
                let bound = screen.frame.as_ref().map(|f| f.ticket);
                if bound != Some(ticket) {
                    if let Some(old) = screen.frame.take() {
                        images.remove(&old.image);
                    }
                    let (width, height) = player.0.resource().video_dimensions().unwrap_or((1, 1));
                    let image = images.add(blank_frame(width, height));
                    if let Some(material) = materials.get_mut(&screen.material) {
                        material.base_color_texture = Some(image.clone());
                    }
                    screen.frame = Some(FrameTarget {
                        image,
                        ticket,
                        width: width.max(1),
                        height: height.max(1),
                        uploaded: None,
                    });
                }
            }
            TextureBinding::Cleared => {
                if let Some(old) = screen.frame.take() {
                    images.remove(&old.image);
                    if let Some(material) = materials.get_mut(&screen.material) {
                        material.base_color_texture = None;
                    }
                }
            }
        }

        let wanted = if surface.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }

        if let Ok(mut overlay) = overlays.get_mut(screen.affordance) {
            let wanted = if player.0.affordance().visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            };
            if *overlay != wanted {
                *overlay = wanted;
            }
        }
    }
}

/// Copies new frames from each resource into its bound image.
pub fn upload_frames_system(
    mut images: ResMut<Assets<Image>>,
    mut screens: Query<(&VideoPlayer, &mut VideoScreen)>,
) {
    for (player, mut screen) in screens.iter_mut() {
        let Some(target) = screen.frame.as_mut() else {
            continue;
        };
        let resource = player.0.resource();
        let sequence = resource.frame_sequence();
        if target.uploaded == Some(sequence) {
            continue;
        }
        if let Some(image) = images.get_mut(&target.image) {
            if resource.copy_frame_rgba(&mut image.data) {
                target.uploaded = Some(sequence);
            }
        }
    }
}

/// Intersect `ray` with a screen plane of the given aspect ratio (height 1.0,
/// centred on the transform, facing +Z). Returns the world-space hit point.
pub fn screen_hit(ray: Ray3d, screen: &GlobalTransform, aspect_ratio: f32) -> Option<Vec3> {
    let to_local = screen.compute_matrix().inverse();
    let origin = to_local.transform_point3(ray.origin);
    let direction = to_local.transform_vector3(*ray.direction);
    if direction.z.abs() < 1e-6 {
        return None;
    }
    let t = -origin.z / direction.z;
    if t < 0.0 {
        return None;
    }
    let p = origin + direction * t;
    if p.x.abs() <= aspect_ratio * 0.5 && p.y.abs() <= 0.5 {
        Some(screen.transform_point(p))
    } else {
        None
    }
}
