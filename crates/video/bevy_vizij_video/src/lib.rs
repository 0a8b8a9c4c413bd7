//! Bevy adapter for `vizij-video-core`.
//!
//! Spawn a [`VideoPlayerBundle`]; the plugin attaches a screen mesh and a play
//! affordance child, drives the player every frame, and mirrors its
//! descriptors into meshes, materials, images and visibility. Hosts talk to
//! players through [`PlaybackCommand`] events and listen to
//! [`VideoPlayerEvent`]s.

use bevy::prelude::*;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{
    BoxedMedia, FrameTarget, PlayAffordanceMarker, VideoPlayer, VideoPlayerBundle, VideoScreen,
};
pub use resources::{PlaybackAction, PlaybackCommand, VideoPlayerEvent, VideoPlayerSettings};
pub use systems::{play_glyph_image, screen_hit};

/// Ordering: Attach -> Commands -> Pump -> Sync -> Upload, all in `Update`.
pub struct VizijVideoPlugin;

impl Plugin for VizijVideoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VideoPlayerSettings>()
            .add_event::<PlaybackCommand>()
            .add_event::<VideoPlayerEvent>()
            .add_systems(
                Update,
                (
                    systems::attach_visuals_system,
                    systems::apply_commands_system,
                    systems::pump_players_system,
                    systems::sync_visuals_system,
                    systems::upload_frames_system,
                )
                    .chain(),
            );
    }
}
