use bevy::prelude::*;
use vizij_video_core::PlayerEvent;

/// Look of the play affordance.
#[derive(Resource, Debug, Clone)]
pub struct VideoPlayerSettings {
    /// Edge length in texels of the generated play glyph mask.
    pub glyph_resolution: u32,
    /// Alpha below which glyph texels are discarded.
    pub alpha_cutoff: f32,
}

impl Default for VideoPlayerSettings {
    fn default() -> Self {
        Self {
            glyph_resolution: 64,
            alpha_cutoff: 0.3,
        }
    }
}

/// What a [`PlaybackCommand`] asks the player to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackAction {
    Play,
    Pause,
    /// Play if paused, pause if playing (the click behaviour).
    Toggle,
    SetSource(String),
    ClearSource,
    SetVolume(f32),
    SetMuted(bool),
    SetLoop(bool),
    SetAutoplay(bool),
}

/// Host request targeted at one player entity.
#[derive(Event, Debug, Clone)]
pub struct PlaybackCommand {
    pub entity: Entity,
    pub action: PlaybackAction,
}

impl PlaybackCommand {
    pub fn new(entity: Entity, action: PlaybackAction) -> Self {
        Self { entity, action }
    }
}

/// Player notification forwarded into the ECS.
#[derive(Event, Debug, Clone)]
pub struct VideoPlayerEvent {
    pub entity: Entity,
    pub event: PlayerEvent,
}
