use bevy::prelude::*;
use vizij_video_core::{LoadTicket, MediaPlayer, MediaResource, PlayerConfig, PlayerError};

/// Media resource type stored inside ECS components.
pub type BoxedMedia = Box<dyn MediaResource + Send + Sync>;

/// A video player living on an entity. The plugin gives the entity a screen
/// mesh and a play affordance child on the first update after it appears.
#[derive(Component)]
pub struct VideoPlayer(pub MediaPlayer<BoxedMedia>);

impl VideoPlayer {
    pub fn new(
        resource: impl MediaResource + Send + Sync + 'static,
        config: PlayerConfig,
    ) -> Result<Self, PlayerError> {
        let boxed: BoxedMedia = Box::new(resource);
        MediaPlayer::new(boxed, config).map(Self)
    }
}

/// Spawn helper: a player plus the spatial components a mesh needs.
#[derive(Bundle)]
pub struct VideoPlayerBundle {
    pub player: VideoPlayer,
    pub spatial: SpatialBundle,
}

impl VideoPlayerBundle {
    pub fn new(player: VideoPlayer, transform: Transform) -> Self {
        Self {
            player,
            spatial: SpatialBundle::from_transform(transform),
        }
    }
}

/// Render-side state of a player, inserted by the plugin.
#[derive(Component, Debug)]
pub struct VideoScreen {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    /// Child entity carrying the play affordance.
    pub affordance: Entity,
    /// Geometry revision last mirrored into `mesh`.
    pub applied_revision: u32,
    pub frame: Option<FrameTarget>,
}

/// Image the live frames of one load are copied into.
#[derive(Debug, Clone)]
pub struct FrameTarget {
    pub image: Handle<Image>,
    pub ticket: LoadTicket,
    pub width: u32,
    pub height: u32,
    /// Resource frame sequence last copied; `None` until the first upload.
    pub uploaded: Option<u64>,
}

/// Marks the play affordance child of a screen.
#[derive(Component, Debug)]
pub struct PlayAffordanceMarker {
    pub owner: Entity,
}
