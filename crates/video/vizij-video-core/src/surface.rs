//! Descriptors the host renders from.
//!
//! The player never touches meshes or textures itself; it keeps these small
//! values up to date and the host mirrors them into its scene graph.

use serde::{Deserialize, Serialize};

use crate::config::Rgb;
use crate::ids::LoadTicket;

/// Edge length of the play affordance plane (the screen is 1.0 tall).
pub const AFFORDANCE_SIZE: f32 = 0.6;
/// Distance the affordance sits in front of the screen to avoid z-fighting.
pub const AFFORDANCE_Z_OFFSET: f32 = 0.001;

/// What the screen material samples from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureBinding {
    /// Plain base colour, no texture.
    #[default]
    Cleared,
    /// Live frames of the load identified by `ticket`.
    LiveVideo { ticket: LoadTicket },
}

/// The screen plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    pub visible: bool,
    /// Width of the plane for a height of 1.0.
    pub aspect_ratio: f32,
    pub texture: TextureBinding,
    /// Bumped every time the plane geometry is rebuilt.
    pub geometry_revision: u32,
}

impl Default for SurfaceDescriptor {
    fn default() -> Self {
        Self {
            visible: false,
            aspect_ratio: 1.0,
            texture: TextureBinding::Cleared,
            geometry_revision: 0,
        }
    }
}

impl SurfaceDescriptor {
    /// Plane extents `(width, height)`.
    pub fn size(&self) -> (f32, f32) {
        (self.aspect_ratio, 1.0)
    }
}

/// Play/pause overlay drawn in front of the screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayAffordance {
    pub visible: bool,
    pub tint: Rgb,
    pub size: f32,
    pub z_offset: f32,
}

impl PlayAffordance {
    pub fn new(tint: Rgb) -> Self {
        Self {
            visible: false,
            tint,
            size: AFFORDANCE_SIZE,
            z_offset: AFFORDANCE_Z_OFFSET,
        }
    }
}
