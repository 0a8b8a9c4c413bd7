//! Vizij Video Core (engine-agnostic)
//!
//! A small state machine that owns a media resource (a `<video>` element, a
//! native decoder, a simulated clip) and mirrors its lifecycle into two host
//! visuals: the screen surface and the play affordance drawn on top of it.
//! Adapters (Bevy/WASM) read [`SurfaceDescriptor`] and [`PlayAffordance`] each
//! frame and forward resource signals through [`MediaPlayer::update`].

pub mod config;
pub mod error;
pub mod ids;
pub mod media;
pub mod outputs;
pub mod player;
pub mod sim;
pub mod state;
pub mod surface;

// Re-exports for consumers (adapters)
pub use config::{PlayerConfig, Rgb};
pub use error::{MediaError, PlayerError};
pub use ids::{LoadTicket, TicketAllocator};
pub use media::{MediaEvent, MediaResource, SourceDescriptor, DEFAULT_SOURCE_MIME};
pub use outputs::PlayerEvent;
pub use player::MediaPlayer;
pub use sim::{SimulatedMedia, SimulatedMediaCfg};
pub use state::{IgnoreReason, PlayerState, StateChange};
pub use surface::{PlayAffordance, SurfaceDescriptor, TextureBinding};
