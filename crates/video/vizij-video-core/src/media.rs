//! The media resource collaborator.
//!
//! A [`MediaResource`] is whatever actually decodes the video: a browser
//! `<video>` element, a native decoder, or [`crate::SimulatedMedia`]. The player
//! drives it through this trait and learns about asynchronous progress by
//! draining [`MediaEvent`]s from it.

use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::ids::LoadTicket;

/// MIME type attached to sources when none is given.
pub const DEFAULT_SOURCE_MIME: &str = "video/mp4";

/// One source attached to the resource before a load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub uri: String,
    pub mime: String,
}

impl SourceDescriptor {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime: DEFAULT_SOURCE_MIME.to_string(),
        }
    }
}

/// Signals raised by the resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaEvent {
    /// Enough data is buffered to start playback of the load identified by `ticket`.
    CanPlay { ticket: LoadTicket },
    /// Playback began (or resumed).
    Playing,
    Paused,
    Ended,
    /// The backend gave up on a source. `ticket` names the load it belongs
    /// to; `None` when the backend cannot attribute it to a load.
    Error {
        #[serde(default)]
        ticket: Option<LoadTicket>,
        message: String,
    },
}

/// Operations the player needs from a decodable media primitive.
pub trait MediaResource {
    /// Detach every source currently attached.
    fn clear_sources(&mut self) -> Result<(), MediaError>;

    fn attach_source(&mut self, source: &SourceDescriptor) -> Result<(), MediaError>;

    /// Begin loading the attached source. Must not block; readiness is
    /// reported later as `MediaEvent::CanPlay { ticket }`.
    fn load(&mut self, ticket: LoadTicket) -> Result<(), MediaError>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self) -> Result<(), MediaError>;

    fn is_paused(&self) -> bool;

    /// Intrinsic frame size once known.
    fn video_dimensions(&self) -> Option<(u32, u32)>;

    fn volume(&self) -> f32;
    /// Receives values already clamped into [0, 1].
    fn set_volume(&mut self, volume: f32);

    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    fn is_autoplay(&self) -> bool;
    fn set_autoplay(&mut self, autoplay: bool);

    fn is_loop(&self) -> bool;
    fn set_loop(&mut self, looping: bool);

    /// Move buffered signals into `out`, oldest first.
    fn drain_events(&mut self, out: &mut Vec<MediaEvent>);

    /// Host clock tick in seconds. Backends with their own clock ignore it.
    fn advance(&mut self, _dt: f32) {}

    /// Monotonic counter bumped whenever a new frame is available.
    fn frame_sequence(&self) -> u64 {
        0
    }

    /// Copy the latest frame as tightly packed RGBA8 into `dst`
    /// (`width * height * 4` bytes). Returns false when no frame was written.
    fn copy_frame_rgba(&self, _dst: &mut [u8]) -> bool {
        false
    }
}

impl<M: MediaResource + ?Sized> MediaResource for Box<M> {
    fn clear_sources(&mut self) -> Result<(), MediaError> {
        (**self).clear_sources()
    }
    fn attach_source(&mut self, source: &SourceDescriptor) -> Result<(), MediaError> {
        (**self).attach_source(source)
    }
    fn load(&mut self, ticket: LoadTicket) -> Result<(), MediaError> {
        (**self).load(ticket)
    }
    fn play(&mut self) -> Result<(), MediaError> {
        (**self).play()
    }
    fn pause(&mut self) -> Result<(), MediaError> {
        (**self).pause()
    }
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
    fn video_dimensions(&self) -> Option<(u32, u32)> {
        (**self).video_dimensions()
    }
    fn volume(&self) -> f32 {
        (**self).volume()
    }
    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
    fn is_muted(&self) -> bool {
        (**self).is_muted()
    }
    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }
    fn is_autoplay(&self) -> bool {
        (**self).is_autoplay()
    }
    fn set_autoplay(&mut self, autoplay: bool) {
        (**self).set_autoplay(autoplay)
    }
    fn is_loop(&self) -> bool {
        (**self).is_loop()
    }
    fn set_loop(&mut self, looping: bool) {
        (**self).set_loop(looping)
    }
    fn drain_events(&mut self, out: &mut Vec<MediaEvent>) {
        (**self).drain_events(out)
    }
    fn advance(&mut self, dt: f32) {
        (**self).advance(dt)
    }
    fn frame_sequence(&self) -> u64 {
        (**self).frame_sequence()
    }
    fn copy_frame_rgba(&self, dst: &mut [u8]) -> bool {
        (**self).copy_frame_rgba(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults_to_mp4() {
        let src = SourceDescriptor::new("clip.mp4");
        assert_eq!(src.mime, "video/mp4");
    }

    #[test]
    fn events_are_tagged_json() {
        let ev = MediaEvent::CanPlay {
            ticket: LoadTicket(3),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "can_play");
        assert_eq!(json["ticket"], 3);
        let back: MediaEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }
}
