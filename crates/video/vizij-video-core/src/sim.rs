//! Deterministic in-memory media resource.
//!
//! Used by tests and by native demos that have no decoder. It keeps a
//! playback clock, raises the same signals a browser `<video>` element would,
//! and renders a moving test pattern as its "frames".

use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::ids::LoadTicket;
use crate::media::{MediaEvent, MediaResource, SourceDescriptor};

/// Shape of the simulated clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedMediaCfg {
    pub width: u32,
    pub height: u32,
    /// Clip length in seconds.
    pub duration: f32,
    /// Signal `CanPlay` as soon as `load` is called. When false, readiness
    /// must be triggered with [`SimulatedMedia::signal_ready`].
    pub ready_on_load: bool,
}

impl Default for SimulatedMediaCfg {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            duration: 10.0,
            ready_on_load: true,
        }
    }
}

/// Recorded resource call, for asserting on side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimCall {
    ClearSources,
    AttachSource(String),
    Load(LoadTicket),
    Play,
    Pause,
}

#[derive(Debug)]
pub struct SimulatedMedia {
    cfg: SimulatedMediaCfg,
    sources: Vec<SourceDescriptor>,
    /// Ticket of the most recent `load`.
    loading: Option<LoadTicket>,
    ready: bool,
    paused: bool,
    ended: bool,
    position: f32,
    volume: f32,
    muted: bool,
    autoplay: bool,
    looping: bool,
    frame_sequence: u64,
    queued: Vec<MediaEvent>,
    calls: Vec<SimCall>,
    fail_next_attach: Option<String>,
    fail_next_clear: Option<String>,
}

impl SimulatedMedia {
    pub fn new(cfg: SimulatedMediaCfg) -> Self {
        Self {
            cfg,
            sources: Vec::new(),
            loading: None,
            ready: false,
            paused: true,
            ended: false,
            position: 0.0,
            volume: 1.0,
            muted: false,
            autoplay: false,
            looping: false,
            frame_sequence: 0,
            queued: Vec::new(),
            calls: Vec::new(),
            fail_next_attach: None,
            fail_next_clear: None,
        }
    }

    /// Resource that waits for [`SimulatedMedia::signal_ready`].
    pub fn manual() -> Self {
        Self::new(SimulatedMediaCfg {
            ready_on_load: false,
            ..Default::default()
        })
    }

    /// Report readiness for the most recent load.
    pub fn signal_ready(&mut self) {
        if let Some(ticket) = self.loading {
            self.signal_ready_for(ticket);
        }
    }

    /// Report readiness for an arbitrary ticket, current or not.
    pub fn signal_ready_for(&mut self, ticket: LoadTicket) {
        if self.loading == Some(ticket) {
            self.ready = true;
        }
        self.queued.push(MediaEvent::CanPlay { ticket });
        if self.ready && self.autoplay && self.paused {
            self.start();
        }
    }

    /// Report that the load identified by `ticket` failed.
    pub fn signal_error_for(&mut self, ticket: LoadTicket, message: impl Into<String>) {
        if self.loading == Some(ticket) {
            self.ready = false;
        }
        self.queued.push(MediaEvent::Error {
            ticket: Some(ticket),
            message: message.into(),
        });
    }

    /// Queue a raw signal as if the backend raised it.
    pub fn emit(&mut self, event: MediaEvent) {
        self.queued.push(event);
    }

    /// Make the next `attach_source` fail with `message`.
    pub fn fail_next_attach(&mut self, message: impl Into<String>) {
        self.fail_next_attach = Some(message.into());
    }

    /// Make the next `clear_sources` fail with `message`, leaving sources attached.
    pub fn fail_next_clear(&mut self, message: impl Into<String>) {
        self.fail_next_clear = Some(message.into());
    }

    pub fn calls(&self) -> &[SimCall] {
        &self.calls
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    fn start(&mut self) {
        if self.ended {
            self.position = 0.0;
            self.ended = false;
        }
        self.paused = false;
        self.queued.push(MediaEvent::Playing);
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new(SimulatedMediaCfg::default())
    }
}

impl MediaResource for SimulatedMedia {
    fn clear_sources(&mut self) -> Result<(), MediaError> {
        self.calls.push(SimCall::ClearSources);
        if let Some(message) = self.fail_next_clear.take() {
            return Err(MediaError::backend(message));
        }
        self.sources.clear();
        self.ready = false;
        self.paused = true;
        self.position = 0.0;
        Ok(())
    }

    fn attach_source(&mut self, source: &SourceDescriptor) -> Result<(), MediaError> {
        self.calls.push(SimCall::AttachSource(source.uri.clone()));
        if let Some(message) = self.fail_next_attach.take() {
            return Err(MediaError::backend(message));
        }
        self.sources.push(source.clone());
        Ok(())
    }

    fn load(&mut self, ticket: LoadTicket) -> Result<(), MediaError> {
        self.calls.push(SimCall::Load(ticket));
        self.loading = Some(ticket);
        self.ready = false;
        self.paused = true;
        self.ended = false;
        self.position = 0.0;
        if self.sources.is_empty() {
            self.signal_error_for(ticket, "no source attached");
        } else if self.cfg.ready_on_load {
            self.signal_ready_for(ticket);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.calls.push(SimCall::Play);
        if self.paused {
            self.start();
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.calls.push(SimCall::Pause);
        if !self.paused {
            self.paused = true;
            self.queued.push(MediaEvent::Paused);
        }
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.ready.then_some((self.cfg.width, self.cfg.height))
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_autoplay(&self) -> bool {
        self.autoplay
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    fn is_loop(&self) -> bool {
        self.looping
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn drain_events(&mut self, out: &mut Vec<MediaEvent>) {
        out.append(&mut self.queued);
    }

    fn advance(&mut self, dt: f32) {
        if self.paused || !self.ready || dt <= 0.0 {
            return;
        }
        self.position += dt;
        self.frame_sequence = self.frame_sequence.wrapping_add(1);

        let duration = self.cfg.duration.max(f32::EPSILON);
        if self.position >= duration {
            if self.looping {
                self.position %= duration;
            } else {
                // Browsers raise `pause` before `ended` at the end of a clip.
                self.position = duration;
                self.paused = true;
                self.ended = true;
                self.queued.push(MediaEvent::Paused);
                self.queued.push(MediaEvent::Ended);
            }
        }
    }

    fn frame_sequence(&self) -> u64 {
        self.frame_sequence
    }

    fn copy_frame_rgba(&self, dst: &mut [u8]) -> bool {
        let (w, h) = (self.cfg.width as usize, self.cfg.height as usize);
        if !self.ready || dst.len() != w * h * 4 {
            return false;
        }
        // Vertical bar sweeping across a gradient, one sweep per clip.
        let progress = (self.position / self.cfg.duration.max(f32::EPSILON)).clamp(0.0, 1.0);
        let bar = (progress * w.saturating_sub(1) as f32) as usize;
        for (i, px) in dst.chunks_exact_mut(4).enumerate() {
            let (x, y) = (i % w, i / w);
            let on_bar = x.abs_diff(bar) < 4;
            px[0] = if on_bar { 255 } else { (x * 255 / w.max(1)) as u8 };
            px[1] = if on_bar { 255 } else { (y * 255 / h.max(1)) as u8 };
            px[2] = if on_bar { 255 } else { 96 };
            px[3] = 255;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> SimulatedMedia {
        let mut media = SimulatedMedia::new(SimulatedMediaCfg {
            width: 4,
            height: 2,
            duration: 1.0,
            ready_on_load: true,
        });
        media.attach_source(&SourceDescriptor::new("a.mp4")).unwrap();
        media.load(LoadTicket(1)).unwrap();
        media
    }

    fn drain(media: &mut SimulatedMedia) -> Vec<MediaEvent> {
        let mut out = Vec::new();
        media.drain_events(&mut out);
        out
    }

    #[test]
    fn load_without_source_signals_error() {
        let mut media = SimulatedMedia::default();
        media.load(LoadTicket(1)).unwrap();
        assert!(matches!(
            drain(&mut media)[..],
            [MediaEvent::Error {
                ticket: Some(LoadTicket(1)),
                ..
            }]
        ));
    }

    #[test]
    fn clip_end_raises_pause_then_ended() {
        let mut media = loaded();
        drain(&mut media);
        media.play().unwrap();
        media.advance(0.6);
        media.advance(0.6);
        assert_eq!(
            drain(&mut media),
            vec![MediaEvent::Playing, MediaEvent::Paused, MediaEvent::Ended]
        );
        assert!(media.is_ended());
        assert!(media.is_paused());
    }

    #[test]
    fn looping_wraps_clock() {
        let mut media = loaded();
        media.set_loop(true);
        media.play().unwrap();
        media.advance(0.75);
        media.advance(0.5);
        assert!(!media.is_paused());
        assert!((media.position() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn autoplay_starts_on_ready() {
        let mut media = SimulatedMedia::default();
        media.set_autoplay(true);
        media.attach_source(&SourceDescriptor::new("a.mp4")).unwrap();
        media.load(LoadTicket(7)).unwrap();
        assert_eq!(
            drain(&mut media),
            vec![
                MediaEvent::CanPlay {
                    ticket: LoadTicket(7)
                },
                MediaEvent::Playing
            ]
        );
    }

    #[test]
    fn frames_require_matching_buffer() {
        let media = loaded();
        let mut small = vec![0u8; 4];
        assert!(!media.copy_frame_rgba(&mut small));
        let mut frame = vec![0u8; 4 * 2 * 4];
        assert!(media.copy_frame_rgba(&mut frame));
        assert!(frame.chunks_exact(4).all(|px| px[3] == 255));
    }
}
