//! MediaPlayer: the state machine tying a media resource to its host visuals.
//!
//! Methods:
//! - new, set_source, clear_source, play/pause/toggle_playback
//! - update (advance resource clock -> drain signals -> transitions)
//! - passthroughs for volume/muted/autoplay/loop

use log::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::error::{MediaError, PlayerError};
use crate::ids::{LoadTicket, TicketAllocator};
use crate::media::{MediaEvent, MediaResource, SourceDescriptor};
use crate::outputs::PlayerEvent;
use crate::state::{IgnoreReason, PlayerState, StateChange};
use crate::surface::{PlayAffordance, SurfaceDescriptor, TextureBinding};

/// Video player controller owning one media resource.
///
/// All mutation goes through `&mut self`, so a transition (including the
/// resource calls it makes) always finishes before the next one starts.
/// Signals the resource raises meanwhile stay buffered inside it until the
/// next [`MediaPlayer::update`].
#[derive(Debug)]
pub struct MediaPlayer<R: MediaResource> {
    state: PlayerState,
    constructed: bool,
    resource: R,
    source: Option<SourceDescriptor>,
    tickets: TicketAllocator,
    /// Ticket of the load currently waiting for readiness.
    pending: Option<LoadTicket>,
    surface: SurfaceDescriptor,
    affordance: PlayAffordance,
    events: Vec<PlayerEvent>,
    inbox: Vec<MediaEvent>,
}

impl<R: MediaResource> MediaPlayer<R> {
    /// Build a player around `resource`, apply `config`, and start loading
    /// `config.source` when one is given.
    pub fn new(resource: R, config: PlayerConfig) -> Result<Self, PlayerError> {
        let mut player = Self {
            state: PlayerState::Uninitialized,
            constructed: false,
            resource,
            source: None,
            tickets: TicketAllocator::new(),
            pending: None,
            surface: SurfaceDescriptor::default(),
            affordance: PlayAffordance::new(config.play_btn_color),
            events: Vec::new(),
            inbox: Vec::new(),
        };

        player.resource.set_muted(config.muted);
        player.resource.set_autoplay(config.autoplay);
        player.resource.set_loop(config.loop_playback);
        if let Some(volume) = config.volume {
            player.set_volume(volume);
        }

        player.constructed = true;
        player.set_state(PlayerState::NoSource);

        // A blank initial source means "start without one".
        if let Some(source) = config.source.as_deref().filter(|s| !s.trim().is_empty()) {
            player.set_source(source)?;
        }
        Ok(player)
    }

    // --- state machine -------------------------------------------------

    /// Move to `target`, running that state's entry side effects.
    ///
    /// Same-state requests, requests before construction completes, and
    /// requests without an edge are ignored and leave everything untouched.
    pub(crate) fn set_state(&mut self, target: PlayerState) -> StateChange {
        if !self.constructed {
            return StateChange::Ignored(IgnoreReason::NotConstructed);
        }
        if target == self.state {
            debug!("video player already {target:?}; ignoring");
            return StateChange::Ignored(IgnoreReason::SameState);
        }
        if !self.state.can_transition_to(target) {
            warn!(
                "video player has no transition {:?} -> {target:?}; ignoring",
                self.state
            );
            return StateChange::Ignored(IgnoreReason::NoEdge);
        }

        let from = self.state;
        self.state = target;
        match target {
            PlayerState::NoSource => {
                self.surface.texture = TextureBinding::Cleared;
                self.surface.visible = true;
                self.set_affordance(false);
            }
            PlayerState::Loading => {
                self.surface.texture = TextureBinding::Cleared;
                self.set_affordance(false);
            }
            PlayerState::Ready => {
                self.rebuild_geometry();
                self.surface.texture = TextureBinding::LiveVideo {
                    ticket: self.tickets.current().unwrap_or_default(),
                };
                self.surface.visible = true;
                self.set_affordance(true);
            }
            PlayerState::Uninitialized => {}
        }

        debug!("video player {from:?} -> {target:?}");
        self.events.push(PlayerEvent::StateChanged { from, to: target });
        StateChange::Applied { from, to: target }
    }

    fn rebuild_geometry(&mut self) {
        let aspect = match self.resource.video_dimensions() {
            Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
            other => {
                warn!("video dimensions unavailable ({other:?}); using a square screen");
                1.0
            }
        };
        self.surface.aspect_ratio = aspect;
        self.surface.geometry_revision = self.surface.geometry_revision.wrapping_add(1);
        self.events.push(PlayerEvent::GeometryChanged {
            aspect_ratio: aspect,
            revision: self.surface.geometry_revision,
        });
    }

    fn set_affordance(&mut self, visible: bool) {
        if self.affordance.visible != visible {
            self.affordance.visible = visible;
            self.events.push(PlayerEvent::AffordanceChanged { visible });
        }
    }

    // --- sources -------------------------------------------------------

    /// Replace the current source and start loading it.
    ///
    /// Valid from `NoSource`, `Loading` (superseding the pending load) and
    /// `Ready`. Returns the ticket the resource will echo when ready. If the
    /// resource fails, the player falls back to `NoSource` and the error is
    /// returned.
    pub fn set_source(&mut self, uri: &str) -> Result<LoadTicket, PlayerError> {
        if !self.constructed || self.state == PlayerState::Uninitialized {
            return Err(PlayerError::invalid_argument(
                "cannot set a source before the player is initialized",
            ));
        }
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(PlayerError::invalid_argument("source must be a non-empty string"));
        }

        if let Some(previous) = self.pending.take() {
            info!("video load {previous:?} superseded by {uri}");
            self.events.push(PlayerEvent::LoadSuperseded { ticket: previous });
        }

        match self.begin_load(SourceDescriptor::new(uri)) {
            Ok(ticket) => {
                info!("video source set to {uri} ({ticket:?})");
                Ok(ticket)
            }
            Err(err) => {
                self.fail_to_no_source(&err);
                Err(err.into())
            }
        }
    }

    fn begin_load(&mut self, descriptor: SourceDescriptor) -> Result<LoadTicket, MediaError> {
        self.resource.clear_sources()?;
        self.resource.attach_source(&descriptor)?;
        self.source = Some(descriptor);

        let ticket = self.tickets.alloc();
        self.pending = Some(ticket);
        self.set_state(PlayerState::Loading);
        self.resource.load(ticket)?;
        Ok(ticket)
    }

    fn fail_to_no_source(&mut self, err: &MediaError) {
        warn!("video source failed: {err}");
        self.events.push(PlayerEvent::MediaFailed {
            message: err.to_string(),
        });
        self.pending = None;
        self.source = None;
        self.set_state(PlayerState::NoSource);
    }

    /// Drop the current source. No-op unless `Loading` or `Ready`.
    pub fn clear_source(&mut self) -> Result<(), PlayerError> {
        if !matches!(self.state, PlayerState::Loading | PlayerState::Ready) {
            return Ok(());
        }
        if let Err(err) = self.resource.clear_sources() {
            warn!("clearing video sources failed: {err}");
            self.events.push(PlayerEvent::MediaFailed {
                message: err.to_string(),
            });
            return Err(err.into());
        }
        self.pending = None;
        self.source = None;
        self.set_state(PlayerState::NoSource);
        info!("video source cleared");
        Ok(())
    }

    // --- resource signals ------------------------------------------------

    /// Advance the resource clock by `dt` seconds and process every signal it
    /// buffered, oldest first. Returns the number of signals handled.
    pub fn update(&mut self, dt: f32) -> usize {
        self.resource.advance(dt);
        let mut inbox = std::mem::take(&mut self.inbox);
        self.resource.drain_events(&mut inbox);
        let count = inbox.len();
        for event in inbox.drain(..) {
            self.handle_event(event);
        }
        self.inbox = inbox;
        count
    }

    /// Process one resource signal.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::CanPlay { ticket } => {
                if self.state == PlayerState::Loading && self.pending == Some(ticket) {
                    self.pending = None;
                    self.set_state(PlayerState::Ready);
                    info!("video ready ({ticket:?}, aspect {:.3})", self.surface.aspect_ratio);
                } else if self.is_live(ticket) {
                    // Seeks, loop wrap-around and stalls re-raise readiness.
                    debug!("repeated readiness for live load {ticket:?}");
                } else {
                    warn!(
                        "ignoring stale readiness for {ticket:?} (state {:?}, pending {:?})",
                        self.state, self.pending
                    );
                    self.events.push(PlayerEvent::StaleSignalIgnored { ticket });
                }
            }
            MediaEvent::Playing => self.affordance_signal(false),
            MediaEvent::Paused | MediaEvent::Ended => self.affordance_signal(true),
            MediaEvent::Error { ticket, message } => match ticket {
                Some(ticket) if self.pending == Some(ticket) => {
                    warn!("video load {ticket:?} failed: {message}");
                    self.events.push(PlayerEvent::MediaFailed { message });
                    self.pending = None;
                    self.source = None;
                    self.set_state(PlayerState::NoSource);
                }
                Some(ticket) if !self.is_live(ticket) => {
                    warn!("ignoring error from superseded load {ticket:?}: {message}");
                    self.events.push(PlayerEvent::StaleSignalIgnored { ticket });
                }
                _ => {
                    warn!("video resource reported an error: {message}");
                    self.events.push(PlayerEvent::MediaFailed { message });
                }
            },
        }
    }

    /// Whether `ticket` is the load currently bound to the surface.
    fn is_live(&self, ticket: LoadTicket) -> bool {
        self.state == PlayerState::Ready && self.tickets.current() == Some(ticket)
    }

    /// Paused/ended/playing signals drive the affordance, but only while
    /// `Ready`; outside it the affordance stays hidden.
    fn affordance_signal(&mut self, visible: bool) {
        if self.state == PlayerState::Ready {
            self.set_affordance(visible);
        } else {
            debug!("affordance signal ({visible}) ignored in {:?}", self.state);
        }
    }

    /// Notifications since the last call.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    // --- playback ------------------------------------------------------

    pub fn play(&mut self) -> Result<(), PlayerError> {
        if self.state != PlayerState::Ready {
            return Ok(());
        }
        self.resource.play()?;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        if self.state != PlayerState::Ready {
            return Ok(());
        }
        self.resource.pause()?;
        Ok(())
    }

    /// Play when paused, pause when playing. Returns whether a command was
    /// issued (false when not `Ready`).
    pub fn toggle_playback(&mut self) -> Result<bool, PlayerError> {
        if !self.can_play() {
            return Ok(false);
        }
        if self.resource.is_paused() {
            self.resource.play()?;
        } else {
            self.resource.pause()?;
        }
        Ok(true)
    }

    #[inline]
    pub fn can_play(&self) -> bool {
        self.state == PlayerState::Ready
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.resource.is_paused()
    }

    // --- passthroughs --------------------------------------------------

    /// Saturates into [0, 1]. NaN leaves the volume unchanged.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        self.resource.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn volume(&self) -> f32 {
        self.resource.volume()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.resource.set_muted(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.resource.is_muted()
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.resource.set_autoplay(autoplay);
    }

    pub fn is_autoplay(&self) -> bool {
        self.resource.is_autoplay()
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.resource.set_loop(looping);
    }

    pub fn is_loop(&self) -> bool {
        self.resource.is_loop()
    }

    // --- accessors -----------------------------------------------------

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn source_uri(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.uri.as_str())
    }

    /// Ticket of the most recent load request.
    pub fn current_ticket(&self) -> Option<LoadTicket> {
        self.tickets.current()
    }

    pub fn surface(&self) -> &SurfaceDescriptor {
        &self.surface
    }

    pub fn affordance(&self) -> &PlayAffordance {
        &self.affordance
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}
