//! Notifications emitted by the player.
//!
//! Adapters drain these after each update and forward them to the host
//! (Bevy events, JS arrays). They are informational only; the descriptors in
//! [`crate::surface`] remain the source of truth for rendering.

use serde::{Deserialize, Serialize};

use crate::ids::LoadTicket;
use crate::state::PlayerState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum PlayerEvent {
    StateChanged {
        from: PlayerState,
        to: PlayerState,
    },
    AffordanceChanged {
        visible: bool,
    },
    GeometryChanged {
        aspect_ratio: f32,
        revision: u32,
    },
    /// A newer `set_source` replaced a load that had not become ready.
    LoadSuperseded {
        ticket: LoadTicket,
    },
    /// A readiness signal arrived for a load that is no longer current.
    StaleSignalIgnored {
        ticket: LoadTicket,
    },
    MediaFailed {
        message: String,
    },
}
