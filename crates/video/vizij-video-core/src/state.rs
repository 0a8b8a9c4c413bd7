//! Player lifecycle states and the edges between them.

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`crate::MediaPlayer`].
///
/// `Uninitialized` only exists while the player is being constructed; after
/// that the player cycles between the other three for its whole life.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    #[default]
    Uninitialized,
    NoSource,
    Loading,
    Ready,
}

impl PlayerState {
    pub const ALL: [PlayerState; 4] = [
        PlayerState::Uninitialized,
        PlayerState::NoSource,
        PlayerState::Loading,
        PlayerState::Ready,
    ];

    /// Numeric code used by JS hosts (0..=3).
    pub fn code(self) -> u8 {
        match self {
            PlayerState::Uninitialized => 0,
            PlayerState::NoSource => 1,
            PlayerState::Loading => 2,
            PlayerState::Ready => 3,
        }
    }

    /// Decode a raw state code; unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Whether the machine has an edge `self -> to`.
    ///
    /// Re-entering `Loading` from `Loading` is handled by the player as a
    /// superseding load, not as a state edge.
    pub fn can_transition_to(self, to: PlayerState) -> bool {
        use PlayerState::*;
        matches!(
            (self, to),
            (Uninitialized, NoSource)
                | (NoSource, Loading)
                | (Ready, Loading)
                | (Loading, Ready)
                | (Loading, NoSource)
                | (Ready, NoSource)
        )
    }
}

/// Why a state request produced no transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Requested state equals the current one.
    SameState,
    /// Construction has not completed yet.
    NotConstructed,
    /// No edge from the current state to the requested one.
    NoEdge,
}

/// Result of a state request. Requests never fail; they either apply or are
/// ignored with a reason.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    Applied { from: PlayerState, to: PlayerState },
    Ignored(IgnoreReason),
}

impl StateChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, StateChange::Applied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_reject_unknown() {
        for s in PlayerState::ALL {
            assert_eq!(PlayerState::from_code(s.code()), Some(s));
        }
        assert_eq!(PlayerState::from_code(4), None);
        assert_eq!(PlayerState::from_code(u8::MAX), None);
    }

    #[test]
    fn edge_table() {
        use PlayerState::*;
        assert!(Uninitialized.can_transition_to(NoSource));
        assert!(NoSource.can_transition_to(Loading));
        assert!(Loading.can_transition_to(Ready));
        assert!(Ready.can_transition_to(NoSource));
        assert!(Ready.can_transition_to(Loading));

        assert!(!NoSource.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Uninitialized));
        assert!(!Uninitialized.can_transition_to(Loading));
        for s in PlayerState::ALL {
            assert!(!s.can_transition_to(s), "{s:?} must not self-loop");
        }
    }
}
