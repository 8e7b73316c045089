//! Playback state derivation.
//!
//! The reported [`PlaybackState`] is a pure function of the engine's raw
//! signals. [`StateTracker`] turns the derived value into edge-triggered
//! transitions.

use bridge_traits::{PlaybackState, PlayerPhase, SuppressionReason};

/// Raw engine signals the state is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSignals {
    pub phase: PlayerPhase,
    pub play_when_ready: bool,
    pub suppression: SuppressionReason,
    pub is_playing: bool,
}

impl EngineSignals {
    /// Derive the normalized state from these signals.
    ///
    /// ```
    /// use bridge_traits::{PlaybackState, PlayerPhase, SuppressionReason};
    /// use core_playback::state::EngineSignals;
    ///
    /// let signals = EngineSignals {
    ///     phase: PlayerPhase::Buffering,
    ///     play_when_ready: false,
    ///     suppression: SuppressionReason::None,
    ///     is_playing: false,
    /// };
    /// assert_eq!(signals.derive(), PlaybackState::Connecting);
    /// ```
    pub fn derive(&self) -> PlaybackState {
        match self.phase {
            PlayerPhase::Idle => PlaybackState::None,
            PlayerPhase::Ended => PlaybackState::Stopped,
            PlayerPhase::Buffering if self.play_when_ready => PlaybackState::Buffering,
            PlayerPhase::Buffering => PlaybackState::Connecting,
            PlayerPhase::Ready => {
                let actually_playing =
                    self.is_playing && self.suppression == SuppressionReason::None;
                if self.play_when_ready && actually_playing {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                }
            }
        }
    }
}

/// Coarse grouping used for play/pause/stop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCategory {
    Playing,
    Paused,
    Stopped,
}

impl From<PlaybackState> for StateCategory {
    fn from(state: PlaybackState) -> Self {
        if state.is_playing() {
            StateCategory::Playing
        } else if state.is_paused() {
            StateCategory::Paused
        } else {
            StateCategory::Stopped
        }
    }
}

/// A reported state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub previous: PlaybackState,
    pub current: PlaybackState,
}

impl StateTransition {
    /// The category entered by this transition, if it differs from the
    /// previous one.
    pub fn entered_category(&self) -> Option<StateCategory> {
        let from = StateCategory::from(self.previous);
        let to = StateCategory::from(self.current);
        (from != to).then_some(to)
    }
}

/// Remembers the last reported state.
#[derive(Debug, Default)]
pub struct StateTracker {
    reported: PlaybackState,
}

impl StateTracker {
    pub fn current(&self) -> PlaybackState {
        self.reported
    }

    /// Record `state`, returning the transition when it differs from the
    /// last reported one.
    pub fn update(&mut self, state: PlaybackState) -> Option<StateTransition> {
        if state == self.reported {
            return None;
        }
        let transition = StateTransition {
            previous: self.reported,
            current: state,
        };
        self.reported = state;
        Some(transition)
    }
}
