//! Audio-focus signals derived from engine events.

use bridge_traits::{AudioFocusChange, PlayIntentChangeReason, SuppressionReason};

/// Focus was taken by another app for good.
pub const FOCUS_LOST: AudioFocusChange = AudioFocusChange::new(true, true, false);

/// Output route went away (headphones unplugged).
pub const BECOMING_NOISY: AudioFocusChange = AudioFocusChange::new(false, true, false);

/// Focus is temporarily held elsewhere.
pub const TRANSIENT_LOSS: AudioFocusChange = AudioFocusChange::new(false, true, true);

/// Suppression cleared.
pub const RESTORED: AudioFocusChange = AudioFocusChange::new(false, false, false);

/// Focus change implied by a play-intent change, if any.
pub fn from_play_intent(reason: PlayIntentChangeReason) -> Option<AudioFocusChange> {
    match reason {
        PlayIntentChangeReason::AudioFocusLoss => Some(FOCUS_LOST),
        PlayIntentChangeReason::AudioBecomingNoisy => Some(BECOMING_NOISY),
        _ => None,
    }
}

/// Focus change implied by a suppression-reason change.
pub fn from_suppression(reason: SuppressionReason) -> AudioFocusChange {
    match reason {
        SuppressionReason::TransientAudioFocusLoss => TRANSIENT_LOSS,
        SuppressionReason::None | SuppressionReason::Other => RESTORED,
    }
}
