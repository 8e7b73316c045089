//! Outbound event contract.
//!
//! The playback core reports every normalized event through an
//! [`EventDispatcher`] owned by the host (or the bus in `core-runtime`).
//! Implementations are called from the engine's event context and from
//! command callers, so they must be cheap and must not block.

use crate::metadata::UnifiedMetadata;
use crate::platform::PlatformSendSync;
use crate::playback::{AudioFocusChange, ErrorCode, PlaybackState, Track};
use std::time::Duration;

pub trait EventDispatcher: PlatformSendSync {
    /// Playback entered the playing category.
    fn on_play(&self);

    /// Playback entered the paused category.
    fn on_pause(&self);

    /// Playback entered the stopped category.
    fn on_stop(&self);

    /// The derived playback state changed.
    fn on_state_change(&self, state: PlaybackState);

    /// The current track changed, or playback ended (`next_index` is `None`).
    ///
    /// `previous_position` is where the previous track stopped; for natural
    /// end-of-track advances it is the track's full duration.
    fn on_track_update(
        &self,
        previous_index: Option<usize>,
        previous_position: Duration,
        next_index: Option<usize>,
        next_track: Option<Track>,
    );

    /// The queue finished playing.
    fn on_end(&self, index: Option<usize>, position: Duration);

    fn on_audio_focus_change(&self, change: AudioFocusChange);

    /// A fatal engine error was classified.
    fn on_error(&self, code: ErrorCode, message: &str);

    fn on_metadata_received(&self, metadata: &UnifiedMetadata);

    /// The currently playing track was replaced in the queue; now-playing
    /// surfaces should refresh from `track`.
    fn on_track_metadata(&self, index: usize, track: &Track, playing: bool);
}
