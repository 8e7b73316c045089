//! Playback engine contract and the value types shared across it.
//!
//! The host owns the actual media engine (decoding, rendering, buffering,
//! network fetch). The core only sees it through [`PlaybackEngine`]: a set of
//! synchronous accessors and fire-and-forget commands, plus a single
//! [`EngineListener`] through which the engine delivers raw events.

use crate::metadata::MetadataEntry;
use crate::platform::PlatformSendSync;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Weak;
use std::time::Duration;

// ============================================================================
// Track
// ============================================================================

/// A playable queue item.
///
/// Tracks carry no identifier; they are addressed by their queue index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    /// Media location handed to the engine.
    pub url: String,
    /// Authoritative duration. When set and non-zero it overrides whatever
    /// the engine reports.
    pub duration: Option<Duration>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
    /// Artwork URI surfaced to media sessions.
    pub artwork: Option<String>,
}

impl Track {
    /// Create a track pointing at `url` with no metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }
}

// ============================================================================
// Playback State
// ============================================================================

/// Normalized playback state reported to the dispatcher.
///
/// Always derived from engine signals, never assigned directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    None,
    Connecting,
    Buffering,
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    /// Playing, or buffering with the intent to play.
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Buffering)
    }

    /// Paused, or loading without the intent to play.
    pub fn is_paused(self) -> bool {
        matches!(self, PlaybackState::Paused | PlaybackState::Connecting)
    }

    /// Stopped or idle.
    pub fn is_stopped(self) -> bool {
        matches!(self, PlaybackState::Stopped | PlaybackState::None)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::None => "none",
            PlaybackState::Connecting => "connecting",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Raw Engine Signals
// ============================================================================

/// Discrete engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerPhase {
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// Why the engine is holding back playback even though play is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SuppressionReason {
    #[default]
    None,
    TransientAudioFocusLoss,
    Other,
}

/// Why the engine's play-when-ready flag changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayIntentChangeReason {
    UserRequest,
    AudioFocusLoss,
    AudioBecomingNoisy,
    Remote,
    EndOfMediaItem,
}

/// Why the current media item changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionReason {
    /// Playback advanced on its own because the previous item ended.
    AutoTransition,
    /// The same item started over because of the repeat mode.
    Repeat,
    Seek,
    PlaylistChanged,
}

/// Speed and pitch applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackParameters {
    pub speed: f32,
    pub pitch: f32,
}

impl PlaybackParameters {
    pub fn new(speed: f32, pitch: f32) -> Self {
        Self { speed, pitch }
    }
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 1.0,
        }
    }
}

/// Repeat behavior at the end of a track or of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    Queue,
}

/// Engine capability variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Renders on this device.
    Local,
    /// Drives a remote renderer (cast target and similar).
    Remote,
}

// ============================================================================
// Errors and Codes
// ============================================================================

/// Wire-level error codes reported to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "index_out_of_bounds")]
    IndexOutOfBounds,
    #[serde(rename = "no_previous_track")]
    NoPreviousTrack,
    #[serde(rename = "queue_exhausted")]
    QueueExhausted,
    /// Network or I/O failure while reading the media source.
    #[serde(rename = "playback-source")]
    PlaybackSource,
    /// Decoder or renderer failure.
    #[serde(rename = "playback-renderer")]
    PlaybackRenderer,
    /// Anything not classified above.
    #[serde(rename = "playback")]
    Playback,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::IndexOutOfBounds => "index_out_of_bounds",
            ErrorCode::NoPreviousTrack => "no_previous_track",
            ErrorCode::QueueExhausted => "queue_exhausted",
            ErrorCode::PlaybackSource => "playback-source",
            ErrorCode::PlaybackRenderer => "playback-renderer",
            ErrorCode::Playback => "playback",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of the underlying cause of a fatal engine error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CauseKind {
    /// HTTP/data-source layer failure.
    HttpDataSource,
    /// Renderer or decoder failure.
    Renderer,
    /// Engine-specific cause the core does not know about.
    Other(String),
}

/// Underlying cause attached to an [`EngineError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCause {
    pub kind: CauseKind,
    pub message: Option<String>,
}

impl ErrorCause {
    pub fn new(kind: CauseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

/// Fatal error raised by the engine. Playback has stopped when this arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub message: String,
    pub cause: Option<ErrorCause>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: ErrorCause) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EngineError {}

// ============================================================================
// Audio Focus
// ============================================================================

/// Audio-focus signal forwarded to the dispatcher.
///
/// The core only reports these; deciding how the rest of the app reacts is
/// up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AudioFocusChange {
    pub paused: bool,
    pub ducked: bool,
    pub permanent_loss: bool,
}

impl AudioFocusChange {
    pub const fn new(paused: bool, ducked: bool, permanent_loss: bool) -> Self {
        Self {
            paused,
            ducked,
            permanent_loss,
        }
    }
}

// ============================================================================
// Engine Events & Traits
// ============================================================================

/// Raw event delivered by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PhaseChanged(PlayerPhase),
    PlayIntentChanged {
        play_when_ready: bool,
        reason: PlayIntentChangeReason,
    },
    SuppressionChanged(SuppressionReason),
    MediaItemTransition(TransitionReason),
    /// One metadata batch per selected format that carries metadata.
    TracksChanged(Vec<Vec<MetadataEntry>>),
    /// Timed metadata surfaced while playing (ICY updates and similar).
    Metadata(Vec<MetadataEntry>),
    FatalError(EngineError),
    PlaybackParametersChanged(PlaybackParameters),
}

/// Receiver for raw engine events.
///
/// All events are delivered on one sequential context.
pub trait EngineListener: PlatformSendSync {
    fn on_engine_event(&self, event: EngineEvent);
}

/// Host media engine as seen by the core.
///
/// Accessors return the engine's current values. Commands are
/// fire-and-forget: their effect is observed later through events.
/// Commands must not invoke the registered listener re-entrantly.
pub trait PlaybackEngine: PlatformSendSync {
    /// Whether this engine renders locally or drives a remote device.
    fn kind(&self) -> EngineKind;

    /// Register the single listener. The engine holds it weakly and drops
    /// events once the listener is gone.
    fn set_listener(&self, listener: Weak<dyn EngineListener>);

    fn phase(&self) -> PlayerPhase;

    fn play_when_ready(&self) -> bool;

    /// Whether audio is actually being rendered right now.
    fn is_playing(&self) -> bool;

    fn suppression_reason(&self) -> SuppressionReason;

    fn current_window_index(&self) -> Option<usize>;

    fn previous_window_index(&self) -> Option<usize>;

    fn next_window_index(&self) -> Option<usize>;

    /// Number of windows in the current timeline.
    fn window_count(&self) -> usize;

    /// Duration of the timeline window at `index`, if known.
    fn timeline_window_duration(&self, index: usize) -> Option<Duration>;

    fn current_position(&self) -> Duration;

    fn buffered_position(&self) -> Duration;

    /// Duration of the current item, if known.
    fn duration(&self) -> Option<Duration>;

    fn playback_parameters(&self) -> PlaybackParameters;

    /// Raw output volume, `0.0..=1.0`.
    fn volume(&self) -> f32;

    fn repeat_mode(&self) -> RepeatMode;

    fn seek_to_default_position(&self, index: usize);

    fn seek_to(&self, position: Duration);

    fn set_play_when_ready(&self, play_when_ready: bool);

    fn stop(&self);

    fn clear_media_items(&self);

    /// Insert media items so the first lands at `index`.
    fn add_media_items(&self, index: usize, tracks: &[Track]);

    fn remove_media_item(&self, index: usize);

    fn set_playback_parameters(&self, parameters: PlaybackParameters);

    fn set_volume(&self, volume: f32);

    fn set_repeat_mode(&self, mode: RepeatMode);

    /// Toggle offloaded (hardware) decoding. Engines without support ignore it.
    fn enable_audio_offload(&self, _enabled: bool) {}

    /// Free all engine resources. The engine is unusable afterwards.
    fn release(&self);
}
