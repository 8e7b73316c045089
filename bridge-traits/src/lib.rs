//! # Host Bridge Traits
//!
//! Contracts between the track player core and the host that embeds it.
//!
//! ## Overview
//!
//! The core never touches audio I/O. It sits between two host-owned
//! collaborators and translates one callback surface into the other:
//!
//! ```text
//! ┌──────────────────┐  EngineEvent   ┌──────────────┐  normalized   ┌─────────────────┐
//! │  PlaybackEngine  ├───────────────>│ core-playback├──────────────>│ EventDispatcher │
//! │  (host, native)  │<───────────────┤  Playback<E> │    events     │  (host / bus)   │
//! └──────────────────┘    commands    └──────────────┘               └─────────────────┘
//! ```
//!
//! ## Traits
//!
//! - [`PlaybackEngine`](playback::PlaybackEngine) - Accessors and commands of the media engine
//! - [`EngineListener`](playback::EngineListener) - Single receiver for raw engine events
//! - [`EventDispatcher`](dispatcher::EventDispatcher) - Normalized lifecycle and metadata events
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` on native targets (see
//! [`PlatformSendSync`](platform::PlatformSendSync)): engine events arrive on
//! the engine's thread while queue commands may come from any other.

pub mod dispatcher;
pub mod error;
pub mod metadata;
pub mod platform;
pub mod playback;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use dispatcher::EventDispatcher;
pub use metadata::{MetadataDialect, MetadataEntry, UnifiedMetadata};
pub use playback::{
    AudioFocusChange, CauseKind, EngineError, EngineEvent, EngineKind, EngineListener, ErrorCause,
    ErrorCode, PlayIntentChangeReason, PlaybackEngine, PlaybackParameters, PlaybackState,
    PlayerPhase, RepeatMode, SuppressionReason, Track, TransitionReason,
};
pub use time::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
