//! # Event Bus System
//!
//! Publishes normalized player events over `tokio::sync::broadcast` so any
//! number of host components can observe playback without implementing
//! [`EventDispatcher`] themselves.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **PlayerEvent**: Serializable mirror of every dispatcher callback
//! - **EventBus**: Broadcast channel that also acts as an `EventDispatcher`
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  EventDispatcher  ┌───────────┐     subscribe    ┌────────────┐
//! │ Playback<E>  ├──────────────────>│ EventBus  ├─────────────────>│ Subscriber │
//! └──────────────┘                   │ (broadcast│                  └────────────┘
//!                                    │  channel) │     subscribe    ┌────────────┐
//!                                    │           ├─────────────────>│ Subscriber │
//!                                    └───────────┘                  └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{EventDispatcher, PlaybackState};
//! use core_runtime::events::{EventBus, PlayerEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut subscriber = bus.subscribe();
//!
//! bus.on_state_change(PlaybackState::Buffering);
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event, PlayerEvent::StateChanged { state: PlaybackState::Buffering });
//! # }
//! ```
//!
//! Events emitted while nobody is subscribed are dropped.

use bridge_traits::{
    AudioFocusChange, ErrorCode, EventDispatcher, PlaybackState, Track, UnifiedMetadata,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError, error::SendError};

pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Player Events
// ============================================================================

/// Serializable form of every outbound playback notification.
///
/// Positions are carried as milliseconds so the JSON shape stays flat for
/// host bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PlayerEvent {
    /// Playback entered the playing category.
    Play,
    /// Playback entered the paused category.
    Pause,
    /// Playback entered the stopped category.
    Stop,
    /// Derived playback state changed.
    StateChanged { state: PlaybackState },
    /// Current track changed, or playback ended when `next_index` is `None`.
    TrackChanged {
        previous_index: Option<usize>,
        previous_position_ms: u64,
        next_index: Option<usize>,
        next_track: Option<Track>,
    },
    /// The queue finished.
    QueueEnded { index: Option<usize>, position_ms: u64 },
    AudioFocusChanged(AudioFocusChange),
    /// Fatal engine error, already classified.
    Error { code: ErrorCode, message: String },
    /// Normalized in-stream or container metadata.
    MetadataReceived(UnifiedMetadata),
    /// The playing track's queue entry was replaced.
    NowPlayingUpdated {
        index: usize,
        track: Track,
        playing: bool,
    },
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::Play => "Playback started",
            PlayerEvent::Pause => "Playback paused",
            PlayerEvent::Stop => "Playback stopped",
            PlayerEvent::StateChanged { .. } => "Playback state changed",
            PlayerEvent::TrackChanged { .. } => "Track changed",
            PlayerEvent::QueueEnded { .. } => "Queue ended",
            PlayerEvent::AudioFocusChanged(_) => "Audio focus changed",
            PlayerEvent::Error { .. } => "Playback error",
            PlayerEvent::MetadataReceived(_) => "Metadata received",
            PlayerEvent::NowPlayingUpdated { .. } => "Now playing updated",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Error { .. } => EventSeverity::Error,
            PlayerEvent::AudioFocusChanged(change) if change.permanent_loss => {
                EventSeverity::Warning
            }
            PlayerEvent::TrackChanged { .. } | PlayerEvent::QueueEnded { .. } => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to player events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
///
/// Sending never blocks and needs no runtime, so the bus can be handed to the
/// playback core directly as its dispatcher.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: PlayerEvent) {
        if self.emit(event).is_err() {
            tracing::trace!("Dropped player event with no subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl EventDispatcher for EventBus {
    fn on_play(&self) {
        self.publish(PlayerEvent::Play);
    }

    fn on_pause(&self) {
        self.publish(PlayerEvent::Pause);
    }

    fn on_stop(&self) {
        self.publish(PlayerEvent::Stop);
    }

    fn on_state_change(&self, state: PlaybackState) {
        self.publish(PlayerEvent::StateChanged { state });
    }

    fn on_track_update(
        &self,
        previous_index: Option<usize>,
        previous_position: Duration,
        next_index: Option<usize>,
        next_track: Option<Track>,
    ) {
        self.publish(PlayerEvent::TrackChanged {
            previous_index,
            previous_position_ms: as_millis(previous_position),
            next_index,
            next_track,
        });
    }

    fn on_end(&self, index: Option<usize>, position: Duration) {
        self.publish(PlayerEvent::QueueEnded {
            index,
            position_ms: as_millis(position),
        });
    }

    fn on_audio_focus_change(&self, change: AudioFocusChange) {
        self.publish(PlayerEvent::AudioFocusChanged(change));
    }

    fn on_error(&self, code: ErrorCode, message: &str) {
        self.publish(PlayerEvent::Error {
            code,
            message: message.to_string(),
        });
    }

    fn on_metadata_received(&self, metadata: &UnifiedMetadata) {
        self.publish(PlayerEvent::MetadataReceived(metadata.clone()));
    }

    fn on_track_metadata(&self, index: usize, track: &Track, playing: bool) {
        self.publish(PlayerEvent::NowPlayingUpdated {
            index,
            track: track.clone(),
            playing,
        });
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, PlayerEvent};
///
/// let event_bus = EventBus::new(100);
/// let errors_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, PlayerEvent::Error { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::MetadataDialect;

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(PlayerEvent::Play).is_err());

        // Dispatcher path swallows the missing-subscriber case
        bus.on_play();
    }

    #[tokio::test]
    async fn test_dispatcher_callbacks_publish_events() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe();

        bus.on_play();
        bus.on_state_change(PlaybackState::Playing);
        bus.on_track_update(Some(0), Duration::from_millis(1500), Some(1), None);
        bus.on_end(Some(1), Duration::from_secs(2));
        bus.on_error(ErrorCode::PlaybackSource, "404");

        assert_eq!(sub.recv().await.unwrap(), PlayerEvent::Play);
        assert_eq!(
            sub.recv().await.unwrap(),
            PlayerEvent::StateChanged {
                state: PlaybackState::Playing
            }
        );
        assert_eq!(
            sub.recv().await.unwrap(),
            PlayerEvent::TrackChanged {
                previous_index: Some(0),
                previous_position_ms: 1500,
                next_index: Some(1),
                next_track: None,
            }
        );
        assert_eq!(
            sub.recv().await.unwrap(),
            PlayerEvent::QueueEnded {
                index: Some(1),
                position_ms: 2000
            }
        );
        assert_eq!(
            sub.recv().await.unwrap(),
            PlayerEvent::Error {
                code: ErrorCode::PlaybackSource,
                message: "404".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        bus.on_audio_focus_change(AudioFocusChange::new(true, true, false));

        let expected = PlayerEvent::AudioFocusChanged(AudioFocusChange::new(true, true, false));
        assert_eq!(sub1.recv().await.unwrap(), expected);
        assert_eq!(sub2.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, PlayerEvent::MetadataReceived(_)));

        bus.on_pause();
        let mut metadata = UnifiedMetadata::new(MetadataDialect::Icy);
        metadata.title = Some("Now Playing".to_string());
        bus.on_metadata_received(&metadata);

        let received = stream.recv().await.unwrap();
        assert_eq!(received, PlayerEvent::MetadataReceived(metadata));
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for _ in 0..5 {
            bus.on_play();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(
            PlayerEvent::Error {
                code: ErrorCode::Playback,
                message: "boom".to_string()
            }
            .severity(),
            EventSeverity::Error
        );
        assert_eq!(
            PlayerEvent::AudioFocusChanged(AudioFocusChange::new(true, true, true)).severity(),
            EventSeverity::Warning
        );
        assert_eq!(
            PlayerEvent::QueueEnded {
                index: None,
                position_ms: 0
            }
            .severity(),
            EventSeverity::Info
        );
        assert_eq!(PlayerEvent::Play.severity(), EventSeverity::Debug);
        assert_eq!(PlayerEvent::Stop.description(), "Playback stopped");
    }

    #[test]
    fn test_event_serialization() {
        let event = PlayerEvent::NowPlayingUpdated {
            index: 3,
            track: Track::new("https://example.com/a.mp3").with_title("A"),
            playing: true,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"NowPlayingUpdated\""));

        let deserialized: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_try_recv_skips_filtered_events() {
        let bus = EventBus::new(10);
        let mut stream =
            EventStream::new(bus.subscribe()).filter(|event| matches!(event, PlayerEvent::Stop));

        bus.on_play();
        bus.on_stop();

        assert_eq!(stream.try_recv().unwrap().unwrap(), PlayerEvent::Stop);
        assert!(stream.try_recv().is_none());
    }
}
