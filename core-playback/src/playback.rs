//! # Playback State Machine
//!
//! [`Playback`] sits between a host [`PlaybackEngine`] and an
//! [`EventDispatcher`]. It owns the track queue, turns raw engine signals
//! into edge-triggered state notifications, keeps the bookkeeping needed to
//! report where the previous track stopped, and forwards normalized
//! metadata, audio-focus changes and classified errors.
//!
//! ## Wiring
//!
//! ```ignore
//! use core_playback::Playback;
//! use core_runtime::{config::CoreConfig, events::EventBus};
//! use std::sync::Arc;
//!
//! let bus = Arc::new(EventBus::default());
//! let config = CoreConfig::builder().dispatcher(bus.clone()).build()?;
//!
//! let playback = Arc::new(Playback::new(engine, config)?);
//! playback.initialize();
//! ```
//!
//! The engine holds the state machine weakly; dropping the last `Arc`
//! silences further engine events.
//!
//! ## Locking
//!
//! Queue, bookkeeping and volume multiplier each sit behind their own
//! `parking_lot::Mutex`. None of them is held while the dispatcher runs.
//! Queue mutations keep the queue lock across the matching engine command.

use crate::error::{classify, PlaybackError, Result};
use crate::focus;
use crate::queue::Queue;
use crate::state::{EngineSignals, StateCategory, StateTracker};
use crate::volume::{self, VolumeMultiplier};
use bridge_traits::{
    EngineError, EngineEvent, EngineKind, EngineListener, EventDispatcher, MetadataEntry,
    PlaybackEngine, PlaybackParameters, PlaybackState, RepeatMode, Track, TransitionReason,
};
use core_runtime::config::{CoreConfig, PlaybackSettings};
use core_runtime::logging::init_logging;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace};

/// Snapshot of the previously current track and where it was.
#[derive(Debug, Default)]
struct Bookkeeping {
    state: StateTracker,
    last_known_window: Option<usize>,
    last_known_position: Option<Duration>,
}

impl Bookkeeping {
    fn clear_last_known(&mut self) {
        self.last_known_window = None;
        self.last_known_position = None;
    }
}

/// Playback state machine over an engine of type `E`.
pub struct Playback<E: PlaybackEngine> {
    engine: Arc<E>,
    dispatcher: Arc<dyn EventDispatcher>,
    settings: PlaybackSettings,
    queue: Queue,
    bookkeeping: parking_lot::Mutex<Bookkeeping>,
    volume: VolumeMultiplier,
}

impl<E: PlaybackEngine> std::fmt::Debug for Playback<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playback")
            .field("kind", &self.engine.kind())
            .field("queue_len", &self.queue.len())
            .field("bookkeeping", &*self.bookkeeping.lock())
            .field("volume_multiplier", &self.volume.get())
            .finish()
    }
}

impl<E: PlaybackEngine + 'static> Playback<E> {
    /// Register this instance as the engine's listener.
    ///
    /// The engine only receives a weak handle. When the configured volume
    /// multiplier differs from 1.0 it is applied to the engine's current
    /// volume here.
    pub fn initialize(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let listener: Weak<dyn EngineListener> = weak;
        self.engine.set_listener(listener);

        let multiplier = self.volume.get();
        if multiplier != 1.0 {
            self.engine.set_volume(self.engine.volume() * multiplier);
        }

        info!(
            kind = ?self.engine.kind(),
            multiplier,
            "Playback initialized"
        );
    }
}

impl<E: PlaybackEngine> Playback<E> {
    /// Create a state machine driving `engine` and reporting to the
    /// configured dispatcher.
    /// Build the state machine. When `config.logging` is set the global
    /// tracing subscriber is installed from it; an already installed
    /// subscriber is kept.
    pub fn new(engine: Arc<E>, config: CoreConfig) -> Result<Self> {
        if let Some(logging) = config.logging {
            if let Err(err) = init_logging(logging) {
                debug!(error = %err, "Keeping existing tracing subscriber");
            }
        }

        let volume = VolumeMultiplier::new(config.playback.initial_volume_multiplier)?;

        Ok(Self {
            engine,
            dispatcher: config.dispatcher,
            settings: config.playback,
            queue: Queue::new(),
            bookkeeping: parking_lot::Mutex::new(Bookkeeping::default()),
            volume,
        })
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Whether the engine drives a remote renderer.
    pub fn is_remote(&self) -> bool {
        self.engine.kind() == EngineKind::Remote
    }

    pub fn should_auto_update_metadata(&self) -> bool {
        self.settings.auto_update_metadata
    }

    // ========================================================================
    // Queue Management
    // ========================================================================

    /// Insert `tracks` before `insert_before`, or append when `None`.
    #[instrument(skip(self, tracks), fields(count = tracks.len()))]
    pub fn add(&self, tracks: Vec<Track>, insert_before: Option<usize>) -> Result<()> {
        let index = self.queue.insert_with(tracks, insert_before, |index, tracks| {
            for (offset, track) in tracks.iter().enumerate() {
                debug!(index = index + offset, url = %track.url, "Queueing track");
            }
            self.engine.add_media_items(index, tracks);
        })?;
        info!(index, "Tracks added to queue");
        Ok(())
    }

    /// Remove the tracks at `indexes`. Nothing is removed if any index is
    /// out of bounds.
    pub fn remove(&self, indexes: &[usize]) -> Result<()> {
        let removed = self.queue.remove_with(indexes, |index| {
            self.engine.remove_media_item(index);
        })?;
        info!(removed = ?removed, "Tracks removed from queue");
        Ok(())
    }

    /// Drop every track after the current one.
    pub fn remove_upcoming_tracks(&self) {
        let Some(current) = self.current_track_index() else {
            debug!("No current track, nothing upcoming to remove");
            return;
        };
        let removed = self.queue.truncate_after_with(current, |index| {
            self.engine.remove_media_item(index);
        });
        info!(current, removed, "Upcoming tracks removed");
    }

    /// Replace the track at `index`. If it is the current track the
    /// dispatcher is told to refresh now-playing metadata.
    pub fn update_track(&self, index: usize, track: Track) -> Result<()> {
        let is_current = self
            .queue
            .replace_with(index, track.clone(), || self.engine.current_window_index())?;
        debug!(index, is_current, "Track updated");

        if is_current {
            let playing = self.state().is_playing();
            self.dispatcher.on_track_metadata(index, &track, playing);
        }
        Ok(())
    }

    /// Snapshot of the queue.
    pub fn queue(&self) -> Vec<Track> {
        self.queue.snapshot()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn skip(&self, index: usize) -> Result<()> {
        let track = self.queue.get(index).ok_or(PlaybackError::IndexOutOfBounds {
            index,
            len: self.queue.len(),
        })?;
        info!(index, url = %track.url, "Skipping to track");
        self.engine.seek_to_default_position(index);
        Ok(())
    }

    pub fn skip_to_previous(&self) -> Result<()> {
        let index = self
            .engine
            .previous_window_index()
            .ok_or(PlaybackError::NoPreviousTrack)?;
        info!(index, "Skipping to previous track");
        self.engine.seek_to_default_position(index);
        Ok(())
    }

    pub fn skip_to_next(&self) -> Result<()> {
        let index = self
            .engine
            .next_window_index()
            .ok_or(PlaybackError::QueueExhausted)?;
        info!(index, "Skipping to next track");
        self.engine.seek_to_default_position(index);
        Ok(())
    }

    /// Seek within the current track. Ignored while the queue is empty.
    pub fn seek_to(&self, position: Duration) {
        if self.queue.is_empty() {
            trace!("Seek ignored on empty queue");
            return;
        }

        {
            let mut bookkeeping = self.bookkeeping.lock();
            bookkeeping.last_known_window = self.engine.current_window_index();
            bookkeeping.last_known_position = Some(self.engine.current_position());
        }

        debug!(position_ms = position.as_millis() as u64, "Seeking");
        self.engine.seek_to(position);
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn play(&self) {
        info!("Play requested");
        self.engine.set_play_when_ready(true);
    }

    pub fn pause(&self) {
        info!("Pause requested");
        self.engine.set_play_when_ready(false);
    }

    /// Stop and rewind, keeping the queue.
    pub fn stop(&self) {
        info!("Stop requested");
        self.bookkeeping.lock().clear_last_known();

        self.engine.stop();
        self.engine.set_play_when_ready(false);
        self.engine.seek_to(Duration::ZERO);
    }

    /// Stop and clear the queue.
    pub fn reset(&self) {
        info!("Reset requested");
        self.bookkeeping.lock().clear_last_known();

        self.engine.stop();
        self.queue.clear_with(|| self.engine.clear_media_items());
        self.engine.set_play_when_ready(false);
    }

    /// Release the engine. The instance must not be used afterwards.
    pub fn destroy(&self) {
        info!("Releasing playback engine");
        self.engine.release();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current state, derived from the engine's signals right now.
    pub fn state(&self) -> PlaybackState {
        self.signals().derive()
    }

    /// Engine window index, if it addresses a queue slot.
    pub fn current_track_index(&self) -> Option<usize> {
        let index = self.engine.current_window_index()?;
        (index < self.queue.len()).then_some(index)
    }

    pub fn current_track(&self) -> Option<Track> {
        let index = self.engine.current_window_index()?;
        self.queue.get(index)
    }

    pub fn position(&self) -> Duration {
        self.engine.current_position()
    }

    pub fn buffered_position(&self) -> Duration {
        self.engine.buffered_position()
    }

    /// The current track's own duration when set and non-zero, otherwise the
    /// engine's, otherwise zero.
    pub fn duration(&self) -> Duration {
        self.current_track()
            .and_then(|track| track.duration)
            .filter(|duration| !duration.is_zero())
            .or_else(|| self.engine.duration())
            .unwrap_or_default()
    }

    // ========================================================================
    // Volume & Rate
    // ========================================================================

    /// User-facing volume.
    pub fn volume(&self) -> f32 {
        self.volume.to_user(self.engine.volume())
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        volume::validate_volume(volume)?;
        self.engine.set_volume(self.volume.to_engine(volume));
        Ok(())
    }

    pub fn volume_multiplier(&self) -> f32 {
        self.volume.get()
    }

    /// Change the multiplier while keeping the user-facing volume.
    pub fn set_volume_multiplier(&self, multiplier: f32) -> Result<()> {
        volume::validate_multiplier(multiplier)?;
        let user_volume = self.volume();
        self.engine.set_volume(user_volume * multiplier);
        self.volume.set(multiplier)?;
        debug!(multiplier, "Volume multiplier changed");
        Ok(())
    }

    pub fn rate(&self) -> f32 {
        self.engine.playback_parameters().speed
    }

    /// Change playback speed, keeping the current pitch.
    pub fn set_rate(&self, rate: f32) -> Result<()> {
        volume::validate_rate(rate)?;
        let pitch = self.engine.playback_parameters().pitch;
        self.engine
            .set_playback_parameters(PlaybackParameters::new(rate, pitch));
        Ok(())
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.engine.repeat_mode()
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        debug!(mode = ?mode, "Repeat mode changed");
        self.engine.set_repeat_mode(mode);
    }

    pub fn enable_audio_offload(&self, enabled: bool) {
        self.engine.enable_audio_offload(enabled);
    }

    // ========================================================================
    // Engine Events
    // ========================================================================

    /// Single entry point for raw engine events.
    pub fn handle_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::PhaseChanged(phase) => {
                trace!(phase = ?phase, "Engine phase changed");
                self.refresh_state();
            }
            EngineEvent::PlayIntentChanged {
                play_when_ready,
                reason,
            } => {
                trace!(play_when_ready, reason = ?reason, "Play intent changed");
                self.refresh_state();
                if let Some(change) = focus::from_play_intent(reason) {
                    self.dispatcher.on_audio_focus_change(change);
                }
            }
            EngineEvent::SuppressionChanged(reason) => {
                trace!(reason = ?reason, "Suppression changed");
                self.refresh_state();
                self.dispatcher
                    .on_audio_focus_change(focus::from_suppression(reason));
            }
            EngineEvent::MediaItemTransition(reason) => self.on_media_item_transition(reason),
            EngineEvent::TracksChanged(batches) => {
                for batch in &batches {
                    self.dispatch_metadata(batch);
                }
            }
            EngineEvent::Metadata(entries) => self.dispatch_metadata(&entries),
            EngineEvent::FatalError(error) => self.report_error(&error),
            EngineEvent::PlaybackParametersChanged(parameters) => {
                debug!(
                    speed = parameters.speed,
                    pitch = parameters.pitch,
                    "Playback parameters changed"
                );
            }
        }
    }

    fn signals(&self) -> EngineSignals {
        EngineSignals {
            phase: self.engine.phase(),
            play_when_ready: self.engine.play_when_ready(),
            suppression: self.engine.suppression_reason(),
            is_playing: self.engine.is_playing(),
        }
    }

    fn refresh_state(&self) {
        let state = self.state();
        let Some(transition) = self.bookkeeping.lock().state.update(state) else {
            return;
        };

        debug!(
            from = %transition.previous,
            to = %transition.current,
            "Playback state changed"
        );

        match transition.entered_category() {
            Some(StateCategory::Playing) => self.dispatcher.on_play(),
            Some(StateCategory::Paused) => self.dispatcher.on_pause(),
            Some(StateCategory::Stopped) => self.dispatcher.on_stop(),
            None => {}
        }

        self.dispatcher.on_state_change(state);

        if state == PlaybackState::Stopped {
            let index = self.current_track_index();
            let position = self.engine.current_position();
            info!(index = ?index, "Queue ended");
            self.dispatcher.on_track_update(index, position, None, None);
            self.dispatcher.on_end(index, position);
        }
    }

    fn on_media_item_transition(&self, reason: TransitionReason) {
        let current = self.engine.current_window_index();
        let (last_window, last_position) = {
            let bookkeeping = self.bookkeeping.lock();
            (bookkeeping.last_known_window, bookkeeping.last_known_position)
        };

        if current != last_window {
            let next_track = current.and_then(|index| self.queue.get(index));
            let next_index = current.filter(|_| next_track.is_some());

            let mut previous_position = last_position.unwrap_or_default();
            if reason == TransitionReason::AutoTransition {
                // The previous track played to its end, unless its window
                // has since left the timeline
                let duration = last_window
                    .filter(|&index| index < self.engine.window_count())
                    .and_then(|index| self.engine.timeline_window_duration(index));
                if let Some(duration) = duration {
                    previous_position = duration;
                }
            }

            debug!(
                previous = ?last_window,
                next = ?next_index,
                reason = ?reason,
                "Track changed"
            );
            self.dispatcher
                .on_track_update(last_window, previous_position, next_index, next_track);
        }

        let mut bookkeeping = self.bookkeeping.lock();
        bookkeeping.last_known_window = self.engine.current_window_index();
        bookkeeping.last_known_position = Some(self.engine.current_position());
    }

    fn dispatch_metadata(&self, entries: &[MetadataEntry]) {
        for record in core_metadata::normalize(entries) {
            self.dispatcher.on_metadata_received(&record);
        }
    }

    fn report_error(&self, engine_error: &EngineError) {
        let (code, message) = classify(engine_error);
        error!(code = %code, cause = message, "Playback failed");
        self.dispatcher.on_error(code, message);
    }
}

impl<E: PlaybackEngine> EngineListener for Playback<E> {
    fn on_engine_event(&self, event: EngineEvent) {
        self.handle_event(event);
    }
}
