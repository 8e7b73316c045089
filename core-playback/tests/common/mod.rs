//! Shared fixtures: a scriptable in-memory engine and a dispatcher that
//! records every call.

#![allow(dead_code)]

use bridge_traits::{
    AudioFocusChange, EngineEvent, EngineKind, EngineListener, ErrorCode, EventDispatcher,
    PlaybackEngine, PlaybackParameters, PlaybackState, PlayerPhase, RepeatMode,
    SuppressionReason, Track, TransitionReason, UnifiedMetadata,
};
use core_playback::Playback;
use core_runtime::config::CoreConfig;
use std::sync::{Arc, Weak};
use std::time::Duration;

// ============================================================================
// Fake Engine
// ============================================================================

pub struct EngineState {
    pub kind: EngineKind,
    pub phase: PlayerPhase,
    pub play_when_ready: bool,
    pub is_playing: bool,
    pub suppression: SuppressionReason,
    pub current_window: Option<usize>,
    pub items: Vec<Track>,
    /// Timeline length when it lags behind `items`.
    pub timeline_len: Option<usize>,
    pub position: Duration,
    pub buffered: Duration,
    pub duration: Option<Duration>,
    pub parameters: PlaybackParameters,
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub offload: bool,
    pub released: bool,
    pub stop_calls: usize,
    pub seeks: Vec<Duration>,
    pub default_seeks: Vec<usize>,
    pub removed: Vec<usize>,
    pub listener: Option<Weak<dyn EngineListener>>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            kind: EngineKind::Local,
            phase: PlayerPhase::Idle,
            play_when_ready: false,
            is_playing: false,
            suppression: SuppressionReason::None,
            current_window: None,
            items: Vec::new(),
            timeline_len: None,
            position: Duration::ZERO,
            buffered: Duration::ZERO,
            duration: None,
            parameters: PlaybackParameters::default(),
            volume: 1.0,
            repeat_mode: RepeatMode::Off,
            offload: false,
            released: false,
            stop_calls: 0,
            seeks: Vec::new(),
            default_seeks: Vec::new(),
            removed: Vec::new(),
            listener: None,
        }
    }
}

/// Engine whose signals are set directly by the test. Commands only record
/// their effect; events are raised explicitly through [`FakeEngine::emit`].
#[derive(Default)]
pub struct FakeEngine {
    pub state: parking_lot::Mutex<EngineState>,
}

impl FakeEngine {
    pub fn with_kind(kind: EngineKind) -> Self {
        let engine = Self::default();
        engine.state.lock().kind = kind;
        engine
    }

    /// Deliver `event` to the registered listener, if it is still alive.
    pub fn emit(&self, event: EngineEvent) {
        let listener = self.state.lock().listener.clone();
        if let Some(listener) = listener.and_then(|weak| weak.upgrade()) {
            listener.on_engine_event(event);
        }
    }

    pub fn transition(&self, reason: TransitionReason) {
        self.emit(EngineEvent::MediaItemTransition(reason));
    }

    pub fn has_live_listener(&self) -> bool {
        self.state
            .lock()
            .listener
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Set phase, intent and rendering flag, then raise `PhaseChanged`.
    pub fn drive(&self, phase: PlayerPhase, play_when_ready: bool, is_playing: bool) {
        {
            let mut state = self.state.lock();
            state.phase = phase;
            state.play_when_ready = play_when_ready;
            state.is_playing = is_playing;
        }
        self.emit(EngineEvent::PhaseChanged(phase));
    }

    pub fn set_window(&self, window: Option<usize>, position: Duration) {
        let mut state = self.state.lock();
        state.current_window = window;
        state.position = position;
    }

    pub fn item_urls(&self) -> Vec<String> {
        self.state.lock().items.iter().map(|t| t.url.clone()).collect()
    }
}

impl PlaybackEngine for FakeEngine {
    fn kind(&self) -> EngineKind {
        self.state.lock().kind
    }

    fn set_listener(&self, listener: Weak<dyn EngineListener>) {
        self.state.lock().listener = Some(listener);
    }

    fn phase(&self) -> PlayerPhase {
        self.state.lock().phase
    }

    fn play_when_ready(&self) -> bool {
        self.state.lock().play_when_ready
    }

    fn is_playing(&self) -> bool {
        self.state.lock().is_playing
    }

    fn suppression_reason(&self) -> SuppressionReason {
        self.state.lock().suppression
    }

    fn current_window_index(&self) -> Option<usize> {
        self.state.lock().current_window
    }

    fn previous_window_index(&self) -> Option<usize> {
        let state = self.state.lock();
        state.current_window.and_then(|index| index.checked_sub(1))
    }

    fn next_window_index(&self) -> Option<usize> {
        let state = self.state.lock();
        state
            .current_window
            .map(|index| index + 1)
            .filter(|&next| next < state.items.len())
    }

    fn window_count(&self) -> usize {
        let state = self.state.lock();
        state.timeline_len.unwrap_or(state.items.len())
    }

    fn timeline_window_duration(&self, index: usize) -> Option<Duration> {
        self.state.lock().items.get(index).and_then(|t| t.duration)
    }

    fn current_position(&self) -> Duration {
        self.state.lock().position
    }

    fn buffered_position(&self) -> Duration {
        self.state.lock().buffered
    }

    fn duration(&self) -> Option<Duration> {
        self.state.lock().duration
    }

    fn playback_parameters(&self) -> PlaybackParameters {
        self.state.lock().parameters
    }

    fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.state.lock().repeat_mode
    }

    fn seek_to_default_position(&self, index: usize) {
        self.state.lock().default_seeks.push(index);
    }

    fn seek_to(&self, position: Duration) {
        self.state.lock().seeks.push(position);
    }

    fn set_play_when_ready(&self, play_when_ready: bool) {
        self.state.lock().play_when_ready = play_when_ready;
    }

    fn stop(&self) {
        self.state.lock().stop_calls += 1;
    }

    fn clear_media_items(&self) {
        self.state.lock().items.clear();
    }

    fn add_media_items(&self, index: usize, tracks: &[Track]) {
        let mut state = self.state.lock();
        state.items.splice(index..index, tracks.iter().cloned());
    }

    fn remove_media_item(&self, index: usize) {
        let mut state = self.state.lock();
        state.items.remove(index);
        state.removed.push(index);
    }

    fn set_playback_parameters(&self, parameters: PlaybackParameters) {
        self.state.lock().parameters = parameters;
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().volume = volume;
    }

    fn set_repeat_mode(&self, mode: RepeatMode) {
        self.state.lock().repeat_mode = mode;
    }

    fn enable_audio_offload(&self, enabled: bool) {
        self.state.lock().offload = enabled;
    }

    fn release(&self) {
        self.state.lock().released = true;
    }
}

// ============================================================================
// Recording Dispatcher
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Stop,
    State(PlaybackState),
    TrackUpdate {
        previous_index: Option<usize>,
        previous_position: Duration,
        next_index: Option<usize>,
        next_track: Option<Track>,
    },
    End(Option<usize>, Duration),
    Focus(AudioFocusChange),
    Error(ErrorCode, String),
    Metadata(UnifiedMetadata),
    TrackMetadata(usize, Track, bool),
}

#[derive(Default)]
pub struct Recorder {
    calls: parking_lot::Mutex<Vec<Call>>,
}

impl Recorder {
    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn push(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl EventDispatcher for Recorder {
    fn on_play(&self) {
        self.push(Call::Play);
    }

    fn on_pause(&self) {
        self.push(Call::Pause);
    }

    fn on_stop(&self) {
        self.push(Call::Stop);
    }

    fn on_state_change(&self, state: PlaybackState) {
        self.push(Call::State(state));
    }

    fn on_track_update(
        &self,
        previous_index: Option<usize>,
        previous_position: Duration,
        next_index: Option<usize>,
        next_track: Option<Track>,
    ) {
        self.push(Call::TrackUpdate {
            previous_index,
            previous_position,
            next_index,
            next_track,
        });
    }

    fn on_end(&self, index: Option<usize>, position: Duration) {
        self.push(Call::End(index, position));
    }

    fn on_audio_focus_change(&self, change: AudioFocusChange) {
        self.push(Call::Focus(change));
    }

    fn on_error(&self, code: ErrorCode, message: &str) {
        self.push(Call::Error(code, message.to_string()));
    }

    fn on_metadata_received(&self, metadata: &UnifiedMetadata) {
        self.push(Call::Metadata(metadata.clone()));
    }

    fn on_track_metadata(&self, index: usize, track: &Track, playing: bool) {
        self.push(Call::TrackMetadata(index, track.clone(), playing));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub struct Fixture {
    pub engine: Arc<FakeEngine>,
    pub recorder: Arc<Recorder>,
    pub playback: Arc<Playback<FakeEngine>>,
}

pub fn setup() -> Fixture {
    setup_with_engine(FakeEngine::default())
}

pub fn setup_with_engine(engine: FakeEngine) -> Fixture {
    let recorder = Arc::new(Recorder::default());
    let config = CoreConfig::builder()
        .dispatcher(recorder.clone())
        .build()
        .unwrap();
    build(engine, recorder, config)
}

pub fn build(engine: FakeEngine, recorder: Arc<Recorder>, config: CoreConfig) -> Fixture {
    let engine = Arc::new(engine);
    let playback = Arc::new(Playback::new(engine.clone(), config).unwrap());
    playback.initialize();
    Fixture {
        engine,
        recorder,
        playback,
    }
}

pub fn track(name: &str) -> Track {
    Track::new(format!("https://example.com/{}.mp3", name)).with_title(name)
}

pub fn tracks(names: &[&str]) -> Vec<Track> {
    names.iter().map(|name| track(name)).collect()
}

/// Fixture with `names` queued and the engine on window 0.
pub fn setup_with_queue(names: &[&str]) -> Fixture {
    let fixture = setup();
    fixture.playback.add(tracks(names), None).unwrap();
    fixture.engine.set_window(Some(0), Duration::ZERO);
    fixture
}
