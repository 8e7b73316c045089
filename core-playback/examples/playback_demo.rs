//! # Playback State Machine Demo
//!
//! Drives `Playback` with a scripted in-memory engine and prints the events
//! published on the event bus.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_traits::{
    EngineEvent, EngineKind, EngineListener, MetadataEntry, PlaybackEngine, PlaybackParameters,
    PlayerPhase, RepeatMode, SuppressionReason, Track, TransitionReason,
};
use core_playback::Playback;
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::{Arc, Weak};
use std::time::Duration;

// ============================================================================
// Scripted Engine
// ============================================================================

struct ScriptState {
    phase: PlayerPhase,
    play_when_ready: bool,
    window: Option<usize>,
    items: Vec<Track>,
    position: Duration,
    parameters: PlaybackParameters,
    volume: f32,
    repeat_mode: RepeatMode,
    listener: Option<Weak<dyn EngineListener>>,
}

struct ScriptedEngine {
    state: parking_lot::Mutex<ScriptState>,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            state: parking_lot::Mutex::new(ScriptState {
                phase: PlayerPhase::Idle,
                play_when_ready: false,
                window: None,
                items: Vec::new(),
                position: Duration::ZERO,
                parameters: PlaybackParameters::default(),
                volume: 1.0,
                repeat_mode: RepeatMode::Off,
                listener: None,
            }),
        }
    }

    fn emit(&self, event: EngineEvent) {
        let listener = self.state.lock().listener.clone();
        if let Some(listener) = listener.and_then(|weak| weak.upgrade()) {
            listener.on_engine_event(event);
        }
    }

    fn enter(&self, phase: PlayerPhase) {
        self.state.lock().phase = phase;
        self.emit(EngineEvent::PhaseChanged(phase));
    }

    fn advance(&self, window: usize, reason: TransitionReason) {
        {
            let mut state = self.state.lock();
            state.window = Some(window);
            state.position = Duration::ZERO;
        }
        self.emit(EngineEvent::MediaItemTransition(reason));
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Local
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
        let state = self.state.lock();
        state.play_when_ready && state.phase == PlayerPhase::Ready
    }

    fn suppression_reason(&self) -> SuppressionReason {
        SuppressionReason::None
    }

    fn current_window_index(&self) -> Option<usize> {
        self.state.lock().window
    }

    fn previous_window_index(&self) -> Option<usize> {
        self.state.lock().window.and_then(|w| w.checked_sub(1))
    }

    fn next_window_index(&self) -> Option<usize> {
        let state = self.state.lock();
        state.window.map(|w| w + 1).filter(|&w| w < state.items.len())
    }

    fn window_count(&self) -> usize {
        self.state.lock().items.len()
    }

    fn timeline_window_duration(&self, index: usize) -> Option<Duration> {
        self.state.lock().items.get(index).and_then(|t| t.duration)
    }

    fn current_position(&self) -> Duration {
        self.state.lock().position
    }

    fn buffered_position(&self) -> Duration {
        self.state.lock().position
    }

    fn duration(&self) -> Option<Duration> {
        None
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
        let mut state = self.state.lock();
        state.window = Some(index);
        state.position = Duration::ZERO;
    }

    fn seek_to(&self, position: Duration) {
        self.state.lock().position = position;
    }

    fn set_play_when_ready(&self, play_when_ready: bool) {
        self.state.lock().play_when_ready = play_when_ready;
    }

    fn stop(&self) {
        self.state.lock().phase = PlayerPhase::Idle;
    }

    fn clear_media_items(&self) {
        self.state.lock().items.clear();
    }

    fn add_media_items(&self, index: usize, tracks: &[Track]) {
        self.state
            .lock()
            .items
            .splice(index..index, tracks.iter().cloned());
    }

    fn remove_media_item(&self, index: usize) {
        self.state.lock().items.remove(index);
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

    fn release(&self) {
        self.state.lock().listener = None;
    }
}

// ============================================================================
// Demo
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let bus = Arc::new(EventBus::default());
    let mut stream = EventStream::new(bus.subscribe());

    let config = CoreConfig::builder()
        .dispatcher(bus.clone())
        .volume_multiplier(0.8)
        .build()?;

    let engine = Arc::new(ScriptedEngine::new());
    let playback = Arc::new(Playback::new(engine.clone(), config)?);
    playback.initialize();

    playback.add(
        vec![
            Track::new("https://example.com/intro.mp3")
                .with_title("Intro")
                .with_duration(Duration::from_secs(95)),
            Track::new("https://radio.example.com/live").with_title("Live Radio"),
        ],
        None,
    )?;

    println!("=== Starting playback ===");
    engine.advance(0, TransitionReason::PlaylistChanged);
    playback.play();
    engine.enter(PlayerPhase::Buffering);
    engine.enter(PlayerPhase::Ready);

    println!("=== Intro finishes, radio starts ===");
    engine.advance(1, TransitionReason::AutoTransition);
    engine.emit(EngineEvent::Metadata(vec![MetadataEntry::IcyInfo {
        title: Some("Daft Punk - One More Time".to_string()),
        url: None,
    }]));

    playback.set_volume(0.5)?;
    println!("User volume {:.2}", playback.volume());

    println!("=== Stream ends ===");
    engine.enter(PlayerPhase::Ended);

    while let Some(Ok(event)) = stream.try_recv() {
        println!(
            "[{:?}] {}: {}",
            event.severity(),
            event.description(),
            serde_json::to_string(&event)?
        );
    }

    playback.destroy();
    Ok(())
}
