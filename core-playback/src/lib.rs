//! # Playback State Machine Module
//!
//! Normalizes a host media engine into one consistent playback model.
//!
//! ## Overview
//!
//! This module handles:
//! - The track queue and its mirror in the engine's item list
//! - Deriving `PlaybackState` from raw engine signals, edge-triggered
//! - Track-transition bookkeeping (previous index and position)
//! - Audio-focus forwarding and fatal error classification
//! - Volume multiplier and playback rate
//!
//! Metadata arriving from the engine is normalized by `core-metadata` and
//! reported through the same dispatcher.

pub mod error;
pub mod focus;
pub mod playback;
pub mod queue;
pub mod state;
pub mod volume;

pub use error::{classify, PlaybackError, Result};
pub use playback::Playback;
pub use queue::Queue;
pub use state::{EngineSignals, StateCategory, StateTracker, StateTransition};
pub use volume::VolumeMultiplier;
