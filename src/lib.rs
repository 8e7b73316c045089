//! Workspace facade crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-metadata`, `core-playback`). Host applications can depend
//! on `trackplayer-workspace` and enable the documented features without
//! wiring each crate individually.

pub use bridge_traits;
pub use core_runtime;

#[cfg(feature = "metadata")]
pub use core_metadata;

#[cfg(feature = "playback")]
pub use core_playback;
