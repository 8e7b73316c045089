//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the playback core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback and metadata
//! crates depend on. It establishes the logging conventions and the event
//! broadcasting mechanism hosts use to observe playback.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, PlaybackSettings};
pub use error::{Error, Result};
pub use events::{EventBus, EventStream, PlayerEvent};
