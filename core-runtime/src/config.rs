//! # Core Configuration Module
//!
//! Provides configuration management for the playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the host dispatcher and playback settings. It enforces
//! fail-fast validation so a misconfigured player is rejected before any
//! engine is attached.
//!
//! ## Required Dependencies
//!
//! - `EventDispatcher` - Receives every normalized playback event
//!
//! ## Optional Settings
//!
//! - `PlaybackSettings` - Metadata auto-update and initial volume multiplier
//! - `LoggingConfig` - Consumed by the host when it initializes tracing
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .dispatcher(Arc::new(EventBus::default()))
//!     .auto_update_metadata(false)
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert!(!config.playback.auto_update_metadata);
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use bridge_traits::EventDispatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Core configuration for the playback core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Outbound event sink (required)
    pub dispatcher: Arc<dyn EventDispatcher>,

    /// Playback behavior settings
    pub playback: PlaybackSettings,

    /// Logging setup installed when the playback core is built
    pub logging: Option<LoggingConfig>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("dispatcher", &"EventDispatcher { ... }")
            .field("playback", &self.playback)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Settings that shape playback behavior.
///
/// Hosts usually persist these alongside user preferences, so they
/// round-trip through serde with defaults for missing keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Whether hosts should refresh now-playing surfaces from stream metadata.
    #[serde(default = "default_auto_update_metadata")]
    pub auto_update_metadata: bool,

    /// Multiplier applied on top of the user-facing volume.
    #[serde(default = "default_volume_multiplier")]
    pub initial_volume_multiplier: f32,
}

fn default_auto_update_metadata() -> bool {
    true
}

fn default_volume_multiplier() -> f32 {
    1.0
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_update_metadata: default_auto_update_metadata(),
            initial_volume_multiplier: default_volume_multiplier(),
        }
    }
}

impl PlaybackSettings {
    /// Validates the settings.
    ///
    /// The volume multiplier must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let multiplier = self.initial_volume_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(Error::Config(format!(
                "Volume multiplier must be a finite value greater than 0 (got {})",
                multiplier
            )));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()
    }
}

fn dispatcher_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "EventDispatcher".to_string(),
        message: "EventDispatcher implementation is required to receive playback events. \
                 Inject a host dispatcher, or use core_runtime::events::EventBus and \
                 subscribe to its broadcast channel."
            .to_string(),
    }
}

/// Builder for constructing a [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    playback: Option<PlaybackSettings>,
    auto_update_metadata: Option<bool>,
    volume_multiplier: Option<f32>,
    logging: Option<LoggingConfig>,
}

impl CoreConfigBuilder {
    /// Sets the event dispatcher (required).
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    /// use core_runtime::events::EventBus;
    /// use std::sync::Arc;
    ///
    /// let builder = CoreConfig::builder()
    ///     .dispatcher(Arc::new(EventBus::default()));
    /// ```
    pub fn dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Replaces all playback settings at once.
    ///
    /// Individual setters called on the builder take precedence.
    pub fn playback_settings(mut self, settings: PlaybackSettings) -> Self {
        self.playback = Some(settings);
        self
    }

    /// Enables or disables metadata-driven now-playing updates.
    pub fn auto_update_metadata(mut self, enabled: bool) -> Self {
        self.auto_update_metadata = Some(enabled);
        self
    }

    /// Sets the initial volume multiplier.
    pub fn volume_multiplier(mut self, multiplier: f32) -> Self {
        self.volume_multiplier = Some(multiplier);
        self
    }

    /// Attaches a logging configuration.
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` when no dispatcher was provided
    /// - `Config` when the playback settings are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let dispatcher = self.dispatcher.ok_or_else(dispatcher_missing_error)?;

        let mut playback = self.playback.unwrap_or_default();
        if let Some(enabled) = self.auto_update_metadata {
            playback.auto_update_metadata = enabled;
        }
        if let Some(multiplier) = self.volume_multiplier {
            playback.initial_volume_multiplier = multiplier;
        }

        let config = CoreConfig {
            dispatcher,
            playback,
            logging: self.logging,
        };

        config.validate()?;

        Ok(config)
    }
}
