//! User volume vs. engine volume.
//!
//! The engine always receives `user_volume * multiplier`; reads divide the
//! multiplier back out.

use crate::error::{PlaybackError, Result};

#[derive(Debug)]
pub struct VolumeMultiplier {
    value: parking_lot::Mutex<f32>,
}

impl VolumeMultiplier {
    /// Create a multiplier, rejecting non-finite and non-positive values.
    pub fn new(value: f32) -> Result<Self> {
        validate_multiplier(value)?;
        Ok(Self {
            value: parking_lot::Mutex::new(value),
        })
    }

    pub fn get(&self) -> f32 {
        *self.value.lock()
    }

    pub fn set(&self, value: f32) -> Result<()> {
        validate_multiplier(value)?;
        *self.value.lock() = value;
        Ok(())
    }

    /// User-facing volume for a raw engine volume.
    pub fn to_user(&self, engine_volume: f32) -> f32 {
        engine_volume / self.get()
    }

    /// Raw engine volume for a user-facing volume.
    pub fn to_engine(&self, user_volume: f32) -> f32 {
        user_volume * self.get()
    }
}

impl Default for VolumeMultiplier {
    fn default() -> Self {
        Self {
            value: parking_lot::Mutex::new(1.0),
        }
    }
}

pub fn validate_volume(volume: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&volume) {
        return Err(PlaybackError::InvalidVolume(volume));
    }
    Ok(())
}

pub fn validate_multiplier(multiplier: f32) -> Result<()> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(PlaybackError::InvalidMultiplier(multiplier));
    }
    Ok(())
}

pub fn validate_rate(rate: f32) -> Result<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(PlaybackError::InvalidRate(rate));
    }
    Ok(())
}
