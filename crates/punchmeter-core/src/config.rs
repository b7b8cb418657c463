//! Meter and monitor configuration.

use crate::{Error, Result};

/// Shortest history that can hold a single 3 s short-term window.
const MIN_HISTORY_SECONDS: f64 = 3.0;

/// Configuration for [`LoudnessMeter`](crate::LoudnessMeter).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterConfig {
    /// Upper bound on the LRA history. Older 100 ms entries are evicted.
    pub history_seconds: f64,
    /// Processed-audio interval between LRA recomputations.
    pub lra_update_seconds: f64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            history_seconds: 30.0 * 60.0,
            lra_update_seconds: 1.0,
        }
    }
}

impl MeterConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.history_seconds.is_finite() || self.history_seconds <= MIN_HISTORY_SECONDS {
            return Err(Error::InvalidConfig(format!(
                "history_seconds {} must be finite and greater than {}",
                self.history_seconds, MIN_HISTORY_SECONDS
            )));
        }
        if !self.lra_update_seconds.is_finite() || self.lra_update_seconds <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "lra_update_seconds {} must be finite and positive",
                self.lra_update_seconds
            )));
        }
        Ok(())
    }
}

/// Timing and threshold configuration for [`DynamicsMonitor`](crate::DynamicsMonitor).
///
/// Durations are given in seconds and converted to sample counts when the
/// monitor is prepared, so they track processed audio rather than wall time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Processed audio required in `Measuring` before the first verdict.
    pub measuring_window_seconds: f64,
    /// Continuous silence after which a verdict falls back to `AwaitingAudio`.
    pub silence_timeout_seconds: f64,
    /// Block peak (dBFS) above which a block counts as signal.
    pub silence_threshold_db: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            measuring_window_seconds: 12.0,
            silence_timeout_seconds: 60.0,
            silence_threshold_db: -60.0,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.measuring_window_seconds.is_finite() || self.measuring_window_seconds <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "measuring_window_seconds {} must be finite and positive",
                self.measuring_window_seconds
            )));
        }
        if !self.silence_timeout_seconds.is_finite() || self.silence_timeout_seconds <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "silence_timeout_seconds {} must be finite and positive",
                self.silence_timeout_seconds
            )));
        }
        if !self.silence_threshold_db.is_finite() || self.silence_threshold_db > 0.0 {
            return Err(Error::InvalidConfig(format!(
                "silence_threshold_db {} must be finite and at most 0 dBFS",
                self.silence_threshold_db
            )));
        }
        Ok(())
    }
}

/// Converts a duration to a whole number of frames (at least one).
pub(crate) fn seconds_to_frames(seconds: f64, sample_rate: f64) -> u64 {
    ((seconds * sample_rate).round() as u64).max(1)
}
