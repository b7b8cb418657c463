//! Dynamics monitor state machine.
//!
//! Turns the LRA stream into a verdict. Timing is counted in processed
//! frames, so the machine behaves identically offline and in real time.

use super::preset::DynamicsPreset;
use crate::config::{seconds_to_frames, MonitorConfig};
use crate::Result;
use core::fmt;

/// Monitor status as published to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MonitorState {
    /// No signal since the last reset.
    #[default]
    AwaitingAudio = 0,
    /// Signal present, collecting enough audio for a first verdict.
    Measuring = 1,
    Ok = 2,
    Reduced = 3,
    Loss = 4,
    /// Host bypass engaged; readings are frozen.
    Bypassed = 5,
}

impl MonitorState {
    pub(crate) fn from_u8(val: u8) -> Self {
        match val {
            1 => MonitorState::Measuring,
            2 => MonitorState::Ok,
            3 => MonitorState::Reduced,
            4 => MonitorState::Loss,
            5 => MonitorState::Bypassed,
            _ => MonitorState::AwaitingAudio,
        }
    }

    /// Status line for display.
    pub fn message(self) -> &'static str {
        match self {
            MonitorState::Ok => "Dynamics: OK",
            MonitorState::Reduced => "Dynamics: Reduced",
            MonitorState::Loss => "Dynamics: Loss Risk",
            MonitorState::Measuring => "Measuring LRA...",
            MonitorState::AwaitingAudio => "Awaiting Audio...",
            MonitorState::Bypassed => "Monitoring Bypassed",
        }
    }

    /// True for `Ok`, `Reduced` and `Loss`.
    pub fn is_verdict(self) -> bool {
        matches!(
            self,
            MonitorState::Ok | MonitorState::Reduced | MonitorState::Loss
        )
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-block input to [`DynamicsMonitor::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonitorInput {
    /// Latest loudness range in LU.
    pub lra_lu: f64,
    /// Frames in the block just processed.
    pub block_frames: usize,
    /// Block peak exceeded the silence threshold.
    pub signal_present: bool,
    /// LRA was recomputed during this block.
    pub lra_updated: bool,
    pub bypassed: bool,
}

/// Maps an LRA onto a verdict. Values on a threshold get the better category.
pub fn evaluate(lra_lu: f64, preset: &DynamicsPreset) -> MonitorState {
    if lra_lu < preset.lra_threshold_red {
        MonitorState::Loss
    } else if lra_lu < preset.lra_threshold_amber {
        MonitorState::Reduced
    } else {
        MonitorState::Ok
    }
}

/// Deterministic monitor driven once per processed block.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsMonitor {
    config: MonitorConfig,
    state: MonitorState,
    measuring_window_frames: u64,
    silence_timeout_frames: u64,
    /// Frames of audio since entering `Measuring`.
    samples_since_reset: u64,
    /// Consecutive silent frames while holding a verdict.
    silent_frames: u64,
}

impl DynamicsMonitor {
    /// Creates a monitor; call [`prepare`](Self::prepare) before the first update.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        let mut monitor = Self {
            config,
            state: MonitorState::AwaitingAudio,
            measuring_window_frames: 0,
            silence_timeout_frames: 0,
            samples_since_reset: 0,
            silent_frames: 0,
        };
        monitor.prepare(48000.0);
        Ok(monitor)
    }

    /// Converts configured durations to frames at `sample_rate` and resets.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.measuring_window_frames =
            seconds_to_frames(self.config.measuring_window_seconds, sample_rate);
        self.silence_timeout_frames =
            seconds_to_frames(self.config.silence_timeout_seconds, sample_rate);
        self.reset();
    }

    /// Back to `AwaitingAudio` with zeroed counters.
    pub fn reset(&mut self) {
        self.transition(MonitorState::AwaitingAudio, 0.0);
        self.samples_since_reset = 0;
        self.silent_frames = 0;
    }

    /// Advances the machine by one block and returns the new state.
    pub fn update(&mut self, input: MonitorInput, preset: &DynamicsPreset) -> MonitorState {
        let frames = input.block_frames as u64;

        if input.bypassed {
            self.transition(MonitorState::Bypassed, input.lra_lu);
            return self.state;
        }

        match self.state {
            MonitorState::Bypassed => {
                self.samples_since_reset = 0;
                self.silent_frames = 0;
                self.transition(MonitorState::AwaitingAudio, input.lra_lu);
            }
            MonitorState::AwaitingAudio => {
                if input.signal_present {
                    self.samples_since_reset = frames;
                    self.silent_frames = 0;
                    self.transition(MonitorState::Measuring, input.lra_lu);
                }
            }
            MonitorState::Measuring => {
                if !input.signal_present {
                    self.transition(MonitorState::AwaitingAudio, input.lra_lu);
                } else {
                    self.samples_since_reset = self.samples_since_reset.saturating_add(frames);
                    if self.samples_since_reset >= self.measuring_window_frames {
                        self.transition(evaluate(input.lra_lu, preset), input.lra_lu);
                    }
                }
            }
            MonitorState::Ok | MonitorState::Reduced | MonitorState::Loss => {
                self.samples_since_reset = self.samples_since_reset.saturating_add(frames);
                if input.signal_present {
                    self.silent_frames = 0;
                } else {
                    self.silent_frames = self.silent_frames.saturating_add(frames);
                    if self.silent_frames >= self.silence_timeout_frames {
                        self.samples_since_reset = 0;
                        self.silent_frames = 0;
                        self.transition(MonitorState::AwaitingAudio, input.lra_lu);
                        return self.state;
                    }
                }
                if input.lra_updated {
                    self.transition(evaluate(input.lra_lu, preset), input.lra_lu);
                }
            }
        }

        self.state
    }

    fn transition(&mut self, next: MonitorState, lra_lu: f64) {
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, lra_lu, "monitor state changed");
            self.state = next;
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn samples_since_reset(&self) -> u64 {
        self.samples_since_reset
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Block peak in dBFS above which a block counts as signal.
    pub fn silence_threshold_db(&self) -> f32 {
        self.config.silence_threshold_db
    }
}
