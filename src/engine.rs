//! PunchEngine that ties the meter, the monitor and the result bridge together

use crate::Result;
use punchmeter_core::{
    gain_to_db, preset_or_default, AtomicFlag, AtomicIndex, DynamicsMonitor, DynamicsPreset,
    LoudnessMeter, MonitorInput, MonitorState, ResultBridge, ResultSnapshot, PEAK_FLOOR_DB,
    PRESETS,
};
use std::sync::Arc;

/// Host-side inputs shared with the audio thread.
///
/// Any thread may write these; the engine samples them at the start of each
/// `process_*` call and applies changes between blocks.
#[derive(Debug, Default)]
pub struct EngineControls {
    bypassed: AtomicFlag,
    preset_index: AtomicIndex,
    reset_requested: AtomicFlag,
}

impl EngineControls {
    pub fn new(preset_index: usize, bypassed: bool) -> Self {
        Self {
            bypassed: AtomicFlag::new(bypassed),
            preset_index: AtomicIndex::new(preset_index),
            reset_requested: AtomicFlag::new(false),
        }
    }

    pub fn set_bypassed(&self, bypassed: bool) {
        self.bypassed.set(bypassed);
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed.get()
    }

    /// Out-of-range indices select the default preset.
    pub fn select_preset(&self, index: usize) {
        self.preset_index.set(index);
    }

    pub fn preset_index(&self) -> usize {
        self.preset_index.get()
    }

    /// Clears measurement state at the start of the next block.
    pub fn request_reset(&self) {
        self.reset_requested.set(true);
    }

    pub(crate) fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false)
    }
}

/// Real-time dynamics monitor.
///
/// Owned by the audio thread. Other threads observe it through
/// [`bridge()`](Self::bridge) and steer it through
/// [`controls()`](Self::controls).
///
/// # Example
///
/// ```
/// use punchmeter::prelude::*;
///
/// let mut engine = PunchEngine::builder()
///     .format(48000.0, 2, 512)
///     .build()?;
///
/// let bridge = engine.bridge();
/// engine.process_interleaved(&[0.0; 1024])?;
///
/// assert_eq!(bridge.read().status, MonitorState::AwaitingAudio);
/// # Ok::<(), punchmeter::Error>(())
/// ```
#[derive(Debug)]
pub struct PunchEngine {
    meter: LoudnessMeter,
    monitor: DynamicsMonitor,
    bridge: Arc<ResultBridge>,
    controls: Arc<EngineControls>,

    /// Preset index currently applied (may be out of range).
    active_preset: usize,
    was_bypassed: bool,
    samples_processed: u64,
}

impl PunchEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::PunchEngineBuilder {
        crate::PunchEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        meter: LoudnessMeter,
        monitor: DynamicsMonitor,
        controls: EngineControls,
    ) -> Self {
        let active_preset = controls.preset_index();
        let was_bypassed = controls.is_bypassed();
        if active_preset >= PRESETS.len() {
            tracing::warn!(index = active_preset, "unknown preset, using default");
        }
        Self {
            meter,
            monitor,
            bridge: Arc::new(ResultBridge::new()),
            controls: Arc::new(controls),
            active_preset,
            was_bypassed,
            samples_processed: 0,
        }
    }

    /// Prepares for a stream format and resets all measurement state.
    pub fn prepare(&mut self, sample_rate: f64, channels: usize, max_block_size: usize) -> Result<()> {
        self.meter.prepare(sample_rate, channels, max_block_size)?;
        self.monitor.prepare(sample_rate);
        self.samples_processed = 0;
        self.bridge
            .publish(PEAK_FLOOR_DB, 0.0, self.monitor.state());
        Ok(())
    }

    /// Clears meter history and returns the monitor to `AwaitingAudio`.
    pub fn reset(&mut self) {
        self.reset_with_cause("explicit");
    }

    fn reset_with_cause(&mut self, cause: &'static str) {
        tracing::debug!(cause, "resetting measurement");
        self.meter.reset();
        self.monitor.reset();
        self.bridge
            .publish(PEAK_FLOOR_DB, 0.0, self.monitor.state());
    }

    /// Meters one interleaved block and returns the resulting monitor state.
    pub fn process_interleaved(&mut self, samples: &[f32]) -> Result<MonitorState> {
        if self.begin_block() {
            return Ok(self.hold_bypass());
        }
        let peak = self.meter.process_interleaved(samples)?;
        let frames = samples.len() / self.meter.channels();
        Ok(self.finish_block(frames, peak))
    }

    /// Meters one planar block and returns the resulting monitor state.
    pub fn process_planar(&mut self, channels: &[&[f32]]) -> Result<MonitorState> {
        if self.begin_block() {
            return Ok(self.hold_bypass());
        }
        let peak = self.meter.process_planar(channels)?;
        let frames = channels.first().map_or(0, |c| c.len());
        Ok(self.finish_block(frames, peak))
    }

    /// Applies pending control changes. Returns whether the block is bypassed.
    fn begin_block(&mut self) -> bool {
        if !self.meter.is_prepared() {
            // The meter reports NotPrepared for the block itself.
            return false;
        }

        let index = self.controls.preset_index();
        if index != self.active_preset {
            if index >= PRESETS.len() {
                tracing::warn!(index, "unknown preset, using default");
            }
            self.active_preset = index;
            self.reset_with_cause("preset change");
        }

        if self.controls.take_reset_request() {
            self.reset_with_cause("explicit");
        }

        let bypassed = self.controls.is_bypassed();
        if self.was_bypassed && !bypassed {
            tracing::debug!(cause = "bypass release", "resetting measurement");
            self.meter.reset();
        }
        self.was_bypassed = bypassed;
        bypassed
    }

    /// Peak and LRA stay frozen; only the status is republished.
    fn hold_bypass(&mut self) -> MonitorState {
        let input = MonitorInput {
            lra_lu: self.meter.loudness_range(),
            bypassed: true,
            ..MonitorInput::default()
        };
        let state = self.monitor.update(input, self.preset());
        self.bridge.set_status(state);
        state
    }

    fn finish_block(&mut self, frames: usize, peak: f32) -> MonitorState {
        self.samples_processed = self.samples_processed.saturating_add(frames as u64);

        let peak_db = gain_to_db(peak, PEAK_FLOOR_DB);
        let lra_lu = self.meter.loudness_range();
        let input = MonitorInput {
            lra_lu,
            block_frames: frames,
            signal_present: peak_db > self.monitor.silence_threshold_db(),
            lra_updated: self.meter.take_lra_update(),
            bypassed: false,
        };
        let state = self.monitor.update(input, preset_or_default(self.active_preset));
        self.bridge.publish(peak_db, lra_lu as f32, state);
        state
    }

    /// Engages or releases bypass from the owning thread.
    pub fn set_bypassed(&self, bypassed: bool) {
        self.controls.set_bypassed(bypassed);
    }

    pub fn select_preset(&self, index: usize) {
        self.controls.select_preset(index);
    }

    pub fn request_reset(&self) {
        self.controls.request_reset();
    }

    /// Shared read side for UI or logging threads.
    pub fn bridge(&self) -> Arc<ResultBridge> {
        Arc::clone(&self.bridge)
    }

    /// Shared control side for host threads.
    pub fn controls(&self) -> Arc<EngineControls> {
        Arc::clone(&self.controls)
    }

    pub fn status(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn snapshot(&self) -> ResultSnapshot {
        self.bridge.read()
    }

    /// Preset currently driving the verdict.
    pub fn preset(&self) -> &'static DynamicsPreset {
        preset_or_default(self.active_preset)
    }

    pub fn momentary_loudness(&self) -> f64 {
        self.meter.momentary_loudness()
    }

    pub fn short_term_loudness(&self) -> f64 {
        self.meter.short_term_loudness()
    }

    pub fn loudness_range(&self) -> f64 {
        self.meter.loudness_range()
    }

    /// Frames counted by the monitor since it entered `Measuring`.
    pub fn samples_since_reset(&self) -> u64 {
        self.monitor.samples_since_reset()
    }

    /// Frames metered since `prepare`, excluding bypassed blocks.
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    pub fn sample_rate(&self) -> f64 {
        self.meter.sample_rate()
    }

    pub fn channels(&self) -> usize {
        self.meter.channels()
    }

    pub fn meter(&self) -> &LoudnessMeter {
        &self.meter
    }
}
