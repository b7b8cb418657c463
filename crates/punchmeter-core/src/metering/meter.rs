//! Streaming loudness meter: K-weighting → 100 ms powers → momentary,
//! short-term and loudness range.

use super::accumulator::{BlockPowerAccumulator, BLOCKS_PER_SECOND, MAX_CHANNELS};
use super::filter::KWeighting;
use super::peak::block_peak;
use super::range::{loudness_range, GatingBlock, LoudnessHistory};
use super::window::LoudnessWindows;
use crate::config::MeterConfig;
use crate::{Error, Result};

/// Placeholder rate for an unprepared meter; never used to produce readings.
const UNPREPARED_SAMPLE_RATE: f64 = 48000.0;

/// Real-time loudness meter.
///
/// All storage is sized in [`prepare`](Self::prepare); `process_*` never
/// allocates and is meant to run on the audio thread. Readings are plain
/// getters on the owning thread; use a
/// [`ResultBridge`](crate::ResultBridge) to hand them to another thread.
///
/// # Example
///
/// ```
/// use punchmeter_core::LoudnessMeter;
///
/// let mut meter = LoudnessMeter::new();
/// meter.prepare(48000.0, 2, 512).unwrap();
///
/// let block = vec![0.0f32; 512 * 2];
/// meter.process_interleaved(&block).unwrap();
///
/// assert_eq!(meter.short_term_loudness(), -144.0);
/// assert_eq!(meter.loudness_range(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessMeter {
    config: MeterConfig,

    sample_rate: f64,
    channels: usize,
    max_block_size: usize,
    prepared: bool,

    filters: Vec<KWeighting>,
    accumulator: BlockPowerAccumulator,
    windows: LoudnessWindows,
    history: LoudnessHistory,
    /// Sorted snapshot buffer for LRA percentiles, reserved to history capacity.
    scratch: Vec<f64>,

    lra: f64,
    lra_interval_blocks: usize,
    blocks_since_lra: usize,
    lra_updated: bool,
}

impl Default for LoudnessMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoudnessMeter {
    /// Unprepared meter with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(MeterConfig::default())
    }

    /// Unprepared meter with a custom configuration.
    pub fn with_config(config: MeterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: MeterConfig) -> Self {
        Self {
            config,
            sample_rate: UNPREPARED_SAMPLE_RATE,
            channels: 0,
            max_block_size: 0,
            prepared: false,
            filters: Vec::new(),
            accumulator: BlockPowerAccumulator::new(UNPREPARED_SAMPLE_RATE, 1),
            windows: LoudnessWindows::new(),
            history: LoudnessHistory::with_capacity(1),
            scratch: Vec::new(),
            lra: 0.0,
            lra_interval_blocks: 1,
            blocks_since_lra: 0,
            lra_updated: false,
        }
    }

    /// (Re)initialises filters and buffers for a stream format.
    ///
    /// Must be called before processing and again whenever the sample rate
    /// changes: K-weighting coefficients are only valid for the rate they
    /// were designed for. On error the meter is left unprepared.
    pub fn prepare(&mut self, sample_rate: f64, channels: usize, max_block_size: usize) -> Result<()> {
        self.prepared = false;

        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(Error::UnsupportedChannelCount(channels));
        }
        if max_block_size == 0 {
            return Err(Error::InvalidBlockSize(max_block_size));
        }

        if self.filters.first().is_some_and(|f| f.sample_rate() != sample_rate) {
            tracing::debug!(
                from = self.sample_rate,
                to = sample_rate,
                "sample rate changed, recomputing K-weighting"
            );
        }

        let history_blocks = (self.config.history_seconds * BLOCKS_PER_SECOND).ceil() as usize;

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.max_block_size = max_block_size;
        self.filters = vec![KWeighting::new(sample_rate); channels];
        self.accumulator = BlockPowerAccumulator::new(sample_rate, channels);
        self.history = LoudnessHistory::with_capacity(history_blocks);
        self.scratch = Vec::with_capacity(self.history.capacity());
        self.lra_interval_blocks =
            ((self.config.lra_update_seconds * BLOCKS_PER_SECOND).round() as usize).max(1);
        self.reset();
        self.prepared = true;

        tracing::info!(
            sample_rate,
            channels,
            max_block_size,
            history_blocks,
            "loudness meter prepared"
        );
        Ok(())
    }

    /// Clears history, windows, accumulators and filter memory.
    ///
    /// Coefficients and buffer capacities are kept. Calling it twice is the
    /// same as calling it once.
    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
        self.accumulator.clear();
        self.windows.clear();
        self.history.clear();
        self.scratch.clear();
        self.lra = 0.0;
        self.blocks_since_lra = 0;
        self.lra_updated = false;
    }

    /// Meters an interleaved block. Returns the block's linear sample peak.
    pub fn process_interleaved(&mut self, samples: &[f32]) -> Result<f32> {
        self.ensure_prepared()?;
        let channels = self.channels;
        if samples.len() % channels != 0 {
            return Err(Error::MisalignedBuffer {
                len: samples.len(),
                channels,
            });
        }
        let frames = samples.len() / channels;
        self.ensure_block_size(frames)?;

        self.run(frames, |frame, ch| samples[frame * channels + ch]);
        Ok(block_peak(samples))
    }

    /// Meters a planar block (one slice per channel, equal lengths).
    /// Returns the block's linear sample peak.
    pub fn process_planar(&mut self, channels: &[&[f32]]) -> Result<f32> {
        self.ensure_prepared()?;
        if channels.len() != self.channels {
            return Err(Error::ChannelMismatch {
                expected: self.channels,
                got: channels.len(),
            });
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(Error::MisalignedBuffer {
                len: channels.iter().map(|c| c.len()).sum(),
                channels: channels.len(),
            });
        }
        self.ensure_block_size(frames)?;

        self.run(frames, |frame, ch| channels[ch][frame]);
        Ok(channels
            .iter()
            .fold(0.0_f32, |peak, c| peak.max(block_peak(c))))
    }

    #[inline]
    fn ensure_prepared(&self) -> Result<()> {
        if self.prepared {
            Ok(())
        } else {
            Err(Error::NotPrepared)
        }
    }

    #[inline]
    fn ensure_block_size(&self, frames: usize) -> Result<()> {
        if frames > self.max_block_size {
            return Err(Error::BlockTooLarge {
                frames,
                max: self.max_block_size,
            });
        }
        Ok(())
    }

    #[inline]
    fn run(&mut self, frames: usize, sample: impl Fn(usize, usize) -> f32) {
        for frame in 0..frames {
            for (ch, filter) in self.filters.iter_mut().enumerate() {
                let weighted = filter.process(f64::from(sample(frame, ch)));
                self.accumulator.add(ch, weighted);
            }
            if let Some(power) = self.accumulator.end_frame() {
                self.push_block(power);
            }
        }
    }

    fn push_block(&mut self, power: f64) {
        self.windows.push(power);
        if self.windows.short_term_ready() {
            self.history
                .push(GatingBlock::new(self.windows.short_term_lufs()));
        }

        self.blocks_since_lra += 1;
        if self.blocks_since_lra >= self.lra_interval_blocks {
            self.blocks_since_lra = 0;
            self.lra = loudness_range(&self.history, &mut self.scratch);
            self.lra_updated = true;
        }
    }

    /// Momentary loudness (400 ms) in LUFS, or `-144.0`.
    pub fn momentary_loudness(&self) -> f64 {
        self.windows.momentary_lufs()
    }

    /// Short-term loudness (3 s) in LUFS, or `-144.0`.
    pub fn short_term_loudness(&self) -> f64 {
        self.windows.short_term_lufs()
    }

    /// Loudness range in LU as of the last recomputation.
    pub fn loudness_range(&self) -> f64 {
        self.lra
    }

    /// Returns whether LRA was recomputed since the previous call.
    pub fn take_lra_update(&mut self) -> bool {
        core::mem::take(&mut self.lra_updated)
    }

    /// Number of 3 s windows in the LRA history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &LoudnessHistory {
        &self.history
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }
}
