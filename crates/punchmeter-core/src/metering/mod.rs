//! Loudness metering.
//!
//! - Signal chain: [`KWeighting`] → [`BlockPowerAccumulator`] →
//!   [`LoudnessWindows`] → [`LoudnessHistory`] / [`loudness_range`]
//! - [`LoudnessMeter`] wires the chain together for the audio thread
//! - [`ResultBridge`] publishes readings to other threads

mod accumulator;
mod bridge;
mod filter;
mod meter;
mod peak;
mod range;
mod window;

pub use accumulator::{channel_weight, BlockPowerAccumulator, BLOCKS_PER_SECOND, MAX_CHANNELS};
pub use bridge::{ResultBridge, ResultSnapshot};
pub use filter::{Biquad, KWeighting};
pub use meter::LoudnessMeter;
pub use peak::{block_peak, gain_to_db, PEAK_FLOOR_DB};
pub use range::{
    loudness_range, GatingBlock, LoudnessHistory, ABSOLUTE_GATE_LUFS, RELATIVE_GATE_LU,
};
pub use window::{
    lufs_to_power, power_to_lufs, LoudnessWindows, MOMENTARY_BLOCKS, SHORT_TERM_BLOCKS,
    SILENCE_LUFS,
};
