//! Error types for punchmeter-core.

use thiserror::Error;

/// Error type for punchmeter-core operations.
///
/// Variants returned from the audio path (`NotPrepared`, `ChannelMismatch`,
/// `BlockTooLarge`, `MisalignedBuffer`) carry no heap data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid sample rate: {0} Hz. Must be finite and positive")]
    InvalidSampleRate(f64),

    #[error("Unsupported channel count: {0}. Only mono and stereo are metered")]
    UnsupportedChannelCount(usize),

    #[error("Invalid maximum block size: {0}. Must be at least 1 frame")]
    InvalidBlockSize(usize),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Meter used before prepare()")]
    NotPrepared,

    #[error("Channel mismatch: prepared for {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("Block of {frames} frames exceeds prepared maximum of {max}")]
    BlockTooLarge { frames: usize, max: usize },

    #[error("Buffer of {len} samples does not divide into {channels} equal channels")]
    MisalignedBuffer { len: usize, channels: usize },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
