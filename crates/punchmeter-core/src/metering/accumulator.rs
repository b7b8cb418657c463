//! 100 ms mean-square power accumulation.

/// Gating block length as a fraction of a second (100 ms hop).
pub const BLOCKS_PER_SECOND: f64 = 10.0;

/// Maximum channels metered (mono or stereo).
pub const MAX_CHANNELS: usize = 2;

/// BS.1770 channel weight. Left, right and centre/mono all weigh 1.0;
/// surround weights (1.41) are never reached with at most two channels.
#[inline]
pub fn channel_weight(_channel: usize) -> f64 {
    1.0
}

/// Reduces K-weighted samples into one channel-weighted mean-square power
/// per 100 ms of audio.
///
/// Callback boundaries do not have to line up with window boundaries; a
/// partial window is carried into the next call.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPowerAccumulator {
    sum_sq: [f64; MAX_CHANNELS],
    channels: usize,
    frames: usize,
    window_frames: usize,
}

impl BlockPowerAccumulator {
    /// Panics if `channels` is zero or above [`MAX_CHANNELS`]; the meter
    /// validates this before construction.
    pub fn new(sample_rate: f64, channels: usize) -> Self {
        assert!((1..=MAX_CHANNELS).contains(&channels));
        let window_frames = ((sample_rate / BLOCKS_PER_SECOND).round() as usize).max(1);
        Self {
            sum_sq: [0.0; MAX_CHANNELS],
            channels,
            frames: 0,
            window_frames,
        }
    }

    /// Adds one filtered sample for `channel` in the current frame.
    #[inline]
    pub fn add(&mut self, channel: usize, sample: f64) {
        self.sum_sq[channel] += sample * sample;
    }

    /// Closes the current frame. Returns the block power once a full
    /// window has accumulated, then starts the next window.
    #[inline]
    pub fn end_frame(&mut self) -> Option<f64> {
        self.frames += 1;
        if self.frames < self.window_frames {
            return None;
        }

        let n = self.frames as f64;
        let mut power = 0.0;
        for (channel, sum) in self.sum_sq[..self.channels].iter_mut().enumerate() {
            power += channel_weight(channel) * (*sum / n);
            *sum = 0.0;
        }
        self.frames = 0;
        Some(power)
    }

    pub fn clear(&mut self) {
        self.sum_sq = [0.0; MAX_CHANNELS];
        self.frames = 0;
    }

    /// Frames per 100 ms block at the prepared sample rate.
    pub fn window_frames(&self) -> usize {
        self.window_frames
    }

    /// Frames accumulated towards the current (incomplete) block.
    pub fn pending_frames(&self) -> usize {
        self.frames
    }
}
