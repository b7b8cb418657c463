//! Momentary (400 ms) and short-term (3 s) loudness over 100 ms block powers.

/// Sentinel loudness reported for silence or insufficient data.
pub const SILENCE_LUFS: f64 = -144.0;

/// Blocks in the momentary window (4 × 100 ms).
pub const MOMENTARY_BLOCKS: usize = 4;

/// Blocks in the short-term window (30 × 100 ms).
pub const SHORT_TERM_BLOCKS: usize = 30;

/// BS.1770 loudness of a channel-weighted mean-square power.
///
/// Returns [`SILENCE_LUFS`] for zero, negative or non-finite power, and
/// never reports anything quieter than the sentinel.
#[inline]
pub fn power_to_lufs(power: f64) -> f64 {
    if power <= 0.0 || !power.is_finite() {
        return SILENCE_LUFS;
    }
    let lufs = -0.691 + 10.0 * power.log10();
    if lufs.is_finite() {
        lufs.max(SILENCE_LUFS)
    } else {
        SILENCE_LUFS
    }
}

/// Inverse of [`power_to_lufs`].
#[inline]
pub fn lufs_to_power(lufs: f64) -> f64 {
    10.0_f64.powf((lufs + 0.691) / 10.0)
}

/// Ring of the most recent 100 ms block powers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessWindows {
    powers: [f64; SHORT_TERM_BLOCKS],
    /// Next write slot.
    head: usize,
    /// Blocks seen since the last clear, saturating at the ring size.
    filled: usize,
}

impl Default for LoudnessWindows {
    fn default() -> Self {
        Self::new()
    }
}

impl LoudnessWindows {
    pub fn new() -> Self {
        Self {
            powers: [0.0; SHORT_TERM_BLOCKS],
            head: 0,
            filled: 0,
        }
    }

    pub fn push(&mut self, power: f64) {
        self.powers[self.head] = power;
        self.head = (self.head + 1) % SHORT_TERM_BLOCKS;
        self.filled = (self.filled + 1).min(SHORT_TERM_BLOCKS);
    }

    /// Mean power of the newest `blocks` entries, or `None` until that many exist.
    pub fn mean_power(&self, blocks: usize) -> Option<f64> {
        debug_assert!(blocks > 0 && blocks <= SHORT_TERM_BLOCKS);
        if self.filled < blocks {
            return None;
        }
        let sum: f64 = (1..=blocks)
            .map(|back| self.powers[(self.head + SHORT_TERM_BLOCKS - back) % SHORT_TERM_BLOCKS])
            .sum();
        Some(sum / blocks as f64)
    }

    pub fn momentary_lufs(&self) -> f64 {
        self.mean_power(MOMENTARY_BLOCKS)
            .map_or(SILENCE_LUFS, power_to_lufs)
    }

    pub fn short_term_lufs(&self) -> f64 {
        self.mean_power(SHORT_TERM_BLOCKS)
            .map_or(SILENCE_LUFS, power_to_lufs)
    }

    /// True once a full 3 s window exists.
    pub fn short_term_ready(&self) -> bool {
        self.filled >= SHORT_TERM_BLOCKS
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
