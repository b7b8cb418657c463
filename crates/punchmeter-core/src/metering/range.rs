//! Loudness range (EBU Tech 3342 style two-stage gating).
//!
//! The history holds one 3 s short-term loudness value per 100 ms hop since
//! the last reset. LRA is the spread between the 10th and 95th percentile of
//! the values that survive an absolute gate (-70 LUFS) and a relative gate
//! (20 LU below the gated mean).

use super::window::{lufs_to_power, power_to_lufs};
use std::collections::VecDeque;

/// Absolute gate in LUFS.
pub const ABSOLUTE_GATE_LUFS: f64 = -70.0;

/// Relative gate below the mean of the absolutely gated blocks, in LU.
pub const RELATIVE_GATE_LU: f64 = 20.0;

const LOW_PERCENTILE: f64 = 0.10;
const HIGH_PERCENTILE: f64 = 0.95;

/// Fewer surviving blocks than this yields an LRA of zero.
const MIN_GATED_BLOCKS: usize = 2;

/// One short-term loudness value in the LRA history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GatingBlock {
    pub loudness_lu: f64,
    pub absolute_gate_pass: bool,
}

impl GatingBlock {
    pub fn new(loudness_lu: f64) -> Self {
        Self {
            loudness_lu,
            absolute_gate_pass: loudness_lu >= ABSOLUTE_GATE_LUFS,
        }
    }
}

/// Bounded, append-only history of gating blocks.
///
/// Storage is reserved up front; once full, the oldest block is evicted
/// before each append so the buffer never grows.
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessHistory {
    blocks: VecDeque<GatingBlock>,
    capacity: usize,
}

impl LoudnessHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            blocks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, block: GatingBlock) {
        if self.blocks.len() == self.capacity {
            self.blocks.pop_front();
        }
        self.blocks.push_back(block);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &GatingBlock> + '_ {
        self.blocks.iter()
    }
}

/// Computes LRA over `history`, using `scratch` for the sorted snapshot.
///
/// `scratch` should have at least `history.capacity()` reserved; it is
/// cleared and refilled, so no allocation happens when it does. Degenerate
/// results (too few blocks, NaN, infinities, negative spread) return `0.0`.
pub fn loudness_range(history: &LoudnessHistory, scratch: &mut Vec<f64>) -> f64 {
    scratch.clear();

    let mut gated_power = 0.0;
    let mut gated_count = 0usize;
    for block in history.iter().filter(|b| b.absolute_gate_pass) {
        gated_power += lufs_to_power(block.loudness_lu);
        gated_count += 1;
    }
    if gated_count < MIN_GATED_BLOCKS {
        return 0.0;
    }

    let mean_lufs = power_to_lufs(gated_power / gated_count as f64);
    let relative_gate = mean_lufs - RELATIVE_GATE_LU;

    scratch.extend(
        history
            .iter()
            .filter(|b| b.absolute_gate_pass && b.loudness_lu >= relative_gate)
            .map(|b| b.loudness_lu),
    );
    if scratch.len() < MIN_GATED_BLOCKS {
        return 0.0;
    }

    scratch.sort_unstable_by(f64::total_cmp);
    let lra = percentile(scratch, HIGH_PERCENTILE) - percentile(scratch, LOW_PERCENTILE);

    if lra.is_finite() {
        lra.max(0.0)
    } else {
        0.0
    }
}

/// Linear interpolation between order statistics of a sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
