//! Block sample-peak reduction.

/// Lowest reported peak level in dBFS.
pub const PEAK_FLOOR_DB: f32 = -100.0;

/// Converts a linear gain to dB, clamped at `floor_db`.
#[inline]
pub fn gain_to_db(gain: f32, floor_db: f32) -> f32 {
    if gain > 0.0 && gain.is_finite() {
        (20.0 * gain.log10()).max(floor_db)
    } else {
        floor_db
    }
}

/// Maximum absolute sample of an interleaved or single-channel buffer.
#[inline]
pub fn block_peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
}
