//! Test helpers and fixtures for punchmeter integration tests
//!
//! Signals are generated deterministically and fed in fixed-size blocks, so
//! every test sees the same sample-accurate timeline. Use [`tolerances`] for
//! loudness comparisons.

#![allow(dead_code)]


use punchmeter::prelude::*;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// 10 ms at 48 kHz: ten blocks per 100 ms gating block.
pub const TEST_BUFFER_SIZE: usize = 480;

/// Mono engine at the test rate with default configuration.
pub fn test_engine() -> PunchEngine {
    test_engine_with(PunchEngine::builder(), 1)
}

/// Prepares `builder` at the test rate with `channels` channels.
pub fn test_engine_with(builder: PunchEngineBuilder, channels: usize) -> PunchEngine {
    builder
        .format(TEST_SAMPLE_RATE, channels, TEST_BUFFER_SIZE)
        .build()
        .expect("Failed to create test engine")
}

/// Number of frames in `seconds` at the test rate.
pub fn frames(seconds: f64) -> usize {
    (seconds * TEST_SAMPLE_RATE).round() as usize
}

/// Sine wave at `frequency` with peak `amplitude`.
pub fn generate_sine(frequency: f64, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / TEST_SAMPLE_RATE;
            amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Reproducible white noise in `-amplitude..amplitude`.
pub fn generate_noise(num_samples: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            (((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Interleaves equal-length channels.
pub fn interleave(channels: &[&[f32]]) -> Vec<f32> {
    let frames = channels.first().map_or(0, |c| c.len());
    (0..frames)
        .flat_map(|i| channels.iter().map(move |c| c[i]))
        .collect()
}

/// Concatenates signal segments.
pub fn concat(segments: &[&[f32]]) -> Vec<f32> {
    segments.iter().flat_map(|s| s.iter().copied()).collect()
}

/// Feeds an interleaved signal in test-sized blocks, returning the state
/// after each block.
pub fn feed(engine: &mut PunchEngine, signal: &[f32]) -> Vec<MonitorState> {
    let chunk = TEST_BUFFER_SIZE * engine.channels();
    signal
        .chunks(chunk)
        .map(|block| engine.process_interleaved(block).expect("process failed"))
        .collect()
}

/// Consecutive duplicates removed.
pub fn transitions(states: &[MonitorState]) -> Vec<MonitorState> {
    let mut out: Vec<MonitorState> = Vec::new();
    for &state in states {
        if out.last() != Some(&state) {
            out.push(state);
        }
    }
    out
}

/// Assert that two loudness readings agree within `tolerance` LU.
pub fn assert_lu_eq(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "Expected {} LU/LUFS (±{}), got {}",
        expected,
        tolerance,
        actual
    );
}
