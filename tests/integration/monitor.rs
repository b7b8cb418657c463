//! Monitor integration tests
//!
//! End-to-end state sequences driven by real audio through the engine.

use crate::helpers::*;
use punchmeter::prelude::*;

fn position(states: &[MonitorState], target: MonitorState) -> Option<usize> {
    states.iter().position(|s| *s == target)
}

/// A steady sine has essentially zero range, which is below every red threshold.
#[test]
fn test_steady_sine_is_flagged_as_loss() {
    let (edm, _) = find_preset("edm").unwrap();
    let mut engine = test_engine_with(PunchEngine::builder().preset(edm), 1);
    let states = feed(&mut engine, &generate_sine(1000.0, 0.5, frames(20.0)));

    assert_eq!(
        transitions(&states),
        vec![MonitorState::Measuring, MonitorState::Loss]
    );
    // The verdict lands on the block that completes the 12 s measuring window.
    let verdict_block = position(&states, MonitorState::Loss).unwrap();
    assert_eq!((verdict_block + 1) * TEST_BUFFER_SIZE, frames(12.0));
    assert!(engine.loudness_range() < 3.0);
    assert_eq!(engine.snapshot().status, MonitorState::Loss);
}

/// Leading silence keeps the monitor waiting; signal then passes through Measuring.
#[test]
fn test_silence_then_signal_passes_through_measuring() {
    let mut engine = test_engine();
    let signal = concat(&[
        &generate_silence(frames(5.0)),
        &generate_sine(1000.0, 0.5, frames(20.0)),
    ]);
    let states = feed(&mut engine, &signal);

    let seq = transitions(&states);
    assert_eq!(seq[0], MonitorState::AwaitingAudio);
    assert_eq!(seq[1], MonitorState::Measuring);
    assert!(seq[2].is_verdict());
    assert!(seq[2..].iter().all(|s| s.is_verdict()));

    // Measuring starts on the first signal block.
    let measuring = position(&states, MonitorState::Measuring).unwrap();
    assert_eq!(measuring * TEST_BUFFER_SIZE, frames(5.0));
}

/// A gap during Measuring sends the monitor back to wait; the window restarts.
#[test]
fn test_gap_while_measuring_restarts_window() {
    let mut engine = test_engine();
    let sine = generate_sine(1000.0, 0.5, frames(8.0));
    let signal = concat(&[&sine, &generate_silence(frames(1.0)), &sine, &sine]);
    let states = feed(&mut engine, &signal);

    let seq = transitions(&states);
    assert_eq!(
        &seq[..4],
        &[
            MonitorState::Measuring,
            MonitorState::AwaitingAudio,
            MonitorState::Measuring,
            seq[3],
        ]
    );
    assert!(seq[3].is_verdict());

    // Second window starts at 9 s and needs a full 12 s.
    let first_verdict = states.iter().position(|s| s.is_verdict()).unwrap();
    assert_eq!((first_verdict + 1) * TEST_BUFFER_SIZE, frames(21.0));
}

/// Long silence after a verdict drops back to AwaitingAudio.
#[test]
fn test_silence_timeout_after_verdict() {
    let builder = PunchEngine::builder().monitor_config(MonitorConfig {
        measuring_window_seconds: 2.0,
        silence_timeout_seconds: 3.0,
        silence_threshold_db: -60.0,
    });
    let mut engine = test_engine_with(builder, 1);
    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(4.0)));
    assert!(engine.status().is_verdict());

    let states = feed(&mut engine, &generate_silence(frames(3.0)));
    assert!(states[..states.len() - 1].iter().all(|s| s.is_verdict()));
    assert_eq!(*states.last().unwrap(), MonitorState::AwaitingAudio);
    assert_eq!(engine.samples_since_reset(), 0);
}

/// Signal just below the threshold counts as silence.
#[test]
fn test_signal_below_threshold_is_silence() {
    let mut engine = test_engine();
    // -66 dBFS peak
    let states = feed(&mut engine, &generate_sine(1000.0, 0.0005, frames(5.0)));
    assert!(states.iter().all(|s| *s == MonitorState::AwaitingAudio));
}

/// A wide-range programme on the classical preset reaches a verdict that
/// matches `evaluate` on the final LRA.
#[test]
fn test_verdict_matches_final_range() {
    let (classical, preset) = find_preset("classical").unwrap();
    let mut engine = test_engine_with(PunchEngine::builder().preset(classical), 1);

    let mut segments = Vec::new();
    for (i, amp) in [0.8f32, 0.2, 0.5, 0.1, 0.9, 0.3].iter().enumerate() {
        segments.push(generate_sine(500.0 + 100.0 * i as f64, *amp, frames(5.0)));
    }
    let refs: Vec<&[f32]> = segments.iter().map(|s| s.as_slice()).collect();
    feed(&mut engine, &concat(&refs));

    // 30 s is a whole number of LRA updates, so the last evaluation used this value.
    assert_eq!(
        engine.status(),
        punchmeter::core::evaluate(engine.loudness_range(), preset)
    );
}
