//! Engine integration tests
//!
//! Lifecycle, host controls, bypass and reset semantics.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use punchmeter::prelude::*;
use std::sync::Arc;
use std::thread;

/// Bypass mid-measurement freezes results; release starts over.
#[test]
fn test_bypass_then_release_starts_over() {
    let mut engine = test_engine();
    let sine = generate_sine(1000.0, 0.5, frames(5.0));
    feed(&mut engine, &sine);
    assert_eq!(engine.status(), MonitorState::Measuring);
    assert!(engine.meter().history_len() > 0);

    let before = engine.snapshot();
    engine.set_bypassed(true);
    let states = feed(&mut engine, &generate_sine(1000.0, 0.9, frames(1.0)));
    assert!(states.iter().all(|s| *s == MonitorState::Bypassed));

    let frozen = engine.snapshot();
    assert_eq!(frozen.status, MonitorState::Bypassed);
    assert_eq!(frozen.peak_db, before.peak_db);
    assert_eq!(frozen.lra_lu, before.lra_lu);

    engine.set_bypassed(false);
    let state = engine
        .process_interleaved(&sine[..TEST_BUFFER_SIZE])
        .unwrap();
    assert_eq!(state, MonitorState::AwaitingAudio);
    assert_eq!(engine.meter().history_len(), 0);
    assert_eq!(engine.samples_since_reset(), 0);
}

/// Engine built bypassed reports Bypassed from the first block.
#[test]
fn test_built_bypassed() {
    let mut engine = test_engine_with(PunchEngine::builder().bypassed(true), 1);
    let states = feed(&mut engine, &generate_sine(1000.0, 0.5, frames(1.0)));
    assert!(states.iter().all(|s| *s == MonitorState::Bypassed));
    assert_eq!(engine.samples_processed(), 0);
}

/// Reset twice leaves the same state as reset once.
#[test]
fn test_reset_is_idempotent() {
    let mut engine = test_engine();
    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(14.0)));
    assert!(engine.status().is_verdict());

    engine.reset();
    let once = (engine.snapshot(), engine.meter().clone(), engine.status());
    engine.reset();
    let twice = (engine.snapshot(), engine.meter().clone(), engine.status());

    assert_eq!(once, twice);
    assert_eq!(once.2, MonitorState::AwaitingAudio);
    assert_eq!(engine.meter().history_len(), 0);
    assert_eq!(engine.loudness_range(), 0.0);
}

/// A reset requested from another thread applies at the next block.
#[test]
fn test_reset_request_from_other_thread() {
    let mut engine = test_engine();
    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(5.0)));

    let controls = engine.controls();
    thread::spawn(move || controls.request_reset())
        .join()
        .unwrap();

    // Nothing changes until the producer runs.
    assert_eq!(engine.status(), MonitorState::Measuring);
    let state = engine
        .process_interleaved(&generate_silence(TEST_BUFFER_SIZE))
        .unwrap();
    assert_eq!(state, MonitorState::AwaitingAudio);
    assert_eq!(engine.meter().history_len(), 0);
}

/// Changing preset restarts the measurement.
#[test]
fn test_preset_change_restarts_measurement() {
    let mut engine = test_engine();
    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(13.0)));
    assert!(engine.status().is_verdict());

    engine.select_preset(0);
    let states = feed(&mut engine, &generate_sine(1000.0, 0.5, frames(1.0)));
    assert_eq!(states[0], MonitorState::Measuring);
    assert_eq!(engine.preset().id, "edm");
    assert_eq!(engine.meter().history_len(), 0);

    // Re-selecting the same preset is not a change.
    engine.select_preset(0);
    let states = feed(&mut engine, &generate_sine(1000.0, 0.5, frames(1.0)));
    assert!(states.iter().all(|s| *s == MonitorState::Measuring));
}

/// Re-preparing at a new rate rescales the monitor's timing.
#[test]
fn test_prepare_at_new_rate() {
    let mut engine = test_engine();
    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(3.0)));

    engine.prepare(96000.0, 2, 1024).unwrap();
    assert_eq!(engine.sample_rate(), 96000.0);
    assert_eq!(engine.channels(), 2);
    assert_eq!(engine.status(), MonitorState::AwaitingAudio);
    assert_eq!(engine.samples_processed(), 0);

    let block = vec![0.5f32; 2048];
    // 12 s at 96 kHz is exactly 1125 blocks of 1024 frames.
    let blocks = (12.0 * 96000.0 / 1024.0) as usize;
    let mut state = MonitorState::AwaitingAudio;
    for _ in 0..blocks - 1 {
        state = engine.process_interleaved(&block).unwrap();
    }
    assert_eq!(state, MonitorState::Measuring);
    state = engine.process_interleaved(&block).unwrap();
    assert!(state.is_verdict());
}

/// Shape errors surface through the umbrella error type.
#[test]
fn test_errors_propagate() {
    let mut engine = test_engine_with(PunchEngine::builder(), 2);
    let err = engine.process_interleaved(&[0.0; 3]).unwrap_err();
    assert!(matches!(
        err,
        punchmeter::Error::Core(punchmeter::core::Error::MisalignedBuffer { len: 3, channels: 2 })
    ));
    assert!(engine
        .process_interleaved(&vec![0.0; (TEST_BUFFER_SIZE + 1) * 2])
        .is_err());
}

/// A consumer thread polling the bridge only ever sees consistent values.
#[test]
fn test_consumer_thread_reads_bridge() {
    let mut engine = test_engine();
    let bridge: Arc<ResultBridge> = engine.bridge();

    let reader = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..20_000 {
            let snapshot = bridge.read();
            assert!(snapshot.peak_db <= 0.0);
            assert!(snapshot.lra_lu >= 0.0);
            if seen.last() != Some(&snapshot.status) {
                seen.push(snapshot.status);
            }
        }
        seen
    });

    feed(&mut engine, &generate_sine(1000.0, 0.5, frames(15.0)));
    let seen = reader.join().unwrap();

    assert!(!seen.contains(&MonitorState::Bypassed));
    let snapshot = engine.snapshot();
    assert!((snapshot.lra_lu - engine.loudness_range() as f32).abs() < PUBLISH_EPSILON);
    assert_eq!(snapshot.status, engine.status());
}
