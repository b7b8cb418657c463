//! # Live Monitor
//!
//! Simulates an audio callback on its own thread while the main thread polls
//! the result bridge like a UI would.
//!
//! The programme starts with wide dynamics (alternating loud and quiet
//! phrases), then turns into a flat, heavily limited section. Watch the
//! status move from Measuring to a verdict and degrade once the range
//! collapses. Halfway through, the host bypasses the monitor for a moment.
//!
//! **Concepts:** PunchEngine, ResultBridge, EngineControls, presets
//!
//! ```bash
//! RUST_LOG=punchmeter=debug cargo run --example live_monitor
//! ```

use punchmeter::prelude::*;
use std::f64::consts::PI;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK: usize = 512;
/// Simulated seconds of audio per wall-clock second.
const SPEED: f64 = 8.0;
const PROGRAMME_SECONDS: f64 = 60.0;

fn programme_sample(n: usize) -> f32 {
    let t = n as f64 / SAMPLE_RATE;
    let tone = (2.0 * PI * 220.0 * t).sin() + 0.5 * (2.0 * PI * 660.0 * t).sin();
    let gain = if t < 30.0 {
        // 2 s phrases alternating between -6 dB and -24 dB
        if (t / 2.0) as usize % 2 == 0 {
            0.5
        } else {
            0.06
        }
    } else {
        0.4
    };
    (tone * gain / 1.5) as f32
}

fn main() -> punchmeter::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (preset_index, preset) = find_preset("pop_rock").unwrap_or((1, &PRESETS[1]));
    let mut engine = PunchEngine::builder()
        .format(SAMPLE_RATE, 2, BLOCK)
        .preset(preset_index)
        .monitor_config(MonitorConfig {
            measuring_window_seconds: 6.0,
            ..MonitorConfig::default()
        })
        .build()?;

    let bridge = engine.bridge();
    let controls = engine.controls();

    println!(
        "Preset: {} (red < {} LU, amber < {} LU, target {:?})",
        preset.label,
        preset.lra_threshold_red,
        preset.lra_threshold_amber,
        preset.target_range()
    );

    let total_blocks = (PROGRAMME_SECONDS * SAMPLE_RATE) as usize / BLOCK;
    let block_period = Duration::from_secs_f64(BLOCK as f64 / SAMPLE_RATE / SPEED);

    let audio = thread::spawn(move || -> punchmeter::Result<()> {
        let mut buffer = vec![0.0f32; BLOCK * 2];
        for block in 0..total_blocks {
            for (frame, out) in buffer.chunks_exact_mut(2).enumerate() {
                let s = programme_sample(block * BLOCK + frame);
                out[0] = s;
                out[1] = s;
            }
            engine.process_interleaved(&buffer)?;
            thread::sleep(block_period);
        }
        Ok(())
    });

    let poll = Duration::from_millis(250);
    let mut elapsed = Duration::ZERO;
    while !audio.is_finished() {
        let snapshot = bridge.read();
        let audio_seconds = elapsed.as_secs_f64() * SPEED;
        println!(
            "[{:5.1}s] peak {:7.1} dBFS  LRA {:5.2} LU  {}",
            audio_seconds, snapshot.peak_db, snapshot.lra_lu, snapshot.status
        );

        // Host bypasses the plug-in for two seconds of audio mid-programme.
        if (20.0..22.0).contains(&audio_seconds) {
            controls.set_bypassed(true);
        } else if controls.is_bypassed() {
            controls.set_bypassed(false);
        }

        thread::sleep(poll);
        elapsed += poll;
    }

    match audio.join() {
        Ok(result) => result?,
        Err(_) => eprintln!("audio thread panicked"),
    }

    let last = bridge.read();
    println!("Final: {} (LRA {:.2} LU)", last.status, last.lra_lu);
    Ok(())
}
