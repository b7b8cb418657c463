//! Real-time loudness metering and dynamics monitoring.
//!
//! # Primary API
//!
//! - [`LoudnessMeter`]: K-weighted momentary, short-term and LRA metering
//! - [`DynamicsMonitor`]: LRA → `Ok | Reduced | Loss` verdict with bypass and silence handling
//! - [`ResultBridge`]: lock-free publication of `{peak, lra, status}`
//! - [`PRESETS`]: genre thresholds
//!
//! Everything on the audio path is allocation-free after `prepare`.
//!
//! # Example
//!
//! ```
//! use punchmeter_core::{
//!     block_peak, gain_to_db, preset_or_default, DynamicsMonitor, LoudnessMeter,
//!     MonitorConfig, MonitorInput, MonitorState, PEAK_FLOOR_DB,
//! };
//!
//! let mut meter = LoudnessMeter::new();
//! meter.prepare(48000.0, 1, 480)?;
//! let mut monitor = DynamicsMonitor::new(MonitorConfig::default())?;
//! monitor.prepare(48000.0);
//!
//! let block = vec![0.25f32; 480];
//! let peak = meter.process_interleaved(&block)?;
//! let state = monitor.update(
//!     MonitorInput {
//!         lra_lu: meter.loudness_range(),
//!         block_frames: 480,
//!         signal_present: gain_to_db(peak, PEAK_FLOOR_DB) > monitor.silence_threshold_db(),
//!         lra_updated: meter.take_lra_update(),
//!         bypassed: false,
//!     },
//!     preset_or_default(1),
//! );
//! assert_eq!(state, MonitorState::Measuring);
//! # Ok::<(), punchmeter_core::Error>(())
//! ```

pub mod config;
pub use config::{MeterConfig, MonitorConfig};

pub mod error;
pub use error::{Error, Result};

pub mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat, AtomicIndex};

pub mod metering;
pub use metering::{
    block_peak, gain_to_db, loudness_range, Biquad, GatingBlock, KWeighting, LoudnessHistory,
    LoudnessMeter, ResultBridge, ResultSnapshot, PEAK_FLOOR_DB, SILENCE_LUFS,
};

pub mod monitor;
pub use monitor::{
    evaluate, find_preset, preset_or_default, DynamicsMonitor, DynamicsPreset, MonitorInput,
    MonitorState, DEFAULT_PRESET_INDEX, PRESETS,
};
