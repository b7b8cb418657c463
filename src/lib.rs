//! # Punchmeter - Real-time Dynamics Monitor
//!
//! Reports whether programme dynamics are preserved, reduced or lost, from
//! momentary loudness, short-term loudness and loudness range (EBU R128 /
//! ITU-R BS.1770).
//!
//! ## Architecture
//!
//! - **punchmeter-core** - K-weighting, loudness windows, LRA, the monitor
//!   state machine and lock-free primitives
//! - **punchmeter** - [`PunchEngine`]: drives the core from an audio callback
//!   and publishes `{peak, lra, status}` through a [`ResultBridge`]
//!
//! ## Quick Start
//!
//! ```
//! use punchmeter::prelude::*;
//! use std::thread;
//!
//! let mut engine = PunchEngine::builder()
//!     .format(48000.0, 2, 512)
//!     .preset(0)
//!     .build()?;
//!
//! // UI thread
//! let bridge = engine.bridge();
//! let ui = thread::spawn(move || bridge.read().status.message());
//!
//! // Audio thread
//! engine.process_interleaved(&[0.0; 1024])?;
//!
//! assert!(!ui.join().unwrap().is_empty());
//! # Ok::<(), punchmeter::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serialization` (default) - serde derives on configs, presets and snapshots

/// Re-export of punchmeter-core for direct access
pub use punchmeter_core as core;

pub use punchmeter_core::{
    // Presets
    find_preset,
    preset_or_default,
    DynamicsPreset,
    DEFAULT_PRESET_INDEX,
    PRESETS,

    // Configuration
    MeterConfig,
    MonitorConfig,

    // Metering
    LoudnessMeter,
    ResultBridge,
    ResultSnapshot,
    PEAK_FLOOR_DB,
    SILENCE_LUFS,

    // Monitor
    MonitorState,
};

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::PunchEngineBuilder;
pub use engine::{EngineControls, PunchEngine};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{EngineControls, PunchEngine, PunchEngineBuilder};

    pub use crate::{MeterConfig, MonitorConfig};

    pub use crate::{MonitorState, ResultBridge, ResultSnapshot};

    pub use crate::{find_preset, DynamicsPreset, PRESETS};
}
