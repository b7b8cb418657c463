//! Dynamics verdict: genre presets and the monitor state machine.

mod fsm;
mod preset;

pub use fsm::{evaluate, DynamicsMonitor, MonitorInput, MonitorState};
pub use preset::{find_preset, preset_or_default, DynamicsPreset, DEFAULT_PRESET_INDEX, PRESETS};
