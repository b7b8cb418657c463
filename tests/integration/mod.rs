//! Integration test modules for punchmeter
//!
//! - engine: lifecycle, controls, bypass, reset, presets
//! - metering: loudness and LRA readings
//! - monitor: state sequences over long signals

pub mod engine;
pub mod monitor;
