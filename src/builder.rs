//! Builder for configuring and constructing a `PunchEngine`.

use crate::engine::EngineControls;
use crate::{PunchEngine, Result};
use punchmeter_core::{
    DynamicsMonitor, LoudnessMeter, MeterConfig, MonitorConfig, DEFAULT_PRESET_INDEX,
};

/// Configuration is validated in [`build`](Self::build). Without
/// [`format`](Self::format) the engine must be prepared before use.
///
/// # Example
///
/// ```
/// use punchmeter::prelude::*;
///
/// let engine = PunchEngine::builder()
///     .format(44100.0, 2, 1024)
///     .preset(2)
///     .monitor_config(MonitorConfig {
///         measuring_window_seconds: 6.0,
///         ..MonitorConfig::default()
///     })
///     .build()?;
///
/// assert_eq!(engine.preset().label, "Classical");
/// # Ok::<(), punchmeter::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PunchEngineBuilder {
    meter_config: MeterConfig,
    monitor_config: MonitorConfig,
    preset_index: usize,
    bypassed: bool,
    format: Option<(f64, usize, usize)>,
}

impl Default for PunchEngineBuilder {
    fn default() -> Self {
        Self {
            meter_config: MeterConfig::default(),
            monitor_config: MonitorConfig::default(),
            preset_index: DEFAULT_PRESET_INDEX,
            bypassed: false,
            format: None,
        }
    }
}

impl PunchEngineBuilder {
    pub fn meter_config(mut self, config: MeterConfig) -> Self {
        self.meter_config = config;
        self
    }

    pub fn monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    /// Default: 1 (Pop/Rock)
    pub fn preset(mut self, index: usize) -> Self {
        self.preset_index = index;
        self
    }

    /// Default: false
    pub fn bypassed(mut self, bypassed: bool) -> Self {
        self.bypassed = bypassed;
        self
    }

    /// Prepares the engine during `build`.
    pub fn format(mut self, sample_rate: f64, channels: usize, max_block_size: usize) -> Self {
        self.format = Some((sample_rate, channels, max_block_size));
        self
    }

    pub fn build(self) -> Result<PunchEngine> {
        let meter = LoudnessMeter::with_config(self.meter_config)?;
        let monitor = DynamicsMonitor::new(self.monitor_config)?;
        let controls = EngineControls::new(self.preset_index, self.bypassed);

        let mut engine = PunchEngine::from_parts(meter, monitor, controls);
        if let Some((sample_rate, channels, max_block_size)) = self.format {
            engine.prepare(sample_rate, channels, max_block_size)?;
        }
        Ok(engine)
    }
}
