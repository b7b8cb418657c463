//! Lock-free hand-off of meter results to a consumer thread.

use super::peak::PEAK_FLOOR_DB;
use crate::lockfree::AtomicFloat;
use crate::monitor::MonitorState;
use std::sync::atomic::{AtomicU8, Ordering};

/// Latest published results.
///
/// Written by the audio thread once per block, read from any thread. Each
/// field is an independent atomic: a reader may observe fields from two
/// adjacent publications, never a torn value.
#[derive(Debug)]
pub struct ResultBridge {
    peak_db: AtomicFloat,
    lra_lu: AtomicFloat,
    status: AtomicU8,
}

impl Default for ResultBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBridge {
    pub fn new() -> Self {
        Self {
            peak_db: AtomicFloat::new(PEAK_FLOOR_DB),
            lra_lu: AtomicFloat::new(0.0),
            status: AtomicU8::new(MonitorState::AwaitingAudio as u8),
        }
    }

    #[inline]
    pub fn publish(&self, peak_db: f32, lra_lu: f32, status: MonitorState) {
        self.peak_db.set(peak_db);
        self.lra_lu.set(lra_lu);
        self.set_status(status);
    }

    /// Updates only the status, leaving peak and LRA frozen.
    #[inline]
    pub fn set_status(&self, status: MonitorState) {
        self.status.store(status as u8, Ordering::Relaxed);
    }

    #[inline]
    pub fn read(&self) -> ResultSnapshot {
        ResultSnapshot {
            peak_db: self.peak_db(),
            lra_lu: self.lra_lu(),
            status: self.status(),
        }
    }

    #[inline]
    pub fn peak_db(&self) -> f32 {
        self.peak_db.get()
    }

    #[inline]
    pub fn lra_lu(&self) -> f32 {
        self.lra_lu.get()
    }

    #[inline]
    pub fn status(&self) -> MonitorState {
        MonitorState::from_u8(self.status.load(Ordering::Relaxed))
    }
}

/// Copy of the bridge contents at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultSnapshot {
    pub peak_db: f32,
    pub lra_lu: f32,
    pub status: MonitorState,
}

impl Default for ResultSnapshot {
    fn default() -> Self {
        Self {
            peak_db: PEAK_FLOOR_DB,
            lra_lu: 0.0,
            status: MonitorState::AwaitingAudio,
        }
    }
}
