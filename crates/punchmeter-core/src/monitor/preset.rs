//! Genre presets: LRA thresholds for the dynamics verdict.

/// LRA thresholds and target band for one genre.
///
/// Invariant: `lra_threshold_red < lra_threshold_amber`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DynamicsPreset {
    /// Stable identifier for host parameters and lookups.
    pub id: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Below this LRA (LU) dynamics are considered lost.
    pub lra_threshold_red: f64,
    /// Below this LRA (LU) dynamics are considered reduced.
    pub lra_threshold_amber: f64,
    pub target_lra_min: f64,
    pub target_lra_max: f64,
}

impl DynamicsPreset {
    /// Target LRA band in LU as `(min, max)`.
    pub fn target_range(&self) -> (f64, f64) {
        (self.target_lra_min, self.target_lra_max)
    }

    /// Whether `lra` falls inside the inclusive target band.
    pub fn is_within_target(&self, lra: f64) -> bool {
        (self.target_lra_min..=self.target_lra_max).contains(&lra)
    }
}

/// Built-in presets, indexed by host preset selection.
pub static PRESETS: [DynamicsPreset; 3] = [
    DynamicsPreset {
        id: "edm",
        label: "EDM/Club",
        lra_threshold_red: 3.0,
        lra_threshold_amber: 3.6,
        target_lra_min: 3.0,
        target_lra_max: 8.0,
    },
    DynamicsPreset {
        id: "pop_rock",
        label: "Pop/Rock",
        lra_threshold_red: 4.0,
        lra_threshold_amber: 4.8,
        target_lra_min: 4.0,
        target_lra_max: 9.0,
    },
    DynamicsPreset {
        id: "classical",
        label: "Classical",
        lra_threshold_red: 6.0,
        lra_threshold_amber: 7.2,
        target_lra_min: 6.0,
        target_lra_max: 22.0,
    },
];

/// Pop/Rock.
pub const DEFAULT_PRESET_INDEX: usize = 1;

/// Preset at `index`, or the default preset when out of range.
pub fn preset_or_default(index: usize) -> &'static DynamicsPreset {
    PRESETS
        .get(index)
        .unwrap_or(&PRESETS[DEFAULT_PRESET_INDEX])
}

/// Looks up a preset and its index by id.
pub fn find_preset(id: &str) -> Option<(usize, &'static DynamicsPreset)> {
    PRESETS.iter().enumerate().find(|(_, p)| p.id == id)
}
