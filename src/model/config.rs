use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Tuning for the swipe-to-reveal gesture. Distances are in pixels,
/// velocities in pixels per millisecond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Width of the revealed action area (fully open offset is `-reveal_width`)
    pub reveal_width: f64,
    /// Drag distance past which a release snaps open
    pub open_threshold: f64,
    /// Release speed that counts as a flick
    pub velocity_threshold: f64,
    /// Movement below this on both axes does not lock an axis
    pub dead_zone: f64,
    /// Over-travel (as a multiple of `reveal_width`) that commits a delete
    pub commit_ratio: f64,
    /// Flick speed that commits a delete once past `reveal_width`
    pub commit_velocity: f64,
    /// Damping applied to drag beyond `reveal_width`
    pub rubber_band: f64,
    /// Duration of the snap animation
    pub settle_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        SwipeConfig {
            reveal_width: 80.0,
            open_threshold: 40.0,
            velocity_threshold: 0.4,
            dead_zone: 10.0,
            commit_ratio: 1.2,
            commit_velocity: 0.8,
            rubber_band: 0.3,
            settle_ms: 350,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last keystroke before a slot is saved
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig { debounce_ms: 500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Pixels per terminal column when translating mouse drags into gestures
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f64,
    /// Hex color overrides keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            cell_width_px: default_cell_width(),
            colors: HashMap::new(),
        }
    }
}

fn default_cell_width() -> f64 {
    8.0
}
