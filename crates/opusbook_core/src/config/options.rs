//! Options for one encode invocation.
//!
//! Every field has a serde default so partial configs deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Default Opus bitrate in kbps. Low, but plenty for mono speech.
pub const DEFAULT_BITRATE_KBPS: u32 = 15;

/// Lowest accepted speed adjustment in percent. Values below this would
/// collapse the speed factor towards zero and are coerced up.
pub const SPEED_FLOOR_PERCENT: i32 = -99;

/// Options controlling a single folder -> opus encode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Opus bitrate in kbps.
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,

    /// Keep subchapter markers instead of filtering them out.
    #[serde(default)]
    pub subchapters: bool,

    /// Tempo adjustment in signed percent (50 = 1.5x speed).
    #[serde(default)]
    pub speed_percent: i32,

    /// Dynamic normalization target as a percent of max volume, or None
    /// to skip normalization entirely.
    #[serde(default)]
    pub normalize: Option<i32>,

    /// Apply the rnnoise voice isolation filter.
    #[serde(default)]
    pub isolate_voice: bool,

    /// Free-form ffmpeg audio filter appended to the end of the graph.
    #[serde(default)]
    pub custom_filter: Option<String>,

    /// Report encoding progress while the pipeline runs.
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_bitrate() -> u32 {
    DEFAULT_BITRATE_KBPS
}

fn default_true() -> bool {
    true
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            bitrate_kbps: default_bitrate(),
            subchapters: false,
            speed_percent: 0,
            normalize: None,
            isolate_voice: false,
            custom_filter: None,
            progress: true,
        }
    }
}

impl EncodeOptions {
    /// Speed percent with the floor applied.
    pub fn clamped_speed(&self) -> i32 {
        if self.speed_percent < SPEED_FLOOR_PERCENT {
            tracing::warn!(
                "invalid speed {}%, truncating to {}%",
                self.speed_percent,
                SPEED_FLOOR_PERCENT
            );
            SPEED_FLOOR_PERCENT
        } else {
            self.speed_percent
        }
    }

    /// Multiplicative tempo factor applied to both the audio stream and
    /// the chapter timestamps. Always positive thanks to the speed floor.
    pub fn speed_factor(&self) -> f64 {
        1.0 + self.clamped_speed() as f64 / 100.0
    }

    /// Normalization peak for dynaudnorm, clamped to the 0..=100 percent
    /// range and mapped to the filter's 0.0..=1.0 parameter.
    pub fn normalize_peak(&self) -> Option<f64> {
        self.normalize.map(|n| n.clamp(0, 100) as f64 / 100.0)
    }
}
