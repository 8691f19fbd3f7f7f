//! Encode configuration.

mod options;

pub use options::{EncodeOptions, DEFAULT_BITRATE_KBPS, SPEED_FLOOR_PERCENT};
