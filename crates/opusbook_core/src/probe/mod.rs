//! Per-track metadata probing.
//!
//! One [`TrackRecord`] is produced per input file by shelling out to
//! ffprobe and parsing its JSON output, including the embedded OverDrive
//! chapter markers.

mod ffprobe;
mod markers;
mod types;

pub use ffprobe::probe_file;
pub use markers::{parse_media_markers, EMPTY_MARKERS};
pub use types::{ChapterMarker, ProbeError, ProbeResult, TagField, TrackRecord};
