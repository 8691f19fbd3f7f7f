//! Subchapter suppression heuristics.
//!
//! OverDrive releases often splinter real chapters into spurious
//! sub-markers: indented names, names with a trailing "(12:34)" timestamp
//! token, or plain repeats of the previous chapter name. When subchapters
//! are excluded these are dropped from the merged sequence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::probe::ChapterMarker;

/// Trailing parenthesized timestamp token, e.g. "Chapter 3 (12:34)".
static TIMESTAMP_SUFFIX_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\([0-9:]+\)\s*$").expect("valid regex"));

/// Drop subchapter markers from a merged sequence.
///
/// A marker is suppressed when its name starts with whitespace, ends with
/// a parenthesized timestamp token, or equals the name of the last *kept*
/// marker (so consecutive duplicates collapse to the first occurrence).
pub fn filter_subchapters(markers: Vec<ChapterMarker>) -> Vec<ChapterMarker> {
    let mut kept: Vec<ChapterMarker> = Vec::with_capacity(markers.len());

    for marker in markers {
        if marker.name.chars().next().is_some_and(char::is_whitespace) {
            tracing::info!("ignoring subchapter {:?} due to indent", marker.name);
            continue;
        }
        if TIMESTAMP_SUFFIX_RX.is_match(&marker.name) {
            tracing::info!("ignoring subchapter {:?} due to timestamp", marker.name);
            continue;
        }
        if kept.last().is_some_and(|previous| previous.name == marker.name) {
            tracing::info!(
                "ignoring subchapter {:?} due to repeated chapter name",
                marker.name
            );
            continue;
        }
        kept.push(marker);
    }

    kept
}
