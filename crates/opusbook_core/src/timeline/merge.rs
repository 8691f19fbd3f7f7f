//! Track ordering and timeline merge.

use crate::probe::{ChapterMarker, TrackRecord};

/// Stable sort tracks by track number ascending.
///
/// Ties keep their original enumeration order.
pub fn sort_tracks(tracks: &mut [TrackRecord]) {
    tracks.sort_by_key(|t| t.track);
}

/// Merge per-track markers onto the single concatenated-audio timeline.
///
/// Walks tracks in order, shifting each track's markers by the running
/// duration offset. Returns the merged marker list and the total duration.
pub fn merge_chapters(tracks: &[TrackRecord]) -> (Vec<ChapterMarker>, f64) {
    let mut merged = Vec::new();
    let mut offset_secs = 0.0_f64;

    for track in tracks {
        for marker in &track.chapters {
            merged.push(ChapterMarker::new(
                marker.name.clone(),
                marker.time_secs + offset_secs,
            ));
        }
        offset_secs += track.duration_secs;
    }

    (merged, offset_secs)
}
