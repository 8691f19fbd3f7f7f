//! Global chapter timeline reconstruction.
//!
//! Orders tracks, merges their embedded markers onto one concatenated
//! timeline, filters spurious subchapters, then renumbers and time-scales
//! the survivors. The scale factor must match the atempo filter applied to
//! the audio or chapters drift from the stream.

mod filter;
mod merge;
mod types;

pub use filter::filter_subchapters;
pub use merge::{merge_chapters, sort_tracks};
pub use types::Chapter;

use crate::probe::{ChapterMarker, TrackRecord};

/// Renumber surviving markers sequentially from 1 and scale their
/// timestamps by `1 / speed_factor`.
pub fn finalize_chapters(markers: Vec<ChapterMarker>, speed_factor: f64) -> Vec<Chapter> {
    markers
        .into_iter()
        .enumerate()
        .map(|(i, marker)| Chapter {
            number: (i + 1) as u32,
            name: marker.name,
            start_secs: marker.time_secs / speed_factor,
        })
        .collect()
}

/// Aggregate tracks into the final chapter list and total source duration.
///
/// The returned duration is the unscaled sum of track durations; chapter
/// timestamps are already scaled for the output stream.
pub fn aggregate(
    tracks: &mut [TrackRecord],
    include_subchapters: bool,
    speed_factor: f64,
) -> (Vec<Chapter>, f64) {
    sort_tracks(tracks);
    let (merged, total_secs) = merge_chapters(tracks);

    let kept = if include_subchapters {
        merged
    } else {
        filter_subchapters(merged)
    };

    (finalize_chapters(kept, speed_factor), total_secs)
}
