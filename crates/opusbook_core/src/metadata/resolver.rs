//! Folder-level field resolution.
//!
//! Descriptive fields are resolved from the ordered track records with a
//! first-non-empty-wins policy; the folder title falls back to a cleaned
//! track title when no album tag exists anywhere.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::probe::{TagField, TrackRecord};

/// Sentinel for fields no track carries.
pub const UNKNOWN: &str = "Unknown";

/// Suffix identifying the distribution source, appended to the album tag.
pub const ALBUM_SUFFIX: &str = " - Overdrive";

/// Trailing "- Part N" style suffix on track titles.
static PART_SUFFIX_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-?\s*Part\s*\d+\s*$").expect("valid regex"));

/// First non-empty value of `field` across tracks in sorted order,
/// or [`UNKNOWN`].
pub fn resolve_field(tracks: &[TrackRecord], field: TagField) -> String {
    tracks
        .iter()
        .find_map(|t| t.tag(field).filter(|v| !v.is_empty()))
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Resolve the folder title: the album tag when present, otherwise the
/// first track title with its "- Part N" suffix stripped.
pub fn resolve_title(tracks: &[TrackRecord]) -> String {
    let album = resolve_field(tracks, TagField::Album);
    if album != UNKNOWN {
        return album;
    }

    tracing::warn!("no album information, guessing title");
    let title = resolve_field(tracks, TagField::Title);
    let title = PART_SUFFIX_RX.replace(&title, "").into_owned();
    tracing::info!("title = {:?}", title);
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track(title: Option<&str>, album: Option<&str>, artist: Option<&str>) -> TrackRecord {
        TrackRecord {
            file: PathBuf::from("x.mp3"),
            title: title.map(String::from),
            artist: artist.map(String::from),
            genre: None,
            publisher: None,
            comment: None,
            album: album.map(String::from),
            copyright: None,
            track: 1,
            duration_secs: 1.0,
            chapters: Vec::new(),
        }
    }

    #[test]
    fn first_non_empty_value_wins() {
        let tracks = vec![
            track(None, None, None),
            track(None, None, Some("")),
            track(None, None, Some("Jane Doe")),
            track(None, None, Some("Someone Else")),
        ];
        assert_eq!(resolve_field(&tracks, TagField::Artist), "Jane Doe");
    }

    #[test]
    fn missing_everywhere_yields_sentinel() {
        let tracks = vec![track(None, None, None)];
        assert_eq!(resolve_field(&tracks, TagField::Genre), UNKNOWN);
    }

    #[test]
    fn album_tag_is_preferred_for_the_title() {
        let tracks = vec![track(Some("My Book - Part 1"), Some("My Book"), None)];
        assert_eq!(resolve_title(&tracks), "My Book");
    }

    #[test]
    fn title_fallback_strips_part_suffix() {
        let tracks = vec![track(Some("My Book - Part 1"), None, None)];
        assert_eq!(resolve_title(&tracks), "My Book");
    }

    #[test]
    fn part_suffix_stripping_is_case_insensitive_and_dash_optional() {
        let tracks = vec![track(Some("My Book part 12 "), None, None)];
        assert_eq!(resolve_title(&tracks), "My Book");
    }

    #[test]
    fn no_title_anywhere_keeps_sentinel() {
        let tracks = vec![track(None, None, None)];
        assert_eq!(resolve_title(&tracks), UNKNOWN);
    }
}
