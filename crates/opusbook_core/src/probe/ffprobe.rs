//! Track probing using ffprobe.
//!
//! Runs `ffprobe -print_format json -show_format` on one input file and
//! turns the result into a typed [`TrackRecord`].

use std::path::Path;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::markers::{parse_media_markers, EMPTY_MARKERS};
use super::types::{ProbeError, ProbeResult, TagField, TrackRecord};

/// Tag holding the embedded chapter marker payload.
const MEDIA_MARKERS_KEY: &str = "OverDrive MediaMarkers";

/// Fallback pattern for deriving a track number from the title,
/// e.g. "My Book - Part 3".
static TITLE_PART_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-\s*Part\s*(\d+)").expect("valid regex"));

/// Probe a single audio file.
///
/// Fails if ffprobe cannot be run or its output is unusable, or if the
/// file cannot be ordered (no track tag and no derivable title suffix).
pub fn probe_file(path: &Path) -> ProbeResult<TrackRecord> {
    tracing::debug!("probing {}", path.display());

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .map_err(ProbeError::Spawn)?;

    if !output.status.success() {
        return Err(ProbeError::ToolFailed {
            file: path.to_path_buf(),
            exit_code: output.status.code().unwrap_or(-1),
        });
    }

    let json: Value = serde_json::from_slice(&output.stdout)?;
    parse_format_json(&json, path)
}

/// Parse the JSON output from ffprobe -show_format.
fn parse_format_json(json: &Value, path: &Path) -> ProbeResult<TrackRecord> {
    let format = json
        .get("format")
        .ok_or_else(|| malformed(path, "missing format section"))?;

    let duration_secs = format
        .get("duration")
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| malformed(path, "missing or invalid duration"))?;

    let empty = Value::Null;
    let tags = format.get("tags").unwrap_or(&empty);

    // Free-text tags tend to be full of XML/HTML entities.
    let title = tag_text(tags, TagField::Title.key());
    let artist = tag_text(tags, TagField::Artist.key());
    let genre = tag_text(tags, TagField::Genre.key());
    let publisher = tag_text(tags, TagField::Publisher.key());
    let comment = tag_text(tags, TagField::Comment.key());
    let album = tag_text(tags, TagField::Album.key());
    let copyright = tag_text(tags, TagField::Copyright.key());

    let track = resolve_track(tags, title.as_deref(), path)?;

    let markers_xml = tags
        .get(MEDIA_MARKERS_KEY)
        .and_then(|v| v.as_str())
        .unwrap_or(EMPTY_MARKERS);
    let chapters = parse_media_markers(markers_xml)?;

    Ok(TrackRecord {
        file: path.to_path_buf(),
        title,
        artist,
        genre,
        publisher,
        comment,
        album,
        copyright,
        track,
        duration_secs,
        chapters,
    })
}

/// Resolve the track number: explicit integer tag first, then the
/// "- Part N" title suffix.
fn resolve_track(tags: &Value, title: Option<&str>, path: &Path) -> ProbeResult<u32> {
    if let Some(track) = tags
        .get("track")
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim().parse::<u32>().ok())
    {
        return Ok(track);
    }

    tracing::debug!(
        "no track tag for {}, guessing from title {:?}",
        path.display(),
        title
    );

    let title = title.ok_or_else(|| ProbeError::NoTitle {
        file: path.to_path_buf(),
    })?;

    TITLE_PART_RX
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| {
            tracing::error!("could not determine track information for {}", path.display());
            ProbeError::MissingTrack {
                file: path.to_path_buf(),
            }
        })
}

/// Read a string tag and decode any HTML/XML entities in it.
fn tag_text(tags: &Value, key: &str) -> Option<String> {
    tags.get(key)
        .and_then(|v| v.as_str())
        .map(|s| html_escape::decode_html_entities(s).into_owned())
}

fn malformed(path: &Path, message: &str) -> ProbeError {
    ProbeError::MalformedOutput {
        file: path.to_path_buf(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> &'static Path {
        Path::new("/books/My Book/My Book - Part 3.mp3")
    }

    #[test]
    fn parses_tags_duration_and_markers() {
        let json = json!({
            "format": {
                "duration": "600.25",
                "tags": {
                    "title": "My Book - Part 3",
                    "artist": "Some Narrator",
                    "album": "My Book",
                    "track": "3",
                    "comment": "Tom &amp; Jerry &lt;abridged&gt;",
                    "OverDrive MediaMarkers":
                        "<metadata><Marker><Name>Chapter 9</Name><Time>0:00.000</Time></Marker></metadata>"
                }
            }
        });

        let record = parse_format_json(&json, path()).unwrap();
        assert_eq!(record.track, 3);
        assert!((record.duration_secs - 600.25).abs() < 1e-9);
        assert_eq!(record.comment.as_deref(), Some("Tom & Jerry <abridged>"));
        assert_eq!(record.chapters.len(), 1);
        assert_eq!(record.chapters[0].name, "Chapter 9");
    }

    #[test]
    fn derives_track_from_title_part_suffix() {
        let json = json!({
            "format": {
                "duration": "10.0",
                "tags": { "title": "My Book - Part 3" }
            }
        });
        let record = parse_format_json(&json, path()).unwrap();
        assert_eq!(record.track, 3);
    }

    #[test]
    fn slashed_track_tag_falls_back_to_title() {
        // "3/12" style tags are not plain integers; the title wins.
        let json = json!({
            "format": {
                "duration": "10.0",
                "tags": { "track": "4/12", "title": "My Book - part 7" }
            }
        });
        let record = parse_format_json(&json, path()).unwrap();
        assert_eq!(record.track, 7);
    }

    #[test]
    fn missing_title_and_track_is_no_title_error() {
        let json = json!({
            "format": { "duration": "10.0", "tags": {} }
        });
        let result = parse_format_json(&json, path());
        assert!(matches!(result, Err(ProbeError::NoTitle { .. })));
    }

    #[test]
    fn unmatchable_title_is_missing_track_error() {
        let json = json!({
            "format": {
                "duration": "10.0",
                "tags": { "title": "My Book, complete" }
            }
        });
        let result = parse_format_json(&json, path());
        assert!(matches!(result, Err(ProbeError::MissingTrack { .. })));
    }

    #[test]
    fn missing_duration_is_malformed_output() {
        let json = json!({
            "format": { "tags": { "title": "X - Part 1" } }
        });
        let result = parse_format_json(&json, path());
        assert!(matches!(result, Err(ProbeError::MalformedOutput { .. })));
    }

    #[test]
    fn absent_markers_tag_means_no_chapters() {
        let json = json!({
            "format": {
                "duration": "10.0",
                "tags": { "title": "X - Part 1" }
            }
        });
        let record = parse_format_json(&json, path()).unwrap();
        assert!(record.chapters.is_empty());
    }
}
