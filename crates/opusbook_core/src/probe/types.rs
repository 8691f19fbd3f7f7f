//! Probe types and error definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named timestamp inside one track's embedded metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMarker {
    /// Marker display name.
    pub name: String,
    /// Position in seconds, relative to the start of the owning track.
    pub time_secs: f64,
}

impl ChapterMarker {
    /// Create a marker.
    pub fn new(name: impl Into<String>, time_secs: f64) -> Self {
        Self {
            name: name.into(),
            time_secs,
        }
    }
}

/// Descriptive tag fields carried by every track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Title,
    Artist,
    Genre,
    Publisher,
    Comment,
    Album,
    Copyright,
}

impl TagField {
    /// The ffprobe `format.tags` key for this field.
    pub fn key(self) -> &'static str {
        match self {
            TagField::Title => "title",
            TagField::Artist => "artist",
            TagField::Genre => "genre",
            TagField::Publisher => "publisher",
            TagField::Comment => "comment",
            TagField::Album => "album",
            TagField::Copyright => "copyright",
        }
    }
}

/// Everything the prober extracts from one input audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Source file path.
    pub file: PathBuf,
    /// Track title tag.
    pub title: Option<String>,
    /// Artist tag.
    pub artist: Option<String>,
    /// Genre tag.
    pub genre: Option<String>,
    /// Publisher tag.
    pub publisher: Option<String>,
    /// Comment tag (usually the book description).
    pub comment: Option<String>,
    /// Album tag.
    pub album: Option<String>,
    /// Copyright tag.
    pub copyright: Option<String>,
    /// Position of this track within the book, 1-based.
    pub track: u32,
    /// Track duration in seconds.
    pub duration_secs: f64,
    /// Embedded chapter markers, in file order.
    pub chapters: Vec<ChapterMarker>,
}

impl TrackRecord {
    /// Look up a descriptive tag by field.
    pub fn tag(&self, field: TagField) -> Option<&str> {
        let value = match field {
            TagField::Title => &self.title,
            TagField::Artist => &self.artist,
            TagField::Genre => &self.genre,
            TagField::Publisher => &self.publisher,
            TagField::Comment => &self.comment,
            TagField::Album => &self.album,
            TagField::Copyright => &self.copyright,
        };
        value.as_deref()
    }
}

/// Error types for track probing.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probe tool could not be started.
    #[error("failed to run ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    /// The probe tool exited non-zero.
    #[error("ffprobe failed with exit code {exit_code} for {}", file.display())]
    ToolFailed { file: PathBuf, exit_code: i32 },

    /// The probe tool produced output we cannot use.
    #[error("unusable ffprobe output for {}: {message}", file.display())]
    MalformedOutput { file: PathBuf, message: String },

    /// The embedded media markers payload is not valid XML.
    #[error("invalid media markers XML: {0}")]
    MarkerXml(String),

    /// No track tag and the title carries no "Part N" suffix.
    #[error("no track information for {}", file.display())]
    MissingTrack { file: PathBuf },

    /// No track tag and no title to derive one from.
    #[error("no title for {}, cannot determine track", file.display())]
    NoTitle { file: PathBuf },

    /// The probe output was not valid JSON.
    #[error("invalid ffprobe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for probe operation results.
pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_lookup_matches_fields() {
        let record = TrackRecord {
            file: PathBuf::from("a.mp3"),
            title: Some("Title".into()),
            artist: None,
            genre: Some("Audiobook".into()),
            publisher: None,
            comment: None,
            album: None,
            copyright: None,
            track: 1,
            duration_secs: 10.0,
            chapters: Vec::new(),
        };
        assert_eq!(record.tag(TagField::Title), Some("Title"));
        assert_eq!(record.tag(TagField::Genre), Some("Audiobook"));
        assert_eq!(record.tag(TagField::Artist), None);
    }

    #[test]
    fn tag_field_keys_are_lowercase() {
        for field in [
            TagField::Title,
            TagField::Artist,
            TagField::Genre,
            TagField::Publisher,
            TagField::Comment,
            TagField::Album,
            TagField::Copyright,
        ] {
            assert_eq!(field.key(), field.key().to_lowercase());
        }
    }
}
