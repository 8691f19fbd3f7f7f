//! Folder-level metadata aggregation.
//!
//! Scans the source folder, probes every track, reconstructs the global
//! chapter timeline and resolves the descriptive fields carried into the
//! output file's tags.

mod folder;
mod resolver;

pub use folder::{largest_image, list_files_with_ext, IMAGE_EXT, TRACK_EXT};
pub use resolver::{resolve_field, resolve_title, ALBUM_SUFFIX, UNKNOWN};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::EncodeOptions;
use crate::probe::{probe_file, ProbeError, TagField, TrackRecord};
use crate::timeline::{aggregate, Chapter};

/// Error types for folder metadata collection.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The folder contains no recognized track files.
    #[error("no {TRACK_EXT} files found in {}", folder.display())]
    NoTracks { folder: PathBuf },

    /// A track could not be probed or ordered.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Folder scanning failed.
    #[error("failed to scan folder: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for metadata operation results.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Aggregate metadata for one audiobook folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderMetadata {
    /// Book title.
    pub title: String,
    /// Album tag written to the output (`"<title> - Overdrive"`).
    pub album: String,
    /// Author / narrator field.
    pub artist: String,
    /// Genre field.
    pub genre: String,
    /// Description text.
    pub comment: String,
    /// Publisher field.
    pub publisher: String,
    /// Copyright field.
    pub copyright: String,
    /// Cover image, when the folder has one.
    pub image: Option<PathBuf>,
    /// Track records sorted by track number.
    pub files: Vec<TrackRecord>,
    /// Final chapter list: globally offset, filtered, renumbered and
    /// time-scaled.
    pub chapters: Vec<Chapter>,
    /// Total source duration in seconds (sum of track durations).
    pub duration_secs: f64,
}

impl FolderMetadata {
    /// Probe every track in `folder` and build the aggregate.
    ///
    /// Fails with [`MetadataError::NoTracks`] before invoking any external
    /// tool when the folder holds no track files.
    pub fn collect(folder: &Path, options: &EncodeOptions) -> MetadataResult<Self> {
        let track_files = list_files_with_ext(folder, TRACK_EXT)?;
        if track_files.is_empty() {
            return Err(MetadataError::NoTracks {
                folder: folder.to_path_buf(),
            });
        }

        let image = largest_image(folder)?;

        let mut files = track_files
            .iter()
            .map(|f| probe_file(f))
            .collect::<Result<Vec<TrackRecord>, _>>()?;

        let (chapters, duration_secs) = aggregate(
            &mut files,
            options.subchapters,
            options.speed_factor(),
        );

        let metadata = Self::from_parts(files, chapters, duration_secs, image);
        tracing::debug!("folder metadata for {}: {:?}", folder.display(), metadata);
        Ok(metadata)
    }

    /// Assemble the aggregate from already-sorted tracks and the final
    /// chapter list. Split out from [`collect`](Self::collect) so the
    /// resolution logic is testable without ffprobe.
    pub fn from_parts(
        files: Vec<TrackRecord>,
        chapters: Vec<Chapter>,
        duration_secs: f64,
        image: Option<PathBuf>,
    ) -> Self {
        let title = resolve_title(&files);
        let album = format!("{title}{ALBUM_SUFFIX}");

        Self {
            album,
            artist: resolve_field(&files, TagField::Artist),
            genre: resolve_field(&files, TagField::Genre),
            comment: resolve_field(&files, TagField::Comment),
            publisher: resolve_field(&files, TagField::Publisher),
            copyright: resolve_field(&files, TagField::Copyright),
            title,
            image,
            files,
            chapters,
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ChapterMarker;

    fn track(number: u32, title: &str, album: Option<&str>) -> TrackRecord {
        TrackRecord {
            file: PathBuf::from(format!("part{number}.mp3")),
            title: Some(title.to_string()),
            artist: Some("Author".to_string()),
            genre: None,
            publisher: None,
            comment: None,
            album: album.map(String::from),
            copyright: None,
            track: number,
            duration_secs: 600.0,
            chapters: vec![ChapterMarker::new("Chapter", 0.0)],
        }
    }

    #[test]
    fn empty_folder_is_rejected_before_probing() {
        let dir = tempfile::tempdir().unwrap();
        let result = FolderMetadata::collect(dir.path(), &EncodeOptions::default());
        assert!(matches!(result, Err(MetadataError::NoTracks { .. })));
    }

    #[test]
    fn album_gets_the_overdrive_suffix() {
        let files = vec![track(1, "My Book - Part 1", Some("My Book"))];
        let meta = FolderMetadata::from_parts(files, Vec::new(), 600.0, None);
        assert_eq!(meta.title, "My Book");
        assert_eq!(meta.album, "My Book - Overdrive");
        assert_eq!(meta.artist, "Author");
        assert_eq!(meta.genre, UNKNOWN);
    }

    #[test]
    fn title_is_guessed_when_album_is_missing() {
        let files = vec![track(1, "My Book - Part 1", None)];
        let meta = FolderMetadata::from_parts(files, Vec::new(), 600.0, None);
        assert_eq!(meta.title, "My Book");
        assert_eq!(meta.album, "My Book - Overdrive");
    }
}
