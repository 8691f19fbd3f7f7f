//! Source folder scanning.

use std::io;
use std::path::{Path, PathBuf};

/// Extension of the per-chapter audio tracks OverDrive distributes.
pub const TRACK_EXT: &str = "mp3";

/// Extension of cover art candidates.
pub const IMAGE_EXT: &str = "jpg";

/// List regular files in `dir` with the given extension, case-insensitive.
///
/// The result is sorted by path so enumeration order is deterministic.
pub fn list_files_with_ext(dir: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Pick the cover image: the largest jpg in the folder by file size.
///
/// File size is a proxy for resolution; OverDrive folders ship a large
/// cover next to small thumbnails. Returns `None` when there are no
/// candidates.
pub fn largest_image(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut best: Option<(u64, PathBuf)> = None;

    for path in list_files_with_ext(dir, IMAGE_EXT)? {
        let size = std::fs::metadata(&path)?.len();
        if best.as_ref().map_or(true, |(best_size, _)| size > *best_size) {
            best = Some((size, path));
        }
    }

    Ok(best.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_only_matching_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a.MP3"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = list_files_with_ext(dir.path(), TRACK_EXT).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.MP3", "b.mp3"]);
    }

    #[test]
    fn largest_image_wins_by_file_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("thumb.jpg"), vec![0u8; 100]).unwrap();
        fs::write(dir.path().join("cover.jpg"), vec![0u8; 5000]).unwrap();
        fs::write(dir.path().join("mid.jpg"), vec![0u8; 1000]).unwrap();

        let image = largest_image(dir.path()).unwrap().unwrap();
        assert_eq!(image.file_name().unwrap(), "cover.jpg");
    }

    #[test]
    fn no_images_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        assert!(largest_image(dir.path()).unwrap().is_none());
    }
}
