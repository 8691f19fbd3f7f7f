//! opusbook core - turn an OverDrive audiobook folder into a single Opus file.
//!
//! This crate contains all business logic with zero UI dependencies:
//! probing the per-chapter tracks, rebuilding the global chapter timeline,
//! resolving folder-level tags, and supervising the ffmpeg -> opusenc
//! transcode pipeline with live progress reporting.

pub mod config;
pub mod logging;
pub mod metadata;
pub mod noise;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod timecode;
pub mod timeline;

pub use config::EncodeOptions;
pub use metadata::FolderMetadata;
pub use pipeline::{encode, PipelineError};
pub use progress::{NullProgress, ProgressSink};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
