//! Error types for the transcode pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::MetadataError;
use crate::noise::NoiseModelError;

/// Top-level pipeline error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input folder contains no recognized track files. Reported
    /// before any external process is spawned.
    #[error("no track files found in {}, nothing to encode", folder.display())]
    NoInput { folder: PathBuf },

    /// A stage process could not be started.
    #[error("failed to start {tool}: {source}")]
    SpawnFailed {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    /// A stage process exited non-zero.
    #[error("{tool} exited with code {exit_code}")]
    StageFailed { tool: &'static str, exit_code: i32 },

    /// A spawned stage did not expose the stream we need to wire.
    #[error("could not capture {stream} of {tool}")]
    StreamUnavailable {
        tool: &'static str,
        stream: &'static str,
    },

    /// Metadata collection failed before the pipeline was built.
    #[error(transparent)]
    Metadata(MetadataError),

    /// The noise model for voice isolation could not be resolved.
    #[error("noise model unavailable: {0}")]
    NoiseModel(#[from] NoiseModelError),

    /// Waiting on a stage process failed.
    #[error("I/O error while supervising {tool}: {source}")]
    Supervise {
        tool: &'static str,
        #[source]
        source: io::Error,
    },
}

impl From<MetadataError> for PipelineError {
    fn from(err: MetadataError) -> Self {
        // Surface the empty-folder case under its own taxonomy entry.
        match err {
            MetadataError::NoTracks { folder } => PipelineError::NoInput { folder },
            other => PipelineError::Metadata(other),
        }
    }
}

/// Type alias for pipeline operation results.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_folder_maps_to_no_input() {
        let err: PipelineError = MetadataError::NoTracks {
            folder: PathBuf::from("/books/Empty"),
        }
        .into();
        assert!(matches!(err, PipelineError::NoInput { .. }));
    }
}
