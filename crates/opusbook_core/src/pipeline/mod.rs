//! Transcode pipeline orchestration.
//!
//! Builds the ffmpeg filter graph and both stage command lines from the
//! aggregated folder metadata, then spawns and supervises the two chained
//! processes.

mod command;
mod errors;
mod filter_graph;
mod runner;

pub use command::{build_pipeline_spec, PipelineSpec, DECODER_BIN, ENCODER_BIN};
pub use errors::{PipelineError, PipelineResult};
pub use filter_graph::build_filter_graph;
pub use runner::run_pipeline;

use std::path::{Path, PathBuf};

use crate::config::EncodeOptions;
use crate::metadata::FolderMetadata;
use crate::noise::NoiseModelSource;
use crate::progress::{NullProgress, ProgressSink};
use crate::timecode::format_clock;

/// Encode one audiobook folder into a single Opus file.
///
/// This is the core's externally observable operation: it probes and
/// aggregates the folder, constructs the processing graph, runs the two
/// stage processes and reports progress to `sink` while they run.
///
/// When `output` is `None` the file is written next to the folder as
/// `<folder>.opus`. Returns the output path on success.
pub fn encode(
    folder: &Path,
    output: Option<&Path>,
    options: &EncodeOptions,
    noise: &dyn NoiseModelSource,
    sink: &dyn ProgressSink,
) -> PipelineResult<PathBuf> {
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            tracing::warn!("guessing output filename");
            folder.with_extension("opus")
        }
    };

    tracing::info!("encoding from {} to {}", folder.display(), output.display());

    let metadata = FolderMetadata::collect(folder, options)?;
    let spec = build_pipeline_spec(&metadata, &output, options, noise)?;

    tracing::info!(
        "{} files ({})",
        metadata.files.len(),
        format_clock(metadata.duration_secs, 3)
    );

    // The progress total lives on the output stream's timeline, the same
    // scaling applied to the chapter timestamps.
    let total_secs = metadata.duration_secs / options.speed_factor();

    let sink: &dyn ProgressSink = if options.progress { sink } else { &NullProgress };
    sink.begin(&metadata.title, total_secs);
    let result = run_pipeline(&spec, sink);
    sink.finish();
    result?;

    Ok(output)
}
