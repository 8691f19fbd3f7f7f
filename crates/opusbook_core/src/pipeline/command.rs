//! Decode and encode command-line construction.
//!
//! The two stages are plain argument lists over the external tools: ffmpeg
//! decodes, concatenates and filters the tracks into raw PCM on stdout;
//! opusenc consumes that stream and writes the tagged, chaptered output.

use std::ffi::OsString;
use std::path::Path;

use crate::config::EncodeOptions;
use crate::metadata::FolderMetadata;
use crate::noise::NoiseModelSource;
use crate::pipeline::errors::PipelineResult;
use crate::pipeline::filter_graph::build_filter_graph;

/// Decode/filter stage binary.
pub const DECODER_BIN: &str = "ffmpeg";

/// Encode stage binary.
pub const ENCODER_BIN: &str = "opusenc";

/// Opus frame size in ms, tuned for speech.
const OPUS_FRAME_SIZE_MS: &str = "60";

/// Encoder computational complexity (max quality).
const OPUS_COMPLEXITY: &str = "10";

/// The constructed processing graph for one encode invocation: the filter
/// expression plus the two ordered argument lists. Pure data, owned by the
/// orchestrator for the duration of one encode call.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    /// Composed -filter_complex expression.
    pub filter_graph: String,
    /// Arguments for the decode/filter process.
    pub decoder_args: Vec<OsString>,
    /// Arguments for the encode process.
    pub encoder_args: Vec<OsString>,
}

/// Build the full pipeline spec from aggregated folder metadata.
///
/// Resolves the noise model only when voice isolation is requested.
pub fn build_pipeline_spec(
    metadata: &FolderMetadata,
    output: &Path,
    options: &EncodeOptions,
    noise: &dyn NoiseModelSource,
) -> PipelineResult<PipelineSpec> {
    let noise_model = if options.isolate_voice {
        Some(noise.resolve()?)
    } else {
        None
    };

    let filter_graph =
        build_filter_graph(metadata.files.len(), options, noise_model.as_deref());
    let decoder_args = decoder_args(metadata, &filter_graph);
    let encoder_args = encoder_args(metadata, output, options);

    tracing::debug!("decoder args = {:?}", decoder_args);
    tracing::debug!("encoder args = {:?}", encoder_args);

    Ok(PipelineSpec {
        filter_graph,
        decoder_args,
        encoder_args,
    })
}

fn decoder_args(metadata: &FolderMetadata, filter_graph: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-loglevel",
        "quiet",
        "-hide_banner",
        "-stats",
        "-stats_period",
        "1",
    ]
    .iter()
    .map(OsString::from)
    .collect();

    for track in &metadata.files {
        tracing::debug!("appending input {}", track.file.display());
        args.push("-i".into());
        args.push(track.file.clone().into_os_string());
    }

    args.push("-filter_complex".into());
    args.push(filter_graph.into());

    // WAV-wrapped s16le PCM on stdout for the encoder.
    for arg in ["-f", "wav", "-acodec", "pcm_s16le", "-"] {
        args.push(arg.into());
    }

    args
}

fn encoder_args(
    metadata: &FolderMetadata,
    output: &Path,
    options: &EncodeOptions,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    for arg in [
        "--quiet",
        "--ignorelength",
        "--framesize",
        OPUS_FRAME_SIZE_MS,
        "--downmix-mono",
        "--comp",
        OPUS_COMPLEXITY,
        "--vbr",
        "--bitrate",
    ] {
        args.push(arg.into());
    }
    args.push(options.bitrate_kbps.to_string().into());
    // Override opusenc's content detection; this is always speech.
    args.push("--speech".into());

    for (flag, value) in [
        ("--title", &metadata.title),
        ("--artist", &metadata.artist),
        ("--album", &metadata.album),
        ("--genre", &metadata.genre),
    ] {
        args.push(flag.into());
        args.push(value.into());
    }

    for (key, value) in [
        ("description", &metadata.comment),
        ("publisher", &metadata.publisher),
        ("copyright", &metadata.copyright),
    ] {
        args.push("--comment".into());
        args.push(format!("{key}={value}").into());
    }

    // One time comment and one name comment per surviving chapter, in
    // that order, sharing the chapter's sequence number.
    for chapter in &metadata.chapters {
        args.push("--comment".into());
        args.push(chapter.time_comment().into());
        args.push("--comment".into());
        args.push(chapter.name_comment().into());
    }

    if let Some(image) = &metadata.image {
        args.push("--picture".into());
        args.push(image.clone().into_os_string());
    }

    args.push("-".into());
    args.push(output.to_path_buf().into_os_string());

    args
}
