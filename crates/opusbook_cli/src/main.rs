//! opusbook command line interface.
//!
//! Thin shell over `opusbook_core`: argument parsing, tracing bootstrap
//! and a terminal progress bar.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use opusbook_core::noise::CachedNoiseModel;
use opusbook_core::{encode, logging, EncodeOptions, ProgressSink};

/// Convert an OverDrive audiobook folder into an Opus file with cover
/// art and chapter information.
#[derive(Parser, Debug)]
#[command(name = "opusbook", version)]
struct Cli {
    /// Input folder containing the per-chapter mp3 files
    folder: PathBuf,

    /// Output opus file (defaults to <folder>.opus)
    output: Option<PathBuf>,

    /// Opus bitrate in kbps
    #[arg(long, default_value_t = 15)]
    bitrate: u32,

    /// Include subchapter markers instead of filtering them out
    #[arg(long)]
    subchapters: bool,

    /// Do not display the encoding progress bar
    #[arg(long)]
    no_progress: bool,

    /// Speed audio up or down (signed percent); chapters are adjusted
    /// accordingly
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    speed: i32,

    /// Percent of max volume for dynamic normalization
    #[arg(long)]
    normalize: Option<i32>,

    /// Apply a filter that isolates voice from background noise
    #[arg(long)]
    isolate_voice: bool,

    /// Extra ffmpeg audio filter, appended to the end of the filter
    /// graph. Don't use unless you know what you are doing
    #[arg(long = "filter")]
    custom_filter: Option<String>,

    /// Increase output verbosity
    #[arg(short, long)]
    verbose: bool,
}

/// Progress bar driven by the core's sink callbacks.
///
/// Positions are tracked in f64 seconds and rendered in milliseconds so
/// fractional deltas are not lost to rounding.
struct BarProgress {
    bar: ProgressBar,
    elapsed_secs: Mutex<f64>,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            elapsed_secs: Mutex::new(0.0),
        }
    }
}

impl ProgressSink for BarProgress {
    fn begin(&self, label: &str, total_secs: f64) {
        self.bar.set_length((total_secs * 1000.0) as u64);
        self.bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {percent:>3}% ({eta})")
                .expect("valid template")
                .progress_chars("=> "),
        );
        self.bar.set_message(label.to_string());
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn advance(&self, delta_secs: f64) {
        let mut elapsed = self.elapsed_secs.lock().expect("progress lock");
        *elapsed += delta_secs;
        self.bar.set_position((*elapsed * 1000.0) as u64);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(if cli.verbose { "debug" } else { "warn" });
    tracing::debug!("args = {:?}", cli);

    let options = EncodeOptions {
        bitrate_kbps: cli.bitrate,
        subchapters: cli.subchapters,
        speed_percent: cli.speed,
        normalize: cli.normalize,
        isolate_voice: cli.isolate_voice,
        custom_filter: cli.custom_filter.clone(),
        progress: !cli.no_progress,
    };

    let noise = CachedNoiseModel::new();
    let sink = BarProgress::new();

    let output = encode(
        &cli.folder,
        cli.output.as_deref(),
        &options,
        &noise,
        &sink,
    )
    .with_context(|| format!("encoding {} failed", cli.folder.display()))?;

    eprintln!("wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_mirror_core_defaults() {
        let cli = Cli::parse_from(["opusbook", "/books/My Book"]);
        assert_eq!(cli.bitrate, 15);
        assert_eq!(cli.speed, 0);
        assert!(!cli.subchapters);
        assert!(!cli.no_progress);
        assert!(cli.output.is_none());
    }

    #[test]
    fn negative_speed_is_accepted() {
        let cli = Cli::parse_from(["opusbook", "--speed", "-20", "/books/My Book"]);
        assert_eq!(cli.speed, -20);
    }
}
