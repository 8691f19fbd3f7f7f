//! ffmpeg filter-graph construction.
//!
//! The graph is assembled in a fixed order: concat of every input, then
//! optional voice isolation, dynamic normalization, tempo adjustment, and
//! finally any user-supplied filter expression.

use std::path::Path;

use crate::config::EncodeOptions;

/// dynaudnorm frame length in ms. Together with the Gaussian window size
/// below this keeps the widest acceptable dynamic range instead of
/// aggressively leveling the narration.
const NORMALIZE_FRAME_LEN: u32 = 8000;

/// dynaudnorm Gaussian window size in frames (must be odd).
const NORMALIZE_GAUSS_SIZE: u32 = 301;

/// Build the complete `-filter_complex` expression.
///
/// `noise_model` is the resolved rnnoise model path, present only when
/// voice isolation was requested. The atempo stage uses the exact same
/// speed factor applied to the chapter timestamps; the two must never
/// diverge or chapters drift from the audio.
pub fn build_filter_graph(
    input_count: usize,
    options: &EncodeOptions,
    noise_model: Option<&Path>,
) -> String {
    let mut graph = String::new();

    for i in 0..input_count {
        graph.push_str(&format!("[{i}:a]"));
    }
    graph.push_str(&format!("concat=n={input_count}:v=0:a=1"));

    if let Some(model) = noise_model {
        graph.push_str(&format!(",arnndn=m={}", model.display()));
    }

    if let Some(peak) = options.normalize_peak() {
        graph.push_str(&format!(
            ",dynaudnorm=peak={peak}:framelen={NORMALIZE_FRAME_LEN}:gausssize={NORMALIZE_GAUSS_SIZE}:correctdc=1"
        ));
    }

    if options.clamped_speed() != 0 {
        let factor = options.speed_factor();
        tracing::info!("adding speedup filter {factor}");
        graph.push_str(&format!(",atempo={factor:.6}"));
    }

    if let Some(custom) = options.custom_filter.as_deref() {
        tracing::info!("adding filter {custom:?}");
        graph.push(',');
        graph.push_str(custom);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn concat_stage_references_every_input() {
        let graph = build_filter_graph(3, &EncodeOptions::default(), None);
        assert_eq!(graph, "[0:a][1:a][2:a]concat=n=3:v=0:a=1");
    }

    #[test]
    fn optional_stages_appear_in_fixed_order() {
        let options = EncodeOptions {
            normalize: Some(95),
            speed_percent: 50,
            custom_filter: Some("highpass=f=100".to_string()),
            isolate_voice: true,
            ..Default::default()
        };
        let model = PathBuf::from("/cache/voice.rnnn");
        let graph = build_filter_graph(2, &options, Some(&model));
        assert_eq!(
            graph,
            "[0:a][1:a]concat=n=2:v=0:a=1\
             ,arnndn=m=/cache/voice.rnnn\
             ,dynaudnorm=peak=0.95:framelen=8000:gausssize=301:correctdc=1\
             ,atempo=1.500000\
             ,highpass=f=100"
        );
    }

    #[test]
    fn zero_speed_adds_no_atempo_stage() {
        let graph = build_filter_graph(1, &EncodeOptions::default(), None);
        assert!(!graph.contains("atempo"));
    }

    #[test]
    fn normalize_peak_is_clamped_before_emission() {
        let options = EncodeOptions {
            normalize: Some(150),
            ..Default::default()
        };
        let graph = build_filter_graph(1, &options, None);
        assert!(graph.contains("dynaudnorm=peak=1:"));
    }
}
