//! Live encoding progress.
//!
//! ffmpeg reports status on stderr by rewriting one line terminated with a
//! carriage return. The monitor reads that stream treating `\r` as a line
//! separator, extracts the `time=` cursor from each status line, and
//! forwards strictly increasing deltas to a [`ProgressSink`].

use std::io::{BufRead, BufReader, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::timecode::parse_clock;

/// Elapsed-time token in an ffmpeg status line, e.g. `time=00:01:02.50`.
static TIME_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"time\s*=\s*(\S+)").expect("valid regex"));

/// Receiver for progress events, implemented by the caller (a progress
/// bar in the CLI, a no-op in tests and headless runs).
pub trait ProgressSink: Send + Sync {
    /// Called once before any advance, with the display label and the
    /// expected total in output-stream seconds.
    fn begin(&self, label: &str, total_secs: f64);

    /// Called with a positive elapsed delta in seconds.
    fn advance(&self, delta_secs: f64);

    /// Called once when the pipeline is done with the stream.
    fn finish(&self);
}

/// Sink that discards everything.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _label: &str, _total_secs: f64) {}
    fn advance(&self, _delta_secs: f64) {}
    fn finish(&self) {}
}

/// Extract the elapsed-time cursor from one status line.
pub fn parse_time_cursor(line: &str) -> Option<f64> {
    let caps = TIME_RX.captures(line)?;
    parse_clock(caps.get(1)?.as_str())
}

/// Consume a diagnostic stream until it closes, reporting progress.
///
/// A monotonic guard discards any cursor that is not strictly greater
/// than the last reported value, so out-of-order or malformed lines never
/// move the bar backwards. Returns when the stream reaches EOF; the
/// stream closes when the producing process exits, so this never blocks
/// pipeline shutdown.
pub fn monitor<R: Read>(stream: R, sink: &dyn ProgressSink) {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    let mut last_secs = 0.0_f64;

    loop {
        line.clear();
        match read_status_line(&mut reader, &mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("progress stream read failed: {e}");
                break;
            }
        }

        let text = String::from_utf8_lossy(&line);
        if let Some(secs) = parse_time_cursor(&text) {
            let delta = secs - last_secs;
            if delta > 0.0 {
                last_secs = secs;
                sink.advance(delta);
            }
        }
    }
}

/// Read one status line, treating both `\r` and `\n` as terminators.
///
/// Returns the number of bytes consumed; 0 means EOF.
fn read_status_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> std::io::Result<usize> {
    let mut consumed = 0;

    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(consumed);
        }

        match available.iter().position(|&b| b == b'\r' || b == b'\n') {
            Some(i) => {
                line.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                consumed += i + 1;
                return Ok(consumed);
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                reader.consume(len);
                consumed += len;
            }
        }
    }
}
