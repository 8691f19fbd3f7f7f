//! Process supervision for the two-stage pipeline.
//!
//! The decode stage's stdout feeds the encode stage's stdin directly; no
//! buffering happens in this process. While both run, one scoped thread
//! drains the decode stderr for progress. The encoder (the pipe consumer)
//! is waited on first: waiting on the producer first could deadlock with
//! the producer blocked writing into a full pipe.

use std::process::{Command, Stdio};

use crate::pipeline::command::{PipelineSpec, DECODER_BIN, ENCODER_BIN};
use crate::pipeline::errors::{PipelineError, PipelineResult};
use crate::progress::{self, ProgressSink};

/// Spawn both stages and supervise them to completion.
///
/// `sink` receives progress parsed from the decoder's status lines. There
/// is no cancellation path once the processes are spawned; failures of
/// either stage are fatal and name the failing tool.
pub fn run_pipeline(spec: &PipelineSpec, sink: &dyn ProgressSink) -> PipelineResult<()> {
    let mut decoder = Command::new(DECODER_BIN)
        .args(&spec.decoder_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| PipelineError::SpawnFailed {
            tool: DECODER_BIN,
            source,
        })?;

    let decoder_stdout =
        decoder
            .stdout
            .take()
            .ok_or(PipelineError::StreamUnavailable {
                tool: DECODER_BIN,
                stream: "stdout",
            })?;
    let decoder_stderr =
        decoder
            .stderr
            .take()
            .ok_or(PipelineError::StreamUnavailable {
                tool: DECODER_BIN,
                stream: "stderr",
            })?;

    let mut encoder = match Command::new(ENCODER_BIN)
        .args(&spec.encoder_args)
        .stdin(Stdio::from(decoder_stdout))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            // Don't leave the decoder running against a pipe nobody reads.
            let _ = decoder.kill();
            let _ = decoder.wait();
            return Err(PipelineError::SpawnFailed {
                tool: ENCODER_BIN,
                source,
            });
        }
    };

    let (encoder_status, decoder_status) = std::thread::scope(|scope| {
        // The monitor exits on stream EOF, which happens once the decoder
        // is gone, so joining after the waits below cannot hang.
        let monitor = scope.spawn(|| progress::monitor(decoder_stderr, sink));

        let encoder_status = encoder.wait().map_err(|source| PipelineError::Supervise {
            tool: ENCODER_BIN,
            source,
        });
        let decoder_status = decoder.wait().map_err(|source| PipelineError::Supervise {
            tool: DECODER_BIN,
            source,
        });

        if monitor.join().is_err() {
            tracing::warn!("progress monitor thread panicked");
        }

        (encoder_status, decoder_status)
    });

    let encoder_status = encoder_status?;
    let decoder_status = decoder_status?;

    if !encoder_status.success() {
        return Err(PipelineError::StageFailed {
            tool: ENCODER_BIN,
            exit_code: encoder_status.code().unwrap_or(-1),
        });
    }
    if !decoder_status.success() {
        return Err(PipelineError::StageFailed {
            tool: DECODER_BIN,
            exit_code: decoder_status.code().unwrap_or(-1),
        });
    }

    Ok(())
}
