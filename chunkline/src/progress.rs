// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The pluggable, bit-exact progress-line formatter.

use std::io::Write;

use chunkline_domain::ChunkResult;

/// Formats and writes one progress line per completed chunk.
///
/// Implementations are called from the queue's single aggregation thread,
/// so no internal synchronisation is required; `log_sink`/`error_log_sink`
/// are handed in already locked.
pub trait ResultLogger: Send + Sync {
    fn log(
        &self,
        total_chunks: usize,
        completed: usize,
        result: &ChunkResult,
        log_sink: &mut dyn Write,
        error_log_sink: &mut dyn Write,
    );
}

/// The built-in formatter, matching the format this library has always
/// used: `[%*d/%d] %s%.2f %% done. lines: %d\n` on success, `[%*d/%d]
/// <error>\n` on failure, with the id field zero-padded with spaces to the
/// decimal width of `total_chunks`.
pub struct DefaultResultLogger;

impl ResultLogger for DefaultResultLogger {
    fn log(
        &self,
        total_chunks: usize,
        completed: usize,
        result: &ChunkResult,
        log_sink: &mut dyn Write,
        error_log_sink: &mut dyn Write,
    ) {
        let id_width = total_chunks.to_string().len();

        match &result.error {
            None => {
                let percent = completed as f64 / total_chunks as f64 * 100.0;
                let padding = if percent < 10.0 {
                    "  "
                } else if percent < 100.0 {
                    " "
                } else {
                    ""
                };
                let _ = writeln!(
                    log_sink,
                    "[{:>width$}/{total_chunks}] {padding}{percent:.2} % done. lines: {}",
                    result.chunk_id,
                    result.lines,
                    width = id_width,
                );
            }
            Some(error) => {
                let _ = writeln!(
                    error_log_sink,
                    "[{:>width$}/{total_chunks}] {error}",
                    result.chunk_id,
                    width = id_width,
                );
            }
        }
    }
}

/// Returns the built-in [`ResultLogger`] boxed for use in
/// [`crate::QueueOptions`].
pub fn default_result_logger() -> Box<dyn ResultLogger> {
    Box::new(DefaultResultLogger)
}
