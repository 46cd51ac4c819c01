// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Outcomes produced by processing a single chunk, and their aggregation
//! across a whole run.

use crate::error::ChunkError;

/// The outcome of one worker processing one [`crate::Chunk`].
#[derive(Debug)]
pub struct ChunkResult {
    pub chunk_id: u64,
    /// Byte position of the first complete line this worker was
    /// responsible for (i.e. past any partial leading line skipped because
    /// it belongs to the previous chunk).
    pub real_offset: u64,
    /// Bytes actually consumed by this worker, including any forward
    /// overflow read.
    pub real_size: u64,
    /// Number of complete lines this worker emitted to the processor.
    pub lines: u64,
    /// Whether this worker's primary read hit end of source.
    pub eof: bool,
    /// Present iff processing this chunk failed. Other fields are
    /// best-effort when this is set.
    pub error: Option<ChunkError>,
}

impl ChunkResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The aggregate result of running a whole [`crate::Chunk`] plan through a
/// queue.
#[derive(Debug, Default)]
pub struct QueueResult {
    pub results: Vec<ChunkResult>,
    pub lines: u64,
    pub failed_chunks: u64,
}

impl QueueResult {
    /// Folds one [`ChunkResult`] into the running totals and stores it.
    pub fn record(&mut self, result: ChunkResult) {
        if result.is_success() {
            self.lines += result.lines;
        } else {
            self.failed_chunks += 1;
        }
        self.results.push(result);
    }
}
