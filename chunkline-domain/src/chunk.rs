// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The unit of planned work: a byte range of a source, to be read,
//! line-processed, and (optionally) written by a worker.

use std::fmt;
use std::sync::Arc;

use crate::error::ChunkError;
use crate::sink::ChunkSink;
use crate::source::ChunkSource;

/// A planned, immutable byte range of one source, plus the source it reads
/// from and the sink (if any) its output is written to.
///
/// A `Chunk` is created once by [`plan_chunks`] and moved through the task
/// channel to exactly one worker; it is never mutated after planning.
/// Carrying `source` and `sink` per chunk rather than pinning one of each to
/// a whole run means a single plan can mix chunks drawn from more than one
/// source, or route different chunks to different sinks.
#[derive(Clone)]
pub struct Chunk {
    /// 1-based, dense, unique within a single plan. Defines processing
    /// order for the [`crate::ChunkSink`].
    pub id: u64,
    /// Inclusive byte offset into the source.
    pub offset: u64,
    /// Planned read length in bytes. The last chunk of a plan may read
    /// fewer bytes than this if the source ends first.
    pub size: u64,
    /// The source this chunk reads its bytes from.
    pub source: Arc<dyn ChunkSource>,
    /// The sink this chunk's processed output is written to, if any.
    pub sink: Option<Arc<dyn ChunkSink>>,
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .finish()
    }
}

impl Chunk {
    /// Returns a new chunk. Planning is the only place `Chunk` values are
    /// constructed; this is `pub(crate)` so callers cannot fabricate chunks
    /// with offsets inconsistent with a real plan.
    pub(crate) fn new(
        id: u64,
        offset: u64,
        size: u64,
        source: Arc<dyn ChunkSource>,
        sink: Option<Arc<dyn ChunkSink>>,
    ) -> Self {
        Self { id, offset, size, source, sink }
    }
}

/// Partitions a source of length `source_len` into an ordered sequence of
/// chunks of `chunk_size` bytes each, covering `[0, source_len]`, each
/// carrying `source` and `sink`.
///
/// Chunk offsets are `0, chunk_size, 2*chunk_size, …`. The last chunk covers
/// whatever remains and may be shorter than `chunk_size`. If `source_len` is
/// an exact multiple of `chunk_size`, an additional zero-length chunk is
/// planned at offset `source_len`; the worker treats this as immediate EOF
/// and reports zero lines, rather than the planner special-casing it away.
///
/// # Errors
///
/// Returns [`ChunkError::InvalidChunkSize`] if `chunk_size` is zero; the
/// loop below cannot terminate otherwise.
pub fn plan_chunks(
    source_len: u64,
    chunk_size: u64,
    source: Arc<dyn ChunkSource>,
    sink: Option<Arc<dyn ChunkSink>>,
) -> Result<Vec<Chunk>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    let mut chunks = Vec::new();
    let mut offset = 0u64;
    let mut id = 1u64;

    while offset <= source_len {
        chunks.push(Chunk::new(id, offset, chunk_size, source.clone(), sink.clone()));
        offset += chunk_size;
        id += 1;
    }

    Ok(chunks)
}
