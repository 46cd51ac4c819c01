// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The error taxonomy shared by the planner, the worker, the queue, and the
//! ordered writer. Every variant that occurs in the context of a chunk
//! carries that chunk's id so a caller correlating a [`crate::ChunkResult`]
//! with logs does not need to re-derive it.

use std::fmt;
use std::io;

use thiserror::Error;

/// A boxed, thread-safe error returned by user-supplied collaborators
/// (a [`crate::LineProcessor`] or a [`crate::ChunkSink`]).
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// The phase of line processing a [`ChunkError::Processor`] failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingPhase {
    /// A complete line found entirely within the primary buffer.
    Line,
    /// The final, possibly straddling, line of the chunk.
    TrailingLine,
}

impl fmt::Display for ProcessingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingPhase::Line => write!(f, "line"),
            ProcessingPhase::TrailingLine => write!(f, "trailing line"),
        }
    }
}

/// Everything that can go wrong planning, reading, processing, or writing a
/// chunk.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// A non-EOF chunk with a non-zero offset had no newline anywhere in its
    /// primary read window. The configured chunk size is too small relative
    /// to the line length for the straddling-line protocol to make
    /// progress.
    #[error("chunk {chunk_id}: no linebreak found in primary buffer")]
    NoLinebreakInChunk { chunk_id: u64 },

    /// Opening the source handle failed.
    #[error("chunk {chunk_id}: failed to open source handle")]
    SourceOpen {
        chunk_id: u64,
        #[source]
        source: io::Error,
    },

    /// Seeking the source handle to the chunk's offset failed.
    #[error("chunk {chunk_id}: failed to seek source handle")]
    SourceSeek {
        chunk_id: u64,
        #[source]
        source: io::Error,
    },

    /// Reading from the source handle failed (primary read or overflow
    /// scan).
    #[error("chunk {chunk_id}: failed to read from source")]
    SourceRead {
        chunk_id: u64,
        #[source]
        source: io::Error,
    },

    /// The user's [`crate::LineProcessor`] returned an error.
    #[error("chunk {chunk_id}: processor failed on {phase}")]
    Processor {
        chunk_id: u64,
        phase: ProcessingPhase,
        #[source]
        source: BoxedError,
    },

    /// The [`crate::ChunkSink`] returned an error while writing this
    /// chunk's output.
    #[error("chunk {chunk_id}: sink write failed")]
    Sink {
        chunk_id: u64,
        #[source]
        source: BoxedError,
    },

    /// A chunk reached line processing with no processor configured. This
    /// only happens when a queue is deliberately constructed without one,
    /// which is only useful for exercising planning or I/O failure paths
    /// upstream of processing.
    #[error("chunk {chunk_id}: no line processor configured")]
    MissingProcessor { chunk_id: u64 },

    /// [`crate::chunk::plan_chunks`] was asked to plan over a chunk size of
    /// zero, which cannot terminate.
    #[error("invalid chunk size: must be greater than zero")]
    InvalidChunkSize,

    /// A queue was constructed with an empty chunk plan, so there is no
    /// chunk size to size worker buffers from.
    #[error("empty chunk plan: at least one chunk is required")]
    EmptyPlan,
}

impl ChunkError {
    /// The chunk id this error occurred on, where the error carries one.
    pub fn chunk_id(&self) -> Option<u64> {
        match self {
            ChunkError::NoLinebreakInChunk { chunk_id }
            | ChunkError::SourceOpen { chunk_id, .. }
            | ChunkError::SourceSeek { chunk_id, .. }
            | ChunkError::SourceRead { chunk_id, .. }
            | ChunkError::Processor { chunk_id, .. }
            | ChunkError::Sink { chunk_id, .. }
            | ChunkError::MissingProcessor { chunk_id } => Some(*chunk_id),
            ChunkError::InvalidChunkSize | ChunkError::EmptyPlan => None,
        }
    }
}
