// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The abstraction a worker writes a chunk's transformed output through.

use crate::chunk::Chunk;
use crate::error::BoxedError;

/// Accepts one chunk's worth of transformed bytes at a time.
///
/// A `ChunkSink` may be called concurrently by multiple workers and must
/// serialize internally; the engine makes no ordering guarantee among calls
/// beyond what a particular sink implementation (such as
/// `chunkline::OrderedWriter`) chooses to provide.
pub trait ChunkSink: Send + Sync {
    /// Writes `bytes`, the fully-assembled output of `chunk`. Called at most
    /// once per chunk, and only when that chunk produced non-empty output.
    fn write(&self, chunk: &Chunk, bytes: &[u8]) -> Result<(), BoxedError>;
}
