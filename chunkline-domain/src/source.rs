// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The abstraction a worker reads a chunk's bytes through.

use std::io::{Read, Seek};

/// A handle a worker can seek and read from. Any combination of
/// [`std::io::Read`] and [`std::io::Seek`] qualifies: most commonly an open
/// file, but a worker never assumes it is one.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Opens handles onto one underlying byte stream.
///
/// A worker may hold at most one open handle per source at a time and
/// reuses it across consecutive chunks whose [`ChunkSource::handle_id`]
/// compares equal, reopening only when the id changes. Implementations do
/// not need to be internally thread-safe: the engine opens one handle per
/// worker thread, never sharing a single handle across threads.
pub trait ChunkSource: Send + Sync {
    /// Opens a fresh handle onto this source, positioned at its start.
    fn open(&self) -> std::io::Result<Box<dyn ReadSeek>>;

    /// A stable identity string used as the handle-reuse cache key. Two
    /// `ChunkSource` values that should share a cached handle across chunks
    /// must return equal strings; values that should force a reopen must
    /// not.
    fn handle_id(&self) -> String;
}
