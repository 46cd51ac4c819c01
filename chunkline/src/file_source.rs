// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A trivial file-backed [`ChunkSource`], plus a convenience that stats a
//! file and produces a ready-to-run chunk plan in one call.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chunkline_domain::{plan_chunks, Chunk, ChunkSink, ChunkSource};

/// Opens chunks of a single file on disk.
///
/// `handle_id` returns the file's path rendered lossily, so non-UTF-8 paths
/// never panic; what matters for handle reuse is that the string is stable
/// across calls for the same path, not that it is a faithful display of it.
pub struct FileChunkSource {
    path: PathBuf,
}

impl FileChunkSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChunkSource for FileChunkSource {
    fn open(&self) -> std::io::Result<Box<dyn chunkline_domain::source::ReadSeek>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }

    fn handle_id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Stats `path`, plans chunks of `chunk_size` bytes over its length with
/// every chunk carrying the returned source and `sink`, and returns both the
/// plan and the source ready to hand to [`crate::Queue`].
///
/// This is the one place in this crate that performs I/O before a queue
/// starts running; [`chunkline_domain::plan_chunks`] itself stays a pure
/// function of a length, a chunk size, a source, and a sink.
pub fn plan_file(
    path: impl AsRef<Path>,
    chunk_size: u64,
    sink: Option<Arc<dyn ChunkSink>>,
) -> std::io::Result<(Vec<Chunk>, Arc<FileChunkSource>)> {
    let path = path.as_ref();
    let len = std::fs::metadata(path)?.len();
    let source = Arc::new(FileChunkSource::new(path));
    let chunks = plan_chunks(len, chunk_size, source.clone() as Arc<dyn ChunkSource>, sink)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    Ok((chunks, source))
}
