// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The straddling-line read-and-process protocol.
//!
//! A worker owns a task receiver, a result sender, and a set of buffers that
//! are reused across every chunk it processes: opening a handle, reading,
//! and growing buffers only happens when the previous iteration's capacity
//! was not enough.

use std::io::SeekFrom;
use std::sync::Arc;

use chunkline_domain::error::ProcessingPhase;
use chunkline_domain::{Chunk, ChunkError, ChunkResult, LineMetadata, LineProcessor};
use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, warn};

/// Processes chunks pulled from a shared task channel until it is empty and
/// disconnected, sending one [`ChunkResult`] per chunk to the result
/// channel.
///
/// All buffers below persist across calls to [`Worker::run`]'s inner loop;
/// only their *contents* are reset between chunks, never their allocation.
/// Each chunk carries its own source and sink, so a single worker can serve
/// chunks drawn from more than one source or routed to more than one sink
/// over its lifetime.
pub struct Worker {
    tasks: Receiver<Chunk>,
    results: Sender<ChunkResult>,
    processor: Option<Arc<dyn LineProcessor>>,

    chunk_size: usize,
    overflow_scan_size: usize,

    handle: Option<Box<dyn chunkline_domain::source::ReadSeek>>,
    handle_id: Option<String>,

    primary_buffer: Vec<u8>,
    cursor: usize,
    overflow_buffer: Vec<u8>,
    overflow_head: usize,
    output_buffer: Vec<u8>,
    wrote_line: bool,
}

impl Worker {
    pub fn new(
        tasks: Receiver<Chunk>,
        results: Sender<ChunkResult>,
        processor: Option<Arc<dyn LineProcessor>>,
        chunk_size: usize,
        overflow_scan_size: usize,
    ) -> Self {
        Self {
            tasks,
            results,
            processor,
            chunk_size,
            overflow_scan_size,
            handle: None,
            handle_id: None,
            primary_buffer: vec![0u8; chunk_size],
            cursor: 0,
            overflow_buffer: vec![0u8; overflow_scan_size],
            overflow_head: 0,
            output_buffer: Vec::with_capacity(chunk_size),
            wrote_line: false,
        }
    }

    /// Consumes chunks until the task channel is drained and disconnected.
    pub fn run(mut self) {
        while let Ok(chunk) = self.tasks.recv() {
            let result = self.process(&chunk);
            // The result channel only disconnects once the queue has
            // stopped reading, which only happens after every worker has
            // returned; a send error here would mean we are already being
            // torn down, so there is nothing left to report to.
            let _ = self.results.send(result);
            self.reset_buffers();
        }
    }

    fn process(&mut self, chunk: &Chunk) -> ChunkResult {
        debug!(chunk_id = chunk.id, "reading");
        match self.process_inner(chunk) {
            Ok((real_offset, real_size, lines, eof)) => {
                debug!(chunk_id = chunk.id, lines, "completed");
                ChunkResult {
                    chunk_id: chunk.id,
                    real_offset,
                    real_size,
                    lines,
                    eof,
                    error: None,
                }
            }
            Err(error) => {
                warn!(chunk_id = chunk.id, %error, "failed");
                ChunkResult {
                    chunk_id: chunk.id,
                    real_offset: chunk.offset,
                    real_size: 0,
                    lines: 0,
                    eof: false,
                    error: Some(error),
                }
            }
        }
    }

    fn process_inner(&mut self, chunk: &Chunk) -> Result<(u64, u64, u64, bool), ChunkError> {
        self.prepare_handle(chunk)?;

        let (eof, bytes_read) = self.read_primary(chunk)?;
        if bytes_read == 0 {
            return Ok((chunk.offset, 0, 0, true));
        }

        let mut real_offset = chunk.offset;
        let mut real_size = bytes_read as u64;
        let mut skip_processing = false;

        if chunk.offset != 0 {
            match self.primary_buffer.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.cursor = i + 1;
                    real_offset = chunk.offset + i as u64;
                }
                None if eof => {
                    // The whole primary buffer is the tail of a line owned
                    // entirely by an earlier chunk; this chunk contributes
                    // no lines.
                    self.cursor = self.primary_buffer.len();
                    skip_processing = true;
                }
                None => return Err(ChunkError::NoLinebreakInChunk { chunk_id: chunk.id }),
            }
        }

        if eof {
            self.overflow_buffer.clear();
        } else {
            debug!(chunk_id = chunk.id, "processing");
            self.read_overflow(chunk.id)?;
            real_size += self.overflow_buffer.len() as u64;
        }

        let lines = if skip_processing {
            0
        } else {
            let processor = self
                .processor
                .clone()
                .ok_or(ChunkError::MissingProcessor { chunk_id: chunk.id })?;
            self.process_buff(chunk, processor.as_ref())?
        };

        debug!(chunk_id = chunk.id, "writing");
        self.write_output(chunk)?;

        Ok((real_offset, real_size, lines, eof))
    }

    fn prepare_handle(&mut self, chunk: &Chunk) -> Result<(), ChunkError> {
        let id = chunk.source.handle_id();
        if self.handle.is_none() || self.handle_id.as_deref() != Some(id.as_str()) {
            let handle = chunk
                .source
                .open()
                .map_err(|source| ChunkError::SourceOpen { chunk_id: chunk.id, source })?;
            self.handle = Some(handle);
            self.handle_id = Some(id);
        }

        let handle = self.handle.as_mut().expect("handle just prepared");
        handle
            .seek(SeekFrom::Start(chunk.offset))
            .map_err(|source| ChunkError::SourceSeek { chunk_id: chunk.id, source })?;
        Ok(())
    }

    /// Reads up to `chunk_size` bytes into the primary buffer, truncating it
    /// to whatever was actually read. Returns `(eof, bytes_read)`.
    fn read_primary(&mut self, chunk: &Chunk) -> Result<(bool, usize), ChunkError> {
        self.primary_buffer.clear();
        self.primary_buffer.resize(self.chunk_size, 0);

        let handle = self.handle.as_mut().expect("handle prepared before read");
        let n = handle
            .read(&mut self.primary_buffer[..])
            .map_err(|source| ChunkError::SourceRead { chunk_id: chunk.id, source })?;

        let eof = n < self.primary_buffer.len();
        self.primary_buffer.truncate(n);
        Ok((eof, n))
    }

    /// Reads forward past the primary range, growing the overflow buffer by
    /// doubling, until a newline terminating the straddling trailing line is
    /// found. A newline found at relative index zero of a scan window does
    /// not terminate the scan; only a later one does.
    ///
    /// Hitting EOF on the very first overflow read, before any bytes have
    /// been scanned, is not an error: the primary read landed exactly on the
    /// source's true end, and there is nothing left to append. Hitting EOF
    /// after the window has already grown without a newline in sight is a
    /// genuinely unterminated line and fails the chunk.
    fn read_overflow(&mut self, chunk_id: u64) -> Result<(), ChunkError> {
        self.overflow_head = 0;
        self.overflow_buffer.clear();
        self.overflow_buffer.resize(self.overflow_scan_size, 0);
        let mut window_end = self.overflow_buffer.len();

        loop {
            let handle = self.handle.as_mut().expect("handle prepared before read");
            let n = handle
                .read(&mut self.overflow_buffer[self.overflow_head..window_end])
                .map_err(|source| ChunkError::SourceRead { chunk_id, source })?;
            if n == 0 {
                if self.overflow_head == 0 {
                    self.overflow_buffer.truncate(0);
                    return Ok(());
                }
                return Err(ChunkError::SourceRead {
                    chunk_id,
                    source: std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "unexpected eof while scanning forward for a line break",
                    ),
                });
            }

            let scan = &self.overflow_buffer[self.overflow_head..self.overflow_head + n];
            if let Some(i) = scan.iter().position(|&b| b == b'\n') {
                if i > 0 {
                    self.overflow_head += i;
                    self.overflow_buffer.truncate(self.overflow_head);
                    break;
                }
            }

            self.overflow_head += n;
            if self.overflow_head == window_end {
                window_end *= 2;
                self.overflow_buffer.resize(window_end, 0);
            }
        }

        Ok(())
    }

    /// Walks the primary buffer from `self.cursor`, processing each complete
    /// line, and finally the straddling trailing line (primary tail +
    /// overflow). Returns the number of lines processed.
    ///
    /// A chunk whose last complete line ends exactly on the final byte of
    /// its primary buffer still owns the overflow scan taken past that
    /// point, and emits it as one more trailing line with an empty primary
    /// tail.
    fn process_buff(&mut self, chunk: &Chunk, processor: &dyn LineProcessor) -> Result<u64, ChunkError> {
        let mut lines = 0u64;
        let primary_len = self.primary_buffer.len();

        loop {
            let rel = self.primary_buffer[self.cursor..].iter().position(|&b| b == b'\n');
            match rel {
                None => {
                    self.process_trailing_line(chunk, processor, &mut lines)?;
                    break;
                }
                Some(rel) => {
                    self.process_line(chunk, processor, rel, &mut lines)?;
                    if self.cursor == primary_len {
                        if !self.overflow_buffer.is_empty() {
                            self.process_trailing_line(chunk, processor, &mut lines)?;
                        }
                        break;
                    }
                }
            }
        }

        Ok(lines)
    }

    fn process_line(
        &mut self,
        chunk: &Chunk,
        processor: &dyn LineProcessor,
        rel: usize,
        lines: &mut u64,
    ) -> Result<(), ChunkError> {
        let start = self.cursor;
        let out = {
            let line = &self.primary_buffer[start..start + rel];
            processor
                .process(line, LineMetadata { line: *lines + 1, chunk })
                .map_err(|source| ChunkError::Processor {
                    chunk_id: chunk.id,
                    phase: ProcessingPhase::Line,
                    source,
                })?
        };
        self.append_output(&out);
        self.cursor = start + rel + 1;
        *lines += 1;
        Ok(())
    }

    fn process_trailing_line(
        &mut self,
        chunk: &Chunk,
        processor: &dyn LineProcessor,
        lines: &mut u64,
    ) -> Result<(), ChunkError> {
        let mut line = self.primary_buffer[self.cursor..].to_vec();
        line.extend_from_slice(&self.overflow_buffer);

        // Both halves empty: the chunk's data ended cleanly on a newline,
        // not on a zero-length final line. Skip rather than fabricate one.
        if line.is_empty() {
            return Ok(());
        }

        let out = processor
            .process(&line, LineMetadata { line: *lines + 1, chunk })
            .map_err(|source| ChunkError::Processor {
                chunk_id: chunk.id,
                phase: ProcessingPhase::TrailingLine,
                source,
            })?;
        self.append_output(&out);
        *lines += 1;
        Ok(())
    }

    /// Appends one processed line's bytes to the output buffer, inserting a
    /// single `\n` before any line after the first.
    fn append_output(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.wrote_line {
            self.output_buffer.push(b'\n');
        }
        self.output_buffer.extend_from_slice(bytes);
        self.wrote_line = true;
    }

    fn write_output(&mut self, chunk: &Chunk) -> Result<(), ChunkError> {
        if !self.output_buffer.is_empty() {
            if let Some(sink) = &chunk.sink {
                sink.write(chunk, &self.output_buffer)
                    .map_err(|source| ChunkError::Sink { chunk_id: chunk.id, source })?;
            }
        }
        Ok(())
    }

    fn reset_buffers(&mut self) {
        self.primary_buffer.clear();
        self.primary_buffer.resize(self.chunk_size, 0);
        self.overflow_buffer.clear();
        self.overflow_buffer.resize(self.overflow_scan_size, 0);
        self.overflow_head = 0;
        self.output_buffer.clear();
        self.wrote_line = false;
        self.cursor = 0;
    }
}
