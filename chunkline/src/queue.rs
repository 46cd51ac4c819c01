// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Orchestrates a pool of [`Worker`] threads over a bounded task channel and
//! aggregates their results.

use std::io::{self, Write};
use std::sync::Arc;

use chunkline_domain::{Chunk, ChunkError, LineProcessor, QueueResult};
use crossbeam::channel;
use parking_lot::Mutex;

use crate::progress::{default_result_logger, ResultLogger};
use crate::worker::Worker;

/// Default forward-scan window, in bytes, used to locate a straddling
/// line's terminating newline past a chunk's primary range.
pub const DEFAULT_OVERFLOW_SCAN_SIZE: usize = 1024;

/// Tunable behaviour for a [`Queue`] run.
pub struct QueueOptions {
    pub result_logger: Box<dyn ResultLogger>,
    pub log_sink: Arc<Mutex<dyn Write + Send>>,
    pub error_log_sink: Arc<Mutex<dyn Write + Send>>,
    pub overflow_scan_size: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            result_logger: default_result_logger(),
            log_sink: Arc::new(Mutex::new(io::stdout())),
            error_log_sink: Arc::new(Mutex::new(io::stderr())),
            overflow_scan_size: DEFAULT_OVERFLOW_SCAN_SIZE,
        }
    }
}

/// Owns a [`Chunk`] plan, a worker pool, and the channels between them.
///
/// [`Queue::work`] spawns `worker_count` threads that share one task
/// channel (pre-filled and closed at construction, so workers never block
/// waiting for more work to arrive) and one result channel, reads results
/// as they arrive on the calling thread, logs and aggregates them, and
/// returns once every chunk has produced exactly one result.
///
/// Each [`Chunk`] in the plan carries its own source and sink, so a single
/// queue can mix chunks drawn from more than one source or route different
/// chunks to different sinks.
pub struct Queue {
    chunks: Vec<Chunk>,
    worker_count: usize,
    processor: Option<Arc<dyn LineProcessor>>,
    options: QueueOptions,
    chunk_size: u64,
}

impl Queue {
    /// Builds a queue ready to run. `processor` may be `None` only when the
    /// caller expects every chunk to fail before reaching line processing
    /// (exercising planning or I/O failure paths).
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::EmptyPlan`] if `chunks` is empty: the first
    /// chunk's size is what sizes every worker's buffers, so there must be
    /// at least one.
    pub fn new(
        chunks: Vec<Chunk>,
        worker_count: usize,
        processor: Option<Box<dyn LineProcessor>>,
        options: QueueOptions,
    ) -> Result<Self, ChunkError> {
        let chunk_size = chunks.first().ok_or(ChunkError::EmptyPlan)?.size;

        Ok(Self {
            chunks,
            worker_count: worker_count.max(1),
            processor: processor.map(Arc::from),
            options,
            chunk_size,
        })
    }

    /// Runs every planned chunk to completion and returns the aggregate
    /// result. Blocks the calling thread for the lifetime of the run.
    pub fn work(self) -> QueueResult {
        let total = self.chunks.len();
        let (task_tx, task_rx) = channel::bounded(total);
        for chunk in self.chunks {
            // Capacity equals the chunk count, so this never blocks.
            let _ = task_tx.send(chunk);
        }
        drop(task_tx);

        let (result_tx, result_rx) = channel::bounded(self.worker_count);

        let handles: Vec<_> = (0..self.worker_count)
            .map(|_| {
                let worker = Worker::new(
                    task_rx.clone(),
                    result_tx.clone(),
                    self.processor.clone(),
                    self.chunk_size as usize,
                    self.options.overflow_scan_size,
                );
                std::thread::spawn(move || worker.run())
            })
            .collect();

        // Drop our own handles so the channel disconnects once every
        // worker thread has returned, rather than only once we also stop
        // holding a reference.
        drop(task_rx);
        drop(result_tx);

        let mut queue_result = QueueResult::default();
        let mut completed = 0usize;
        for result in result_rx.iter() {
            completed += 1;
            {
                let mut log = self.options.log_sink.lock();
                let mut error_log = self.options.error_log_sink.lock();
                self.options
                    .result_logger
                    .log(total, completed, &result, &mut *log, &mut *error_log);
            }
            queue_result.record(result);
        }

        for handle in handles {
            let _ = handle.join();
        }

        queue_result
    }
}
