// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunkline
//!
//! The engine that turns a [`chunkline_domain::Chunk`] plan into parallel
//! work: a pool of [`Worker`] threads reading and line-processing byte
//! ranges, a [`Queue`] that owns the task and result channels and
//! aggregates totals, and an [`OrderedWriter`] that reassembles out-of-order
//! per-chunk output back into source order.
//!
//! ## Module Structure
//!
//! - [`worker`]: the straddling-line read-and-process protocol.
//! - [`queue`]: the worker pool, channels, and aggregation.
//! - [`ordered_writer`]: order-preserving [`chunkline_domain::ChunkSink`].
//! - [`progress`]: the pluggable progress-line formatter.
//! - [`file_source`]: a trivial file-backed
//!   [`chunkline_domain::ChunkSource`] plus a convenience to plan a whole
//!   file in one call.
//!
//! ## Example
//!
//! ```no_run
//! use chunkline::{file_source, Queue, QueueOptions};
//! use chunkline_domain::{LineMetadata, LineProcessorFn};
//!
//! let (chunks, _source) = file_source::plan_file("input.log", 1 << 20, None).unwrap();
//! let processor = LineProcessorFn::new(|line: &[u8], _meta: LineMetadata<'_>| {
//!     Ok(line.to_vec())
//! });
//! let queue = Queue::new(chunks, 4, Some(Box::new(processor)), QueueOptions::default()).unwrap();
//! let result = queue.work();
//! println!("processed {} lines across {} chunks", result.lines, result.results.len());
//! ```

pub mod file_source;
pub mod ordered_writer;
pub mod progress;
pub mod queue;
pub mod worker;

pub use file_source::FileChunkSource;
pub use ordered_writer::OrderedWriter;
pub use progress::{default_result_logger, ResultLogger};
pub use queue::{Queue, QueueOptions};
pub use worker::Worker;
