// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunkline Domain
//!
//! Core types and traits for parallel, line-oriented processing of large byte
//! streams. This crate defines the data the rest of the system operates on:
//! `Chunk`, `ChunkResult`, `LineMetadata`, and the three collaborator traits
//! a caller must supply: `ChunkSource`, `ChunkSink`, and `LineProcessor`. It
//! contains no concurrency and no I/O of its own; the engine that actually
//! reads, schedules, and writes chunks lives in the `chunkline` crate.
//!
//! ## Module Structure
//!
//! - [`chunk`]: the `Chunk` work item and the chunk planner.
//! - [`chunk_result`]: per-chunk and aggregate outcomes.
//! - [`line_processor`]: the line-transformation interface and its metadata.
//! - [`source`]: the `ChunkSource` abstraction over a seekable byte stream.
//! - [`sink`]: the `ChunkSink` abstraction over a (possibly shared) byte
//!   destination.
//! - [`error`]: the `ChunkError` taxonomy shared by every failure mode in the
//!   system.
//!
//! ## Design Rules
//!
//! - Value objects here are immutable once constructed and are defined by
//!   their attributes, not by identity.
//! - Nothing in this crate blocks a thread or performs I/O; that is the
//!   engine's job.

pub mod chunk;
pub mod chunk_result;
pub mod error;
pub mod line_processor;
pub mod sink;
pub mod source;

pub use chunk::{plan_chunks, Chunk};
pub use chunk_result::{ChunkResult, QueueResult};
pub use error::ChunkError;
pub use line_processor::{LineMetadata, LineProcessor, LineProcessorFn};
pub use sink::ChunkSink;
pub use source::ChunkSource;
