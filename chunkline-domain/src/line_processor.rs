// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The user-supplied line transformation.

use crate::chunk::Chunk;
use crate::error::BoxedError;

/// Context passed to a [`LineProcessor`] alongside the raw line bytes.
pub struct LineMetadata<'a> {
    /// 1-based index of this line within its owning chunk.
    pub line: u64,
    /// The chunk this line was read from.
    pub chunk: &'a Chunk,
}

/// Transforms one line (without its trailing newline) into output bytes.
///
/// Implementations must be safe to call concurrently from multiple worker
/// threads; the engine gives no guarantee about call interleaving across
/// workers, only that calls for a single chunk are sequential and in line
/// order.
///
/// Returning `Ok(vec![])` drops the line from the output stream without
/// failing the chunk.
pub trait LineProcessor: Send + Sync {
    fn process(&self, line: &[u8], metadata: LineMetadata<'_>) -> Result<Vec<u8>, BoxedError>;
}

/// Adapts a plain closure to [`LineProcessor`], mirroring the adapter the
/// engine uses internally for its own identity/no-op processors and letting
/// callers avoid writing a one-method struct for simple transforms.
pub struct LineProcessorFn<F>(F)
where
    F: Fn(&[u8], LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> + Send + Sync;

impl<F> LineProcessorFn<F>
where
    F: Fn(&[u8], LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> LineProcessor for LineProcessorFn<F>
where
    F: Fn(&[u8], LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> + Send + Sync,
{
    fn process(&self, line: &[u8], metadata: LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> {
        (self.0)(line, metadata)
    }
}
