// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A [`ChunkSink`] that reassembles out-of-order per-chunk writes into
//! ascending chunk-id order before handing them to an underlying byte sink.

use std::collections::HashMap;
use std::io::Write;

use chunkline_domain::error::BoxedError;
use chunkline_domain::{Chunk, ChunkSink};
use parking_lot::Mutex;

struct State<W> {
    handle: W,
    cache: HashMap<u64, Vec<u8>>,
    next_expected: u64,
    wrote_any: bool,
}

/// Wraps an underlying [`std::io::Write`] and serialises concurrent
/// [`ChunkSink::write`] calls through a single mutex.
///
/// In `keep_order = false` mode every call passes straight through with no
/// buffering and no separator. In `keep_order = true` mode, calls may arrive
/// in any order; each chunk's bytes are cached by id and flushed once every
/// lower id has already been flushed, with a single `\n` written between
/// successive *non-empty* chunks, never before the first and never after
/// the last.
///
/// If the underlying sink errors, the failing entry is left in the cache and
/// `next_expected` does not advance: every later call that reaches the same
/// drain point will fail too. A sink error should be treated as fatal to the
/// run by callers who care about completeness of the ordered output.
pub struct OrderedWriter<W> {
    keep_order: bool,
    state: Mutex<State<W>>,
}

impl<W: Write + Send> OrderedWriter<W> {
    pub fn new(handle: W, keep_order: bool) -> Self {
        Self {
            keep_order,
            state: Mutex::new(State {
                handle,
                cache: HashMap::new(),
                next_expected: 1,
                wrote_any: false,
            }),
        }
    }
}

impl<W: Write + Send> ChunkSink for OrderedWriter<W> {
    fn write(&self, chunk: &Chunk, bytes: &[u8]) -> Result<(), BoxedError> {
        let mut state = self.state.lock();

        if !self.keep_order {
            return write_buff(&mut state.handle, bytes, &mut state.wrote_any, false);
        }

        state.cache.insert(chunk.id, bytes.to_vec());
        drain_cache(&mut state)
    }
}

fn drain_cache<W: Write>(state: &mut State<W>) -> Result<(), BoxedError> {
    loop {
        let current = state.next_expected;
        let Some(buff) = state.cache.get(&current) else {
            return Ok(());
        };
        let buff = buff.clone();

        write_buff(&mut state.handle, &buff, &mut state.wrote_any, true)?;

        state.cache.remove(&current);
        state.next_expected += 1;
    }
}

fn write_buff<W: Write>(
    handle: &mut W,
    buff: &[u8],
    wrote_any: &mut bool,
    separate: bool,
) -> Result<(), BoxedError> {
    if buff.is_empty() {
        return Ok(());
    }

    if separate && *wrote_any {
        handle.write_all(b"\n")?;
    }

    handle.write_all(buff)?;
    *wrote_any = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkline_domain::ChunkSource;
    use std::io::Cursor;
    use std::sync::Arc;

    struct NullSource;

    impl ChunkSource for NullSource {
        fn open(&self) -> std::io::Result<Box<dyn chunkline_domain::source::ReadSeek>> {
            Ok(Box::new(Cursor::new(Vec::new())))
        }

        fn handle_id(&self) -> String {
            "null".to_string()
        }
    }

    fn chunk(id: u64) -> Chunk {
        Chunk { id, offset: 0, size: 1, source: Arc::new(NullSource), sink: None }
    }

    #[test]
    fn keep_order_reassembles_out_of_order_writes() {
        let out: Vec<u8> = Vec::new();
        let writer = OrderedWriter::new(out, true);

        writer.write(&chunk(3), b"ccc").unwrap();
        writer.write(&chunk(1), b"aaa").unwrap();
        writer.write(&chunk(2), b"bbb").unwrap();

        let state = writer.state.lock();
        assert_eq!(state.handle, b"aaa\nbbb\nccc");
    }

    #[test]
    fn keep_order_skips_separators_around_empty_chunks() {
        let out: Vec<u8> = Vec::new();
        let writer = OrderedWriter::new(out, true);

        writer.write(&chunk(1), b"aaa").unwrap();
        writer.write(&chunk(2), b"").unwrap();
        writer.write(&chunk(3), b"ccc").unwrap();

        let state = writer.state.lock();
        assert_eq!(state.handle, b"aaa\nccc");
    }

    #[test]
    fn no_keep_order_passes_through_unbuffered() {
        let out: Vec<u8> = Vec::new();
        let writer = OrderedWriter::new(out, false);

        writer.write(&chunk(2), b"second").unwrap();
        writer.write(&chunk(1), b"first").unwrap();

        let state = writer.state.lock();
        assert_eq!(state.handle, b"secondfirst");
    }

    proptest::proptest! {
        /// Property 4: whatever order `write` is called in, ascending-id
        /// dense chunks reassemble to the `\n`-joined concatenation of their
        /// payloads, with empty payloads and their separators skipped.
        #[test]
        fn reassembles_any_permutation_of_dense_ids(
            payloads in proptest::collection::vec(proptest::collection::vec(proptest::prelude::any::<u8>(), 0..8), 1..12),
            seed in proptest::prelude::any::<u64>(),
        ) {
            let n = payloads.len();
            let mut order: Vec<usize> = (0..n).collect();
            // A cheap deterministic shuffle: Fisher-Yates driven by `seed`.
            let mut state = seed;
            for i in (1..n).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                let j = (state >> 33) as usize % (i + 1);
                order.swap(i, j);
            }

            let out: Vec<u8> = Vec::new();
            let writer = OrderedWriter::new(out, true);
            for &i in &order {
                writer.write(&chunk(i as u64 + 1), &payloads[i]).unwrap();
            }

            let mut expected = Vec::new();
            for payload in &payloads {
                if payload.is_empty() {
                    continue;
                }
                if !expected.is_empty() {
                    expected.push(b'\n');
                }
                expected.extend_from_slice(payload);
            }

            let state = writer.state.lock();
            proptest::prop_assert_eq!(&state.handle, &expected);
        }
    }
}
