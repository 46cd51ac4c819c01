// /////////////////////////////////////////////////////////////////////////////
// Chunkline
// Copyright (c) 2026 The Chunkline Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end behaviour of [`Queue`] over real files: the concrete
//! scenarios from the testable-properties list, plus the invariants those
//! scenarios exist to exercise.

use std::io::{self, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use chunkline::file_source::plan_file;
use chunkline::{OrderedWriter, Queue, QueueOptions};
use chunkline_domain::error::BoxedError;
use chunkline_domain::{ChunkSink, LineMetadata, LineProcessor};

/// A cloneable, thread-safe byte sink for inspecting what an
/// [`OrderedWriter`] actually wrote once a run completes.
#[derive(Clone, Default)]
struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `count` newline-terminated lines of `body_len` digit characters
/// each and returns the file plus the exact byte count of one line
/// (`body_len + 1`).
fn fixed_width_lines(count: usize, body_len: usize) -> (tempfile::NamedTempFile, usize) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..count {
        write!(file, "{:0width$}", i % 10u32.pow(body_len as u32) as usize, width = body_len).unwrap();
        file.write_all(b"\n").unwrap();
    }
    file.flush().unwrap();
    (file, body_len + 1)
}

struct Identity;

impl LineProcessor for Identity {
    fn process(&self, line: &[u8], _metadata: LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> {
        Ok(line.to_vec())
    }
}

#[test]
fn s1_three_chunks_conserve_all_lines() {
    // 500 bytes, 100 lines of 5 bytes each (4-digit body + \n), chunk size 200.
    let (file, _line_len) = fixed_width_lines(100, 4);
    let (chunks, _source) = plan_file(file.path(), 200, None).unwrap();
    assert_eq!(chunks.len(), 3);

    let queue = Queue::new(chunks, 10, Some(Box::new(Identity)), QueueOptions::default()).unwrap();
    let result = queue.work();

    assert_eq!(result.lines, 100);
    assert_eq!(result.failed_chunks, 0);
    assert_eq!(result.results.len(), 3);
}

#[test]
fn s2_chunk_larger_than_source_is_a_single_eof_chunk() {
    let (file, _line_len) = fixed_width_lines(100, 4);
    let (chunks, _source) = plan_file(file.path(), 512, None).unwrap();
    assert_eq!(chunks.len(), 1);

    let queue = Queue::new(chunks, 10, Some(Box::new(Identity)), QueueOptions::default()).unwrap();
    let result = queue.work();

    assert_eq!(result.lines, 100);
    assert_eq!(result.failed_chunks, 0);
    assert!(result.results[0].eof);
}

#[test]
fn s3_failed_chunks_match_chunks_with_no_newline_in_their_primary_window() {
    let (file, _line_len) = fixed_width_lines(100, 4);
    let data = std::fs::read(file.path()).unwrap();
    let chunk_size = 10u64;
    let (chunks, _source) = plan_file(file.path(), chunk_size, None).unwrap();

    // Independently compute, from the raw bytes, which non-first chunks
    // should fail: their primary window contains no newline and they did
    // not hit EOF (a short read would have made them the EOF chunk instead).
    let expected_failures = chunks
        .iter()
        .filter(|c| c.offset > 0)
        .filter(|c| {
            let end = (c.offset + c.size).min(data.len() as u64) as usize;
            let start = c.offset as usize;
            if start >= data.len() {
                return false;
            }
            let window = &data[start..end];
            let hit_eof = end as u64 - c.offset < c.size;
            !hit_eof && !window.contains(&b'\n')
        })
        .count() as u64;

    let queue = Queue::new(chunks, 4, Some(Box::new(Identity)), QueueOptions::default()).unwrap();
    let result = queue.work();

    assert_eq!(result.failed_chunks, expected_failures);
    for r in &result.results {
        if let Some(error) = &r.error {
            assert!(matches!(error, chunkline_domain::ChunkError::NoLinebreakInChunk { .. }));
        }
    }
}

#[test]
fn s6_a_single_failing_chunk_does_not_affect_its_siblings() {
    // A processor that fails exactly once, on an arbitrary line, regardless
    // of which chunk or phase (mid-chunk or trailing) it lands in.
    struct FailOnce(AtomicU64);
    impl LineProcessor for FailOnce {
        fn process(&self, line: &[u8], _metadata: LineMetadata<'_>) -> Result<Vec<u8>, BoxedError> {
            if self.0.fetch_sub(1, Ordering::SeqCst) == 1 {
                return Err("synthetic failure".into());
            }
            Ok(line.to_vec())
        }
    }

    let (file, _line_len) = fixed_width_lines(100, 4);
    let (chunks, _source) = plan_file(file.path(), 200, None).unwrap();
    assert_eq!(chunks.len(), 3);

    // Fails on the 41st line processed overall: inside the first chunk's
    // straddling trailing line (chunk size 200 == 40 lines of 5 bytes).
    let processor = FailOnce(AtomicU64::new(41));
    let queue = Queue::new(chunks, 1, Some(Box::new(processor)), QueueOptions::default()).unwrap();
    let result = queue.work();

    assert_eq!(result.failed_chunks, 1);
    let failed: Vec<_> = result.results.iter().filter(|r| r.error.is_some()).collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].error,
        Some(chunkline_domain::ChunkError::Processor { .. })
    ));
}

#[test]
fn property_total_lines_are_conserved_across_a_range_of_chunk_sizes() {
    let (file, line_len) = fixed_width_lines(100, 4);
    let total_lines = 100u64;

    for chunk_size in [7u64, 11, 13, 17, 23, line_len as u64, (line_len * 2) as u64, 500, 1000] {
        let (chunks, _source) = plan_file(file.path(), chunk_size, None).unwrap();
        let queue = Queue::new(chunks, 4, Some(Box::new(Identity)), QueueOptions::default()).unwrap();
        let result = queue.work();
        assert_eq!(result.failed_chunks, 0, "chunk_size={chunk_size} had failures");
        assert_eq!(result.lines, total_lines, "chunk_size={chunk_size} lost or gained lines");
    }
}

#[test]
fn property_straddle_reconstruction_round_trips_through_the_ordered_writer() {
    let (file, _line_len) = fixed_width_lines(237, 6);
    let original = std::fs::read(file.path()).unwrap();

    for chunk_size in [9u64, 37, 64, 128, 1000] {
        let buf = SharedBuf::default();
        let writer = Arc::new(OrderedWriter::new(buf.clone(), true));
        let sink: Arc<dyn ChunkSink> = writer;

        let (chunks, _source) = plan_file(file.path(), chunk_size, Some(sink)).unwrap();
        let queue = Queue::new(chunks, 6, Some(Box::new(Identity)), QueueOptions::default()).unwrap();
        let result = queue.work();
        assert_eq!(result.failed_chunks, 0, "chunk_size={chunk_size}");

        // Every line in the fixture is "\n"-terminated, and reassembly joins
        // every line in order with a single "\n", within a chunk via the
        // worker and across chunks via the ordered writer. The output
        // therefore matches the source with its one final trailing newline
        // removed, since "\n".join(lines) never adds a trailing separator.
        let reassembled = buf.0.lock().unwrap().clone();
        let mut expected = original.clone();
        assert_eq!(expected.pop(), Some(b'\n'));
        assert_eq!(reassembled, expected, "chunk_size={chunk_size}");
    }
}
