//! # Archive Stream Writing
//!
//! Writes entries (header, content, padding) and the end-of-archive tail to any
//! [`std::io::Write`] sink. Nothing is read back from the sink.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::Result;
use crate::header::{EncodeOptions, HeaderBuilder, BLOCK_SIZE};
use crate::padding::{padding_len, ZERO_BLOCK};
use crate::record::FileRecord;

/// Length of the end-of-archive marker: two zero blocks, the minimum a ustar
/// reader expects.
pub const DEFAULT_TAIL_LEN: usize = 2 * BLOCK_SIZE;

/// Writes one entry: the 512-byte header, the content verbatim, then zero
/// padding up to the next block boundary.
///
/// Returns the number of bytes written. Sink errors are returned unchanged; a
/// failed call may leave a partial entry in the sink.
pub fn write_entry<W: Write + ?Sized>(
    sink: &mut W,
    record: &FileRecord<'_>,
    options: &EncodeOptions,
) -> Result<u64> {
    let header = HeaderBuilder::new(*options).build(record)?;
    let padding = padding_len(record.size());

    sink.write_all(header.as_bytes())?;
    sink.write_all(record.content)?;
    sink.write_all(&ZERO_BLOCK[..padding])?;

    debug!(name = record.name, size = record.size(), padding, "wrote archive entry");
    Ok(BLOCK_SIZE as u64 + record.size() + padding as u64)
}

/// Writes `tail_length` zero bytes. Call once, after the last entry.
pub fn write_tail<W: Write + ?Sized>(sink: &mut W, tail_length: usize) -> Result<()> {
    let mut remaining = tail_length;
    while remaining > 0 {
        let chunk = remaining.min(BLOCK_SIZE);
        sink.write_all(&ZERO_BLOCK[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}

/// A writer that owns its sink for the lifetime of one archive.
///
/// Entries appear in the order they are appended. The archive is only complete
/// once [`ArchiveWriter::finish`] (or [`ArchiveWriter::finish_with_tail`]) has run.
pub struct ArchiveWriter<W: Write> {
    writer: W,
    options: EncodeOptions,
    entry_count: u64,
    bytes_written: u64,
}

impl<W: Write> ArchiveWriter<W> {
    /// Creates a writer with strict name handling.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncodeOptions::default())
    }

    pub fn with_options(writer: W, options: EncodeOptions) -> Self {
        Self { writer, options, entry_count: 0, bytes_written: 0 }
    }

    /// Appends one file entry.
    pub fn append(&mut self, record: &FileRecord<'_>) -> Result<()> {
        let written = write_entry(&mut self.writer, record, &self.options)?;
        self.entry_count += 1;
        self.bytes_written += written;
        Ok(())
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Bytes handed to the sink so far, tail excluded until `finish`.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Writes the default two-block tail, flushes, and returns the sink.
    pub fn finish(self) -> Result<W> {
        self.finish_with_tail(DEFAULT_TAIL_LEN)
    }

    /// Writes a tail of `tail_length` zero bytes, flushes, and returns the sink.
    pub fn finish_with_tail(mut self, tail_length: usize) -> Result<W> {
        if tail_length < DEFAULT_TAIL_LEN {
            warn!(tail_length, minimum = DEFAULT_TAIL_LEN, "archive tail is shorter than two blocks");
        }
        write_tail(&mut self.writer, tail_length)?;
        self.writer.flush()?;
        self.bytes_written += tail_length as u64;
        debug!(entries = self.entry_count, bytes = self.bytes_written, "archive finished");
        Ok(self.writer)
    }
}
