//! C1: offset-tracking byte source.
//!
//! Grounded on `parquet2::read::page::reader::PageReader`, which tracks `seen_num_values`
//! / byte position against an inner `R: Read` inline; this crate factors that bookkeeping
//! into its own wrapper so C2/C7/C8 can share it, following the "thin wrapper implementing
//! `Read`" idiom `parquet2`'s `read/` module uses throughout.

use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;

/// Wraps a seekable byte stream, counting the bytes consumed since the last absolute seek.
#[derive(Debug)]
pub struct OffsetTrackingReader<R> {
    reader: R,
    count: u64,
}

impl<R: Read + Seek> OffsetTrackingReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, count: 0 }
    }

    /// Bytes read since construction or the last `seek`.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Seeks to an absolute offset, resetting `count()` to zero.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.count = 0;
        Ok(())
    }

    /// The current absolute position of the underlying stream.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: Read> Read for OffsetTrackingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
