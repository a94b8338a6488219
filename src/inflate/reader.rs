//! InflateReader - streaming decompression reader
//!
//! Wraps any byte source and exposes the decompressed stream through the
//! `Read` trait. Compressed bytes are pulled through an internal chunk
//! buffer; decompressed bytes land directly in the caller's buffer.

use super::state::InflateStream;
use crate::common::{Flush, InflateError, Result, Status};
use std::io::Read;

/// Size of the internal compressed-input buffer
const INPUT_CHUNK: usize = 0x2000;

/// Streaming decompression reader implementing the `Read` trait
#[derive(Debug)]
pub struct InflateReader<R: Read> {
    reader: R,
    stream: InflateStream,
    in_buf: Box<[u8; INPUT_CHUNK]>,
    in_pos: usize,
    in_len: usize,
    source_eof: bool,
    finished: bool,
}

impl<R: Read> InflateReader<R> {
    /// Create a reader decoding a raw DEFLATE stream from `reader`
    pub fn new(reader: R) -> Self {
        Self::with_stream(reader, InflateStream::new())
    }

    /// Create a reader with a decoder window of `2^window_bits` bytes
    pub fn with_window_bits(reader: R, window_bits: u8) -> Result<Self> {
        Ok(Self::with_stream(
            reader,
            InflateStream::with_window_bits(window_bits)?,
        ))
    }

    fn with_stream(reader: R, stream: InflateStream) -> Self {
        InflateReader {
            reader,
            stream,
            in_buf: Box::new([0; INPUT_CHUNK]),
            in_pos: 0,
            in_len: 0,
            source_eof: false,
            finished: false,
        }
    }

    /// Total decompressed bytes produced so far
    pub fn total_out(&self) -> u64 {
        self.stream.total_out()
    }

    /// Consume the reader, returning the underlying byte source
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Borrow the underlying byte source
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    fn fill_input(&mut self) -> std::io::Result<()> {
        self.in_len = self.reader.read(&mut self.in_buf[..])?;
        self.in_pos = 0;
        if self.in_len == 0 {
            self.source_eof = true;
        }
        Ok(())
    }
}

impl<R: Read> Read for InflateReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.in_pos == self.in_len && !self.source_eof {
                self.fill_input()?;
            }
            let input = &self.in_buf[self.in_pos..self.in_len];
            match self.stream.inflate(input, buf, Flush::None) {
                Ok(inf) => {
                    self.in_pos += inf.bytes_consumed;
                    if inf.status == Status::StreamEnd {
                        self.finished = true;
                        return Ok(inf.bytes_written);
                    }
                    if inf.bytes_written > 0 {
                        return Ok(inf.bytes_written);
                    }
                    if inf.status == Status::NeedInput && self.source_eof {
                        return Err(truncated());
                    }
                }
                Err(InflateError::Buffer) => {
                    if self.source_eof {
                        return Err(truncated());
                    }
                    // both buffers stalled; the next loop pass refills input
                }
                Err(e @ InflateError::Memory) => {
                    return Err(std::io::Error::new(std::io::ErrorKind::OutOfMemory, e))
                }
                Err(e) => {
                    return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                }
            }
        }
    }
}

fn truncated() -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "deflate stream ended mid-block",
    )
}
