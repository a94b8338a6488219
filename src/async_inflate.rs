//! Async decompression module
//!
//! Provides an async streaming decompressor over any `AsyncRead` source.
//! Decoded output is yielded as a `futures::Stream` of [`Bytes`] chunks,
//! driven by the same resumable decoder as the synchronous API.

use crate::common::{Flush, InflateError, Result, Status};
use crate::inflate::InflateStream;
use bytes::Bytes;
use futures::stream::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Size of the internal compressed-input buffer
const INPUT_CHUNK: usize = 0x2000;

/// Default size of the yielded decompressed chunks
const OUTPUT_CHUNK: usize = 0x4000;

/// Async streaming decompressor yielding decoded chunks
#[pin_project]
#[derive(Debug)]
pub struct AsyncInflateReader<R: AsyncRead + Unpin> {
    #[pin]
    reader: R,
    stream: InflateStream,
    in_buf: Vec<u8>,
    in_pos: usize,
    out_buf: Vec<u8>,
    source_eof: bool,
    finished: bool,
}

impl<R: AsyncRead + Unpin> AsyncInflateReader<R> {
    /// Create an async reader with the default chunk size
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, OUTPUT_CHUNK)
    }

    /// Create an async reader yielding chunks of at most `chunk_size` bytes
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        AsyncInflateReader {
            reader,
            stream: InflateStream::new(),
            in_buf: Vec::new(),
            in_pos: 0,
            out_buf: vec![0; chunk_size.max(1)],
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
}

impl<R: AsyncRead + Unpin> Stream for AsyncInflateReader<R> {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if *this.finished {
                return Poll::Ready(None);
            }

            if *this.in_pos == this.in_buf.len() && !*this.source_eof {
                this.in_buf.resize(INPUT_CHUNK, 0);
                let mut read_buf = ReadBuf::new(&mut this.in_buf[..]);
                match this.reader.as_mut().poll_read(cx, &mut read_buf) {
                    Poll::Pending => {
                        this.in_buf.clear();
                        *this.in_pos = 0;
                        return Poll::Pending;
                    }
                    Poll::Ready(Ok(())) => {
                        let filled = read_buf.filled().len();
                        this.in_buf.truncate(filled);
                        *this.in_pos = 0;
                        if filled == 0 {
                            *this.source_eof = true;
                        }
                    }
                    Poll::Ready(Err(e)) => {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(e.into())));
                    }
                }
            }

            let input = &this.in_buf[*this.in_pos..];
            match this.stream.inflate(input, &mut this.out_buf[..], Flush::None) {
                Ok(inf) => {
                    *this.in_pos += inf.bytes_consumed;
                    if inf.status == Status::StreamEnd {
                        *this.finished = true;
                    }
                    if inf.bytes_written > 0 {
                        let chunk = Bytes::copy_from_slice(&this.out_buf[..inf.bytes_written]);
                        return Poll::Ready(Some(Ok(chunk)));
                    }
                    if *this.finished {
                        return Poll::Ready(None);
                    }
                    if inf.status == Status::NeedInput && *this.source_eof {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(truncated())));
                    }
                }
                Err(InflateError::Buffer) => {
                    if *this.source_eof {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(truncated())));
                    }
                }
                Err(e) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
            }
        }
    }
}

fn truncated() -> InflateError {
    InflateError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "deflate stream ended mid-block",
    ))
}
