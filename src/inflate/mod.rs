//! Raw DEFLATE (RFC 1951) decompression
//!
//! The decoder is a resumable state machine over a bit accumulator and a
//! sliding window: feed compressed bytes and drain decompressed bytes in
//! chunks of any size via [`InflateStream::inflate`], or wrap a byte
//! source with [`InflateReader`] for a `std::io::Read` interface.

mod bits;
mod decoder;
mod fast;
mod reader;
mod state;

pub use reader::InflateReader;
pub use state::InflateStream;

use crate::Result;
use std::io::Read;

/// Input bytes that must remain for the fast decode loop to run
pub(crate) const FAST_INPUT_MARGIN: usize = 6;

/// Output space that must remain for the fast decode loop to run
pub(crate) const FAST_OUTPUT_MARGIN: usize = 258;

/// Convenience function to decompress a complete raw DEFLATE stream in memory
pub fn inflate_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = InflateReader::new(std::io::Cursor::new(data));
    let mut output = Vec::new();
    reader.read_to_end(&mut output)?;
    Ok(output)
}
