//! rawflate - streaming raw DEFLATE (RFC 1951) decompressor
//!
//! This crate decodes raw DEFLATE streams: the bare compressed blocks with
//! no zlib or gzip framing around them. The decoder is a resumable
//! bit-level state machine over a bounded sliding window, so callers can
//! feed compressed input and drain decompressed output in chunks of any
//! size without ever materialising either stream in memory.
//!
//! # Features
//!
//! - Stored, fixed-Huffman, and dynamic-Huffman blocks
//! - Suspends and resumes at any bit boundary around input starvation and
//!   output saturation
//! - One heap allocation per stream (the sliding window, created lazily)
//! - Strict malformed-input detection with stable error messages
//! - Streaming API via the `Read` trait, plus an async `Stream` adapter
//!   behind the `async` feature
//!
//! # Example - one-shot decompression
//!
//! ```
//! use rawflate::inflate_bytes;
//!
//! // raw DEFLATE encoding of "Hello"
//! let compressed = [0xf3, 0x48, 0xcd, 0xc9, 0xc9, 0x07, 0x00];
//! let data = inflate_bytes(&compressed)?;
//! assert_eq!(data, b"Hello");
//! # Ok::<(), rawflate::InflateError>(())
//! ```
//!
//! # Example - chunked decompression
//!
//! ```
//! use rawflate::{Flush, InflateStream, Status};
//!
//! let compressed = [0xf3, 0x48, 0xcd, 0xc9, 0xc9, 0x07, 0x00];
//! let mut stream = InflateStream::new();
//! let mut out = [0u8; 64];
//! let inf = stream.inflate(&compressed, &mut out, Flush::Finish)?;
//! assert_eq!(inf.status, Status::StreamEnd);
//! assert_eq!(&out[..inf.bytes_written], b"Hello");
//! # Ok::<(), rawflate::InflateError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod error;
pub mod inflate;

// Internal components
mod huffman;
mod tables;
mod window;

// Async module (only available with the async feature)
#[cfg(feature = "async")]
pub mod async_inflate;

// Re-export commonly used types
pub use common::{
    Flush, InflateError, Inflation, Result, Status, DEFAULT_WINDOW_BITS, MAX_DISTANCE,
    MAX_MATCH_LEN, MAX_WINDOW_BITS, MIN_WINDOW_BITS,
};
pub use inflate::{InflateReader, InflateStream};

#[cfg(feature = "async")]
pub use async_inflate::AsyncInflateReader;

/// Decompress a complete raw DEFLATE stream held in memory
///
/// # Arguments
/// * `data` - The compressed stream, starting at the first block header
///
/// # Returns
/// A vector containing the decompressed bytes
pub fn inflate_bytes(data: &[u8]) -> Result<Vec<u8>> {
    inflate::inflate_bytes(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        // Test that common types are accessible
        let _ = Flush::None;
        let _ = Status::Ok;
        let _ = InflateStream::new();

        // Test that functions are accessible
        assert!(inflate_bytes(&[0x03, 0x00]).is_ok());
    }
}
