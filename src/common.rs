//! Common types and constants for the raw-DEFLATE decompressor
//!
//! This module defines the error type, the flush and status enums used at
//! the `inflate` call boundary, and the constants shared by the decoder
//! components.

use thiserror::Error;

/// Error type for decompression operations
#[derive(Debug, Error)]
pub enum InflateError {
    /// Window size out of the range permitted by RFC 1951
    #[error("invalid window bits: {0} (expected 8..=15)")]
    WindowBits(u8),

    /// Malformed compressed stream; the message identifies the defect
    ///
    /// Once returned, the stream is poisoned: every further [`inflate`]
    /// call fails with the same message until the stream is reset.
    ///
    /// [`inflate`]: crate::InflateStream::inflate
    #[error("{0}")]
    Data(&'static str),

    /// Sliding-window allocation failed; the stream is unusable
    #[error("sliding window allocation failed")]
    Memory,

    /// No progress is possible with the supplied buffers
    ///
    /// Returned when both buffers were left untouched, or when
    /// [`Flush::Finish`] was requested and the end of the stream has not
    /// been reached. Recoverable: supply more input or output and retry.
    #[error("no progress possible; more input or output space required")]
    Buffer,

    /// I/O error from an underlying reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decompression operations
pub type Result<T> = std::result::Result<T, InflateError>;

/// Flush parameter for [`inflate`](crate::InflateStream::inflate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flush {
    /// Decode as much as the buffers allow
    #[default]
    None,
    /// Identical to [`Flush::None`] for decompression
    Sync,
    /// Return when a block boundary is reached
    Block,
    /// Return at block boundaries and additionally as soon as a block
    /// header (and, for dynamic blocks, its code tables) has been read
    Trees,
    /// Expect the stream to end within the supplied buffers; if it does
    /// not, the call fails with [`InflateError::Buffer`]
    Finish,
}

/// Outcome of a single [`inflate`](crate::InflateStream::inflate) call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Progress was made; call again to continue
    Ok,
    /// The final block has been fully decoded and all output delivered
    StreamEnd,
    /// Suspended mid-stream: more input is required
    NeedInput,
    /// Suspended mid-stream: the output buffer is full
    NeedOutput,
}

/// Byte accounting for a single [`inflate`](crate::InflateStream::inflate) call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inflation {
    /// Why the call returned
    pub status: Status,
    /// Bytes consumed from the input slice
    pub bytes_consumed: usize,
    /// Bytes written to the output slice
    pub bytes_written: usize,
}

impl Inflation {
    /// True once the stream has been decoded to completion
    pub fn is_stream_end(&self) -> bool {
        self.status == Status::StreamEnd
    }
}

// RFC 1951 constants

/// Smallest supported sliding-window exponent (256-byte window)
pub const MIN_WINDOW_BITS: u8 = 8;

/// Largest supported sliding-window exponent (32 KiB window)
pub const MAX_WINDOW_BITS: u8 = 15;

/// Default sliding-window exponent
pub const DEFAULT_WINDOW_BITS: u8 = 15;

/// Longest match a length/distance pair can encode
pub const MAX_MATCH_LEN: usize = 258;

/// Largest back-reference distance the format can encode
pub const MAX_DISTANCE: usize = 32768;

/// Number of symbols in the literal/length alphabet
pub const NUM_LITLEN_SYMS: usize = 288;

/// Number of symbols in the distance alphabet
pub const NUM_DIST_SYMS: usize = 32;

/// Number of symbols in the code-length alphabet
pub const NUM_CODELEN_SYMS: usize = 19;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InflateError::WindowBits(16).to_string(),
            "invalid window bits: 16 (expected 8..=15)"
        );
        assert_eq!(
            InflateError::Data("invalid block type").to_string(),
            "invalid block type"
        );
    }

    #[test]
    fn test_flush_default() {
        assert_eq!(Flush::default(), Flush::None);
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_MATCH_LEN, 258);
        assert_eq!(MAX_DISTANCE, 1 << MAX_WINDOW_BITS);
        assert_eq!(NUM_LITLEN_SYMS + NUM_DIST_SYMS, 320);
    }
}
