//! Sliding window for back-reference resolution
//!
//! A circular buffer holding the most recent decompressed bytes. Matches
//! whose distance reaches behind the current call's output region are
//! served from here, so output buffers of any size compose into one
//! logical stream. The buffer is allocated lazily on first use and
//! persists across calls; after any call that produced output, the last
//! `min(total_out, size)` stream bytes can be read back from it.

use crate::common::{InflateError, Result};

/// Circular history of recently produced output
#[derive(Debug, Clone, Default)]
pub(crate) struct Window {
    buf: Vec<u8>,
    wbits: u8,
    /// Bytes of valid history, saturating at the window size
    pub(crate) have: usize,
    /// Write cursor (next byte to overwrite), modulo the window size
    pub(crate) next: usize,
    size: usize,
}

impl Window {
    /// Create a window of capacity `2^wbits`, not yet allocated
    pub(crate) fn new(wbits: u8) -> Self {
        Window {
            buf: Vec::new(),
            wbits,
            have: 0,
            next: 0,
            size: 0,
        }
    }

    /// Forget all history; drop the allocation only if `wbits` changes
    pub(crate) fn reset(&mut self, wbits: u8) {
        if self.wbits != wbits {
            self.buf = Vec::new();
            self.wbits = wbits;
        }
        self.have = 0;
        self.next = 0;
        self.size = 0;
    }

    /// Window exponent this window was configured with
    pub(crate) fn wbits(&self) -> u8 {
        self.wbits
    }

    /// Capacity in bytes; 0 until the first [`update`](Self::update)
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// True once the window holds (or has held) history for this stream
    pub(crate) fn in_use(&self) -> bool {
        self.size != 0
    }

    /// Read access to the raw circular buffer
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Record the output of one call, keeping the most recent `size` bytes.
    ///
    /// Allocates the buffer on first use; an allocation failure is the
    /// stream's terminal memory error.
    pub(crate) fn update(&mut self, out: &[u8]) -> Result<()> {
        if self.buf.is_empty() {
            let full = 1usize << self.wbits;
            self.buf
                .try_reserve_exact(full)
                .map_err(|_| InflateError::Memory)?;
            self.buf.resize(full, 0);
        }
        if self.size == 0 {
            self.size = self.buf.len();
            self.next = 0;
            self.have = 0;
        }

        let full = self.size;
        let mut copy = out.len();
        if copy >= full {
            self.buf.copy_from_slice(&out[copy - full..]);
            self.next = 0;
            self.have = full;
        } else {
            let tail = out.len() - copy;
            let dist = (full - self.next).min(copy);
            self.buf[self.next..self.next + dist].copy_from_slice(&out[tail..tail + dist]);
            copy -= dist;
            if copy > 0 {
                // wrapped: the remainder lands at the start of the buffer
                let rest = out.len() - copy;
                self.buf[..copy].copy_from_slice(&out[rest..]);
                self.next = copy;
                self.have = full;
            } else {
                self.next += dist;
                if self.next == full {
                    self.next = 0;
                }
                if self.have < full {
                    self.have += dist;
                }
            }
        }
        Ok(())
    }
}
