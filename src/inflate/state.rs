//! Persistent decompression state
//!
//! [`InflateStream`] holds everything that must survive between `inflate`
//! calls: the state-machine mode, the bit accumulator, the in-flight
//! length/distance pair, the dynamic-header scratch, the decoding-table
//! pool, and the sliding window. The struct owns its window and table
//! pool; the caller owns the input and output buffers.

use crate::common::{
    InflateError, Result, DEFAULT_WINDOW_BITS, MAX_DISTANCE, MAX_WINDOW_BITS, MIN_WINDOW_BITS,
    NUM_LITLEN_SYMS,
};
use crate::huffman::{Code, ENOUGH};
use crate::tables::fixed_tables;
use crate::window::Window;

/// State-machine label, one per resumable decoding step.
///
/// The declaration order is meaningful: post-call bookkeeping compares
/// modes to decide whether the stream is still producing output (before
/// [`Mode::Check`]) and whether it is still healthy (before [`Mode::Bad`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Mode {
    /// Entry point for a fresh stream
    Head,
    /// Between blocks; pauses here when the flush mode asks for boundaries
    Type,
    /// Read the 3-bit block header
    TypeDo,
    /// Read and validate a stored block's LEN/NLEN
    Stored,
    /// Stored payload about to copy (boundary marker for diagnostics)
    CopyStart,
    /// Bulk-copy stored payload
    Copy,
    /// Read the dynamic header's three code counts
    Table,
    /// Read the code-length code lengths
    LenLens,
    /// Decode the literal/length and distance code lengths
    CodeLens,
    /// Code tables ready (boundary marker for diagnostics)
    LenStart,
    /// Decode a literal/length symbol
    Len,
    /// Read the extra length bits
    LenExt,
    /// Decode a distance symbol
    Dist,
    /// Read the extra distance bits
    DistExt,
    /// Copy a back-reference into the output
    Match,
    /// Emit one literal byte
    Lit,
    /// Final block consumed; raw streams carry no trailer
    Check,
    /// Stream complete
    Done,
    /// Malformed stream; terminal
    Bad,
    /// Window allocation failed; terminal
    Mem,
}

/// Which storage a decoding table lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableSource {
    /// The lazily built fixed-Huffman tables
    Fixed,
    /// An offset into the stream's code pool
    Pool(usize),
}

/// A streaming raw-DEFLATE decompressor.
///
/// Feed compressed bytes and drain decompressed bytes with
/// [`inflate`](Self::inflate) in chunks of any size; the decoder suspends
/// and resumes around input starvation and output saturation. One stream
/// decodes one logical DEFLATE stream; [`reset`](Self::reset) starts the
/// next without reallocating.
#[derive(Debug, Clone)]
pub struct InflateStream {
    pub(crate) mode: Mode,
    /// Set once the final block's header has been read
    pub(crate) last: bool,
    /// Stored-block byte count, match length, or pending literal
    pub(crate) length: usize,
    /// Match distance
    pub(crate) offset: usize,
    /// Extra bits still owed to the in-flight length/distance
    pub(crate) extra: u32,

    // dynamic-header scratch
    pub(crate) nlen: usize,
    pub(crate) ndist: usize,
    pub(crate) ncode: usize,
    pub(crate) have: usize,
    pub(crate) lens: [u16; 320],
    pub(crate) work: [u16; NUM_LITLEN_SYMS],

    // decoding tables
    pub(crate) codes: [Code; ENOUGH],
    pub(crate) next: usize,
    pub(crate) lencode: TableSource,
    pub(crate) distcode: TableSource,
    pub(crate) lenbits: usize,
    pub(crate) distbits: usize,

    pub(crate) window: Window,
    /// Largest back-reference distance accepted before the stream is
    /// declared malformed
    pub(crate) dmax: usize,
    /// When false, too-far back-references zero-fill instead of failing
    pub(crate) sane: bool,
    /// Bits consumed by the symbol being decoded; -1 between symbols
    pub(crate) back: i32,

    pub(crate) total_in: u64,
    pub(crate) total_out: u64,
    pub(crate) data_type: u32,
    pub(crate) msg: Option<&'static str>,

    // bit accumulator, persisted between calls
    pub(crate) hold: u64,
    pub(crate) bits: u32,
}

impl InflateStream {
    /// Create a stream with the default 32 KiB window
    pub fn new() -> Self {
        Self::construct(DEFAULT_WINDOW_BITS)
    }

    /// Create a stream whose window holds `2^window_bits` bytes.
    ///
    /// `window_bits` must lie in `8..=15`; streams compressed with a larger
    /// window than the decoder's will fail with a distance error.
    pub fn with_window_bits(window_bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(InflateError::WindowBits(window_bits));
        }
        Ok(Self::construct(window_bits))
    }

    fn construct(window_bits: u8) -> Self {
        InflateStream {
            mode: Mode::Head,
            last: false,
            length: 0,
            offset: 0,
            extra: 0,
            nlen: 0,
            ndist: 0,
            ncode: 0,
            have: 0,
            lens: [0; 320],
            work: [0; NUM_LITLEN_SYMS],
            codes: [Code::INVALID; ENOUGH],
            next: 0,
            lencode: TableSource::Pool(0),
            distcode: TableSource::Pool(0),
            lenbits: 0,
            distbits: 0,
            window: Window::new(window_bits),
            dmax: MAX_DISTANCE,
            sane: true,
            back: -1,
            total_in: 0,
            total_out: 0,
            data_type: 0,
            msg: None,
            hold: 0,
            bits: 0,
        }
    }

    /// Restart the stream, keeping the window allocation and size
    pub fn reset(&mut self) {
        let wbits = self.window.wbits();
        self.window.reset(wbits);
        self.reset_state();
    }

    /// Restart the stream with a new window size.
    ///
    /// The window allocation is kept when `window_bits` is unchanged and
    /// released otherwise.
    pub fn reset_with_window_bits(&mut self, window_bits: u8) -> Result<()> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(InflateError::WindowBits(window_bits));
        }
        self.window.reset(window_bits);
        self.reset_state();
        Ok(())
    }

    fn reset_state(&mut self) {
        self.mode = Mode::Head;
        self.last = false;
        self.length = 0;
        self.offset = 0;
        self.extra = 0;
        self.have = 0;
        self.next = 0;
        self.lencode = TableSource::Pool(0);
        self.distcode = TableSource::Pool(0);
        self.lenbits = 0;
        self.distbits = 0;
        self.dmax = MAX_DISTANCE;
        self.sane = true;
        self.back = -1;
        self.total_in = 0;
        self.total_out = 0;
        self.data_type = 0;
        self.msg = None;
        self.hold = 0;
        self.bits = 0;
    }

    /// Accept back-references reaching behind the available history and
    /// fill the unavailable bytes with zeros instead of failing.
    ///
    /// Off by default; [`reset`](Self::reset) restores strict checking.
    pub fn set_zero_fill_invalid_distances(&mut self, enabled: bool) {
        self.sane = !enabled;
    }

    /// Total compressed bytes consumed over the stream's lifetime
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Total decompressed bytes produced over the stream's lifetime
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Window exponent the stream was configured with
    pub fn window_bits(&self) -> u8 {
        self.window.wbits()
    }

    /// Diagnostic word after the last call: the number of buffered bits,
    /// plus 64 if the final block has been seen, plus 128 when stopped at a
    /// block boundary, plus 256 when stopped right after a block header
    pub fn data_type(&self) -> u32 {
        self.data_type
    }

    /// Switch the current tables to the fixed-Huffman set
    pub(crate) fn use_fixed_tables(&mut self) {
        let ft = fixed_tables();
        self.lencode = TableSource::Fixed;
        self.lenbits = ft.lenbits;
        self.distcode = TableSource::Fixed;
        self.distbits = ft.distbits;
    }

    /// Literal/length table entry for a root (or sub-table) index
    pub(crate) fn len_entry(&self, idx: usize) -> Code {
        match self.lencode {
            TableSource::Fixed => fixed_tables().lenfix[idx],
            TableSource::Pool(off) => self.codes[off + idx],
        }
    }

    /// Distance table entry for a root (or sub-table) index
    pub(crate) fn dist_entry(&self, idx: usize) -> Code {
        match self.distcode {
            TableSource::Fixed => fixed_tables().distfix[idx],
            TableSource::Pool(off) => self.codes[off + idx],
        }
    }
}

impl Default for InflateStream {
    fn default() -> Self {
        Self::new()
    }
}
