//! Static tables for DEFLATE decoding
//!
//! Length and distance base/extra tables for the literal/length and
//! distance alphabets, the transmission order of code-length code lengths,
//! and the fixed-Huffman decoding tables (built once on first use).

use crate::common::{NUM_DIST_SYMS, NUM_LITLEN_SYMS};
use crate::huffman::{build_table, Code, CodeKind};
use std::sync::OnceLock;

/// Base match lengths for length codes 257..=285
///
/// The two trailing zeros pad the table for the invalid codes 286 and 287.
pub(crate) const LENGTH_BASE: [u16; 31] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258, 0, 0,
];

/// Table-entry opcodes for length codes 257..=285
///
/// Value 16 plus the number of extra bits; the last two entries carry the
/// invalid-code marker (bit 6) for codes 286 and 287.
pub(crate) const LENGTH_EXTRA: [u8; 31] = [
    16, 16, 16, 16, 16, 16, 16, 16, 17, 17, 17, 17, 18, 18, 18, 18, 19, 19, 19, 19, 20, 20, 20,
    20, 21, 21, 21, 21, 16, 72, 78,
];

/// Base distances for distance codes 0..=29
pub(crate) const DIST_BASE: [u16; 32] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577, 0, 0,
];

/// Table-entry opcodes for distance codes 0..=29
pub(crate) const DIST_EXTRA: [u8; 32] = [
    16, 16, 16, 16, 17, 17, 18, 18, 19, 19, 20, 20, 21, 21, 22, 22, 23, 23, 24, 24, 25, 25, 26,
    26, 27, 27, 28, 28, 29, 29, 64, 64,
];

/// Transmission order of the code-length code lengths in a dynamic header
pub(crate) const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Decoding tables for the fixed-Huffman block type
#[derive(Debug)]
pub(crate) struct FixedTables {
    /// Literal/length table, indexed by the next 9 stream bits
    pub lenfix: [Code; 512],
    /// Root width of `lenfix`
    pub lenbits: usize,
    /// Distance table, indexed by the next 5 stream bits
    pub distfix: [Code; 32],
    /// Root width of `distfix`
    pub distbits: usize,
}

/// Fixed-Huffman tables, built once from the RFC 1951 code lengths
pub(crate) fn fixed_tables() -> &'static FixedTables {
    static FIXED: OnceLock<FixedTables> = OnceLock::new();
    FIXED.get_or_init(|| {
        let mut work = [0u16; NUM_LITLEN_SYMS];

        let mut lens = [0u16; NUM_LITLEN_SYMS];
        for (sym, len) in lens.iter_mut().enumerate() {
            *len = match sym {
                0..=143 => 8,
                144..=255 => 9,
                256..=279 => 7,
                _ => 8,
            };
        }
        let mut lenfix = [Code::INVALID; 512];
        let mut next = 0;
        let mut lenbits = 9;
        // The fixed literal/length code is complete; this cannot fail.
        let _ = build_table(
            CodeKind::Lens,
            &lens,
            &mut lenfix,
            &mut next,
            &mut lenbits,
            &mut work,
        );

        let dist_lens = [5u16; NUM_DIST_SYMS];
        let mut distfix = [Code::INVALID; 32];
        let mut next = 0;
        let mut distbits = 5;
        let _ = build_table(
            CodeKind::Dists,
            &dist_lens,
            &mut distfix,
            &mut next,
            &mut distbits,
            &mut work,
        );

        FixedTables {
            lenfix,
            lenbits,
            distfix,
            distbits,
        }
    })
}
