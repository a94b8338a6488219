//! Shared helpers for building DEFLATE streams bit by bit
#![allow(dead_code)]

/// Writes a DEFLATE bit stream: fields LSB-first, Huffman codes MSB-first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    filled: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_bit(&mut self, bit: u32) {
        self.cur |= ((bit & 1) as u8) << self.filled;
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.filled = 0;
        }
    }

    /// Write `count` bits of `value`, least significant first
    pub fn bits(&mut self, value: u32, count: u32) {
        for i in 0..count {
            self.push_bit(value >> i);
        }
    }

    /// Write a `len`-bit Huffman code, most significant bit first
    pub fn huff(&mut self, code: u32, len: u32) {
        for i in (0..len).rev() {
            self.push_bit(code >> i);
        }
    }

    /// Pad with zero bits to the next byte boundary
    pub fn align(&mut self) {
        while self.filled != 0 {
            self.push_bit(0);
        }
    }

    /// Append raw bytes; the writer must be byte-aligned
    pub fn raw(&mut self, data: &[u8]) {
        assert_eq!(self.filled, 0, "raw bytes require byte alignment");
        self.bytes.extend_from_slice(data);
    }

    /// Finish the stream, zero-padding the final partial byte
    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.bytes
    }
}

/// Write the fixed-Huffman code for a literal/length symbol
pub fn fixed_litlen(w: &mut BitWriter, sym: u32) {
    match sym {
        0..=143 => w.huff(0x30 + sym, 8),
        144..=255 => w.huff(0x190 + sym - 144, 9),
        256..=279 => w.huff(sym - 256, 7),
        _ => w.huff(0xc0 + sym - 280, 8),
    }
}

/// Write a fixed-Huffman distance code (5 bits, no extra)
pub fn fixed_dist(w: &mut BitWriter, code: u32) {
    w.huff(code, 5);
}

/// Write a stored block: 3-bit header, alignment, LEN/NLEN, payload
pub fn stored_block(w: &mut BitWriter, last: bool, data: &[u8]) {
    w.bits(last as u32, 1);
    w.bits(0, 2);
    w.align();
    let len = data.len() as u32;
    w.bits(len, 16);
    w.bits(!len, 16);
    w.raw(data);
}

/// Compress with flate2's raw-deflate encoder at the given level
pub fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    use std::io::Write;
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::new(level));
    encoder.write_all(data).expect("deflate write");
    encoder.finish().expect("deflate finish")
}
