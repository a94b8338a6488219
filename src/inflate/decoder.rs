//! The resumable block-decoding state machine
//!
//! `inflate` processes as much input and produces as much output as the
//! caller's buffers allow, then returns with the machine parked in a mode
//! it can resume from. Every bit request and every output write is a
//! potential suspension point; sub-state consumed from the accumulator
//! persists, so re-entry with more input or output continues bit-exact.

use super::bits::Scratch;
use super::fast::inflate_fast;
use super::state::{InflateStream, Mode, TableSource};
use super::{FAST_INPUT_MARGIN, FAST_OUTPUT_MARGIN};
use crate::common::{Flush, InflateError, Inflation, Result, Status};
use crate::huffman::{build_table, CodeKind};
use crate::tables::CODE_LENGTH_ORDER;

/// Why the machine stopped running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    NeedInput,
    NeedOutput,
    /// Paused at a block boundary or after a header, per the flush mode
    Boundary,
    StreamEnd,
    Bad,
    Mem,
}

macro_rules! need_bits {
    ($sc:expr, $n:expr) => {
        if $sc.need_bits(($n) as u32).is_err() {
            return Exit::NeedInput;
        }
    };
}

macro_rules! pull_byte {
    ($sc:expr) => {
        if $sc.pull_byte().is_err() {
            return Exit::NeedInput;
        }
    };
}

impl InflateStream {
    /// Advance decompression over the supplied buffers.
    ///
    /// Consumes compressed bytes from `input` and writes decompressed
    /// bytes to `output`, in strict stream order, until one side is
    /// exhausted, the stream ends, or the flush mode asks for an earlier
    /// stop. The returned [`Inflation`] reports how far each buffer was
    /// advanced and why the call returned; the caller passes the unread
    /// remainder of `input` to the next call.
    ///
    /// # Errors
    ///
    /// [`InflateError::Data`] poisons the stream, as does
    /// [`InflateError::Memory`]. [`InflateError::Buffer`] leaves the
    /// stream untouched: it reports that no progress was possible, or that
    /// [`Flush::Finish`] was requested before the final block arrived.
    pub fn inflate(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: Flush,
    ) -> Result<Inflation> {
        // re-entry at a block boundary proceeds into the next block
        if self.mode == Mode::Type {
            self.mode = Mode::TypeDo;
        }

        let mut sc = Scratch::new(input, output, self.hold, self.bits);
        let exit = self.run(&mut sc, flush);
        if exit == Exit::Mem {
            return Err(InflateError::Memory);
        }

        self.hold = sc.hold;
        self.bits = sc.bits;
        let bytes_consumed = sc.in_pos;
        let bytes_written = sc.out_pos;

        if self.window.in_use()
            || (bytes_written > 0
                && self.mode < Mode::Bad
                && (self.mode < Mode::Check || flush != Flush::Finish))
        {
            if self.window.update(&output[..bytes_written]).is_err() {
                self.mode = Mode::Mem;
                return Err(InflateError::Memory);
            }
        }

        self.total_in += bytes_consumed as u64;
        self.total_out += bytes_written as u64;
        self.data_type = self.bits
            + if self.last { 64 } else { 0 }
            + if self.mode == Mode::Type { 128 } else { 0 }
            + if self.mode == Mode::LenStart || self.mode == Mode::CopyStart {
                256
            } else {
                0
            };

        let status = match exit {
            Exit::StreamEnd => {
                return Ok(Inflation {
                    status: Status::StreamEnd,
                    bytes_consumed,
                    bytes_written,
                })
            }
            Exit::Bad => {
                return Err(InflateError::Data(
                    self.msg.unwrap_or("invalid compressed data"),
                ))
            }
            Exit::Mem => return Err(InflateError::Memory),
            Exit::NeedInput => Status::NeedInput,
            Exit::NeedOutput => Status::NeedOutput,
            Exit::Boundary => Status::Ok,
        };
        if (bytes_consumed == 0 && bytes_written == 0) || flush == Flush::Finish {
            return Err(InflateError::Buffer);
        }
        Ok(Inflation {
            status,
            bytes_consumed,
            bytes_written,
        })
    }

    /// Run the machine until it suspends, finishes, or fails
    fn run(&mut self, sc: &mut Scratch<'_>, flush: Flush) -> Exit {
        loop {
            match self.mode {
                Mode::Head => {
                    // raw streams have no header to parse
                    self.mode = Mode::TypeDo;
                }

                Mode::Type => {
                    if flush == Flush::Block || flush == Flush::Trees {
                        return Exit::Boundary;
                    }
                    self.mode = Mode::TypeDo;
                }

                Mode::TypeDo => {
                    if self.last {
                        sc.align_byte();
                        self.mode = Mode::Check;
                        continue;
                    }
                    need_bits!(sc, 3);
                    self.last = sc.peek(1) != 0;
                    sc.drop_bits(1);
                    match sc.peek(2) {
                        0 => self.mode = Mode::Stored,
                        1 => {
                            self.use_fixed_tables();
                            self.mode = Mode::LenStart;
                            if flush == Flush::Trees {
                                sc.drop_bits(2);
                                return Exit::Boundary;
                            }
                        }
                        2 => self.mode = Mode::Table,
                        _ => {
                            self.msg = Some("invalid block type");
                            self.mode = Mode::Bad;
                        }
                    }
                    sc.drop_bits(2);
                }

                Mode::Stored => {
                    sc.align_byte();
                    need_bits!(sc, 32);
                    let len = sc.peek(16);
                    let nlen = ((sc.hold >> 16) & 0xffff) as u32;
                    if len != (nlen ^ 0xffff) {
                        self.msg = Some("invalid stored block lengths");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.length = len as usize;
                    sc.clear_bits();
                    self.mode = Mode::CopyStart;
                    if flush == Flush::Trees {
                        return Exit::Boundary;
                    }
                }

                Mode::CopyStart => {
                    self.mode = Mode::Copy;
                }

                Mode::Copy => {
                    if self.length > 0 {
                        let copy = self.length.min(sc.avail_in()).min(sc.avail_out());
                        if copy == 0 {
                            return if sc.avail_in() == 0 {
                                Exit::NeedInput
                            } else {
                                Exit::NeedOutput
                            };
                        }
                        sc.copy_stored(copy);
                        self.length -= copy;
                    } else {
                        self.mode = Mode::Type;
                    }
                }

                Mode::Table => {
                    need_bits!(sc, 14);
                    self.nlen = sc.peek(5) as usize + 257;
                    sc.drop_bits(5);
                    self.ndist = sc.peek(5) as usize + 1;
                    sc.drop_bits(5);
                    self.ncode = sc.peek(4) as usize + 4;
                    sc.drop_bits(4);
                    if self.nlen > 286 || self.ndist > 30 {
                        self.msg = Some("too many length or distance symbols");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.have = 0;
                    self.mode = Mode::LenLens;
                }

                Mode::LenLens => {
                    while self.have < self.ncode {
                        need_bits!(sc, 3);
                        self.lens[CODE_LENGTH_ORDER[self.have]] = sc.peek(3) as u16;
                        self.have += 1;
                        sc.drop_bits(3);
                    }
                    while self.have < 19 {
                        self.lens[CODE_LENGTH_ORDER[self.have]] = 0;
                        self.have += 1;
                    }
                    self.next = 0;
                    let mut root = 7;
                    if build_table(
                        CodeKind::Codes,
                        &self.lens[..19],
                        &mut self.codes,
                        &mut self.next,
                        &mut root,
                        &mut self.work,
                    )
                    .is_err()
                    {
                        self.msg = Some("invalid code lengths set");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.lencode = TableSource::Pool(0);
                    self.lenbits = root;
                    self.have = 0;
                    self.mode = Mode::CodeLens;
                }

                Mode::CodeLens => {
                    while self.have < self.nlen + self.ndist {
                        let here = loop {
                            let here = self.len_entry(sc.peek(self.lenbits as u32) as usize);
                            if (here.bits as u32) <= sc.bits {
                                break here;
                            }
                            pull_byte!(sc);
                        };
                        if here.val < 16 {
                            sc.drop_bits(here.bits as u32);
                            self.lens[self.have] = here.val;
                            self.have += 1;
                        } else {
                            let (len, copy) = match here.val {
                                16 => {
                                    need_bits!(sc, here.bits as u32 + 2);
                                    sc.drop_bits(here.bits as u32);
                                    if self.have == 0 {
                                        self.msg = Some("invalid bit length repeat");
                                        self.mode = Mode::Bad;
                                        break;
                                    }
                                    let len = self.lens[self.have - 1];
                                    let copy = 3 + sc.peek(2) as usize;
                                    sc.drop_bits(2);
                                    (len, copy)
                                }
                                17 => {
                                    need_bits!(sc, here.bits as u32 + 3);
                                    sc.drop_bits(here.bits as u32);
                                    let copy = 3 + sc.peek(3) as usize;
                                    sc.drop_bits(3);
                                    (0, copy)
                                }
                                _ => {
                                    need_bits!(sc, here.bits as u32 + 7);
                                    sc.drop_bits(here.bits as u32);
                                    let copy = 11 + sc.peek(7) as usize;
                                    sc.drop_bits(7);
                                    (0, copy)
                                }
                            };
                            if self.have + copy > self.nlen + self.ndist {
                                self.msg = Some("invalid bit length repeat");
                                self.mode = Mode::Bad;
                                break;
                            }
                            for _ in 0..copy {
                                self.lens[self.have] = len;
                                self.have += 1;
                            }
                        }
                    }
                    if self.mode == Mode::Bad {
                        continue;
                    }

                    if self.lens[256] == 0 {
                        self.msg = Some("invalid code -- missing end-of-block");
                        self.mode = Mode::Bad;
                        continue;
                    }

                    // build the literal/length table, then the distance
                    // table right after it in the pool
                    self.next = 0;
                    let mut root = 9;
                    if build_table(
                        CodeKind::Lens,
                        &self.lens[..self.nlen],
                        &mut self.codes,
                        &mut self.next,
                        &mut root,
                        &mut self.work,
                    )
                    .is_err()
                    {
                        self.msg = Some("invalid literal/lengths set");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.lencode = TableSource::Pool(0);
                    self.lenbits = root;

                    let dist_table = self.next;
                    let mut dist_root = 6;
                    if build_table(
                        CodeKind::Dists,
                        &self.lens[self.nlen..self.nlen + self.ndist],
                        &mut self.codes,
                        &mut self.next,
                        &mut dist_root,
                        &mut self.work,
                    )
                    .is_err()
                    {
                        self.msg = Some("invalid distances set");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.distcode = TableSource::Pool(dist_table);
                    self.distbits = dist_root;

                    self.mode = Mode::LenStart;
                    if flush == Flush::Trees {
                        return Exit::Boundary;
                    }
                }

                Mode::LenStart => {
                    self.mode = Mode::Len;
                }

                Mode::Len => {
                    if sc.avail_in() >= FAST_INPUT_MARGIN && sc.avail_out() >= FAST_OUTPUT_MARGIN
                    {
                        inflate_fast(self, sc);
                        if self.mode == Mode::Type {
                            self.back = -1;
                        }
                        continue;
                    }
                    self.back = 0;
                    let mut here = loop {
                        let here = self.len_entry(sc.peek(self.lenbits as u32) as usize);
                        if (here.bits as u32) <= sc.bits {
                            break here;
                        }
                        pull_byte!(sc);
                    };
                    if here.op != 0 && here.op & 0xf0 == 0 {
                        // second-level table walk
                        let last = here;
                        here = loop {
                            let idx = last.val as usize
                                + ((sc.peek(last.bits as u32 + last.op as u32) as usize)
                                    >> last.bits);
                            let here = self.len_entry(idx);
                            if (last.bits as u32 + here.bits as u32) <= sc.bits {
                                break here;
                            }
                            pull_byte!(sc);
                        };
                        sc.drop_bits(last.bits as u32);
                        self.back += last.bits as i32;
                    }
                    sc.drop_bits(here.bits as u32);
                    self.back += here.bits as i32;
                    self.length = here.val as usize;
                    if here.op == 0 {
                        self.mode = Mode::Lit;
                        continue;
                    }
                    if here.op & 32 != 0 {
                        self.back = -1;
                        self.mode = Mode::Type;
                        continue;
                    }
                    if here.op & 64 != 0 {
                        self.msg = Some("invalid literal/length code");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.extra = (here.op & 15) as u32;
                    self.mode = Mode::LenExt;
                }

                Mode::LenExt => {
                    if self.extra > 0 {
                        need_bits!(sc, self.extra);
                        self.length += sc.peek(self.extra) as usize;
                        sc.drop_bits(self.extra);
                        self.back += self.extra as i32;
                    }
                    self.mode = Mode::Dist;
                }

                Mode::Dist => {
                    let mut here = loop {
                        let here = self.dist_entry(sc.peek(self.distbits as u32) as usize);
                        if (here.bits as u32) <= sc.bits {
                            break here;
                        }
                        pull_byte!(sc);
                    };
                    if here.op & 0xf0 == 0 {
                        let last = here;
                        here = loop {
                            let idx = last.val as usize
                                + ((sc.peek(last.bits as u32 + last.op as u32) as usize)
                                    >> last.bits);
                            let here = self.dist_entry(idx);
                            if (last.bits as u32 + here.bits as u32) <= sc.bits {
                                break here;
                            }
                            pull_byte!(sc);
                        };
                        sc.drop_bits(last.bits as u32);
                        self.back += last.bits as i32;
                    }
                    sc.drop_bits(here.bits as u32);
                    self.back += here.bits as i32;
                    if here.op & 64 != 0 {
                        self.msg = Some("invalid distance code");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.offset = here.val as usize;
                    self.extra = (here.op & 15) as u32;
                    self.mode = Mode::DistExt;
                }

                Mode::DistExt => {
                    if self.extra > 0 {
                        need_bits!(sc, self.extra);
                        self.offset += sc.peek(self.extra) as usize;
                        sc.drop_bits(self.extra);
                        self.back += self.extra as i32;
                    }
                    if self.offset > self.dmax {
                        self.msg = Some("invalid distance too far back");
                        self.mode = Mode::Bad;
                        continue;
                    }
                    self.mode = Mode::Match;
                }

                Mode::Match => {
                    if sc.avail_out() == 0 {
                        return Exit::NeedOutput;
                    }
                    let written = sc.out_pos;
                    if self.offset > written {
                        // the source starts before this call's output
                        let mut back = self.offset - written;
                        if back > self.window.have {
                            if self.sane {
                                self.msg = Some("invalid distance too far back");
                                self.mode = Mode::Bad;
                                continue;
                            }
                            // zero-fill the bytes the history never held
                            back -= self.window.have;
                            let copy = back.min(self.length).min(sc.avail_out());
                            self.length -= copy;
                            for _ in 0..copy {
                                sc.write(0);
                            }
                            if self.length == 0 {
                                self.mode = Mode::Len;
                            }
                            continue;
                        }
                        let (from, avail) = if back > self.window.next {
                            let wrap = back - self.window.next;
                            (self.window.size() - wrap, wrap)
                        } else {
                            (self.window.next - back, back)
                        };
                        let copy = avail.min(self.length).min(sc.avail_out());
                        self.length -= copy;
                        let win = self.window.as_slice();
                        sc.output[sc.out_pos..sc.out_pos + copy]
                            .copy_from_slice(&win[from..from + copy]);
                        sc.out_pos += copy;
                        if self.length == 0 {
                            self.mode = Mode::Len;
                        }
                    } else {
                        let copy = self.length.min(sc.avail_out());
                        self.length -= copy;
                        let from = sc.out_pos - self.offset;
                        // forward byte copy; source and destination overlap
                        // whenever the distance is shorter than the match
                        for i in 0..copy {
                            sc.output[sc.out_pos + i] = sc.output[from + i];
                        }
                        sc.out_pos += copy;
                        if self.length == 0 {
                            self.mode = Mode::Len;
                        }
                    }
                }

                Mode::Lit => {
                    if sc.avail_out() == 0 {
                        return Exit::NeedOutput;
                    }
                    sc.write(self.length as u8);
                    self.mode = Mode::Len;
                }

                Mode::Check => {
                    // raw streams carry no checksum trailer
                    self.mode = Mode::Done;
                }

                Mode::Done => return Exit::StreamEnd,
                Mode::Bad => return Exit::Bad,
                Mode::Mem => return Exit::Mem,
            }
        }
    }
}
