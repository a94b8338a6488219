//! Fast decoding loop for large buffer margins
//!
//! When at least 6 input bytes and 258 output bytes remain, no
//! literal/length/distance triple can suspend mid-symbol, so symbol
//! decoding and match copying run inline on local mirrors of the
//! accumulator without mode transitions. The loop stops on end of block,
//! when either margin runs out, or on a malformed code, and must be
//! observationally identical to the one-symbol-at-a-time path.

use super::bits::Scratch;
use super::state::{InflateStream, Mode, TableSource};
use crate::huffman::Code;
use crate::tables::fixed_tables;

enum Outcome {
    EndOfBlock,
    Bad(&'static str),
}

/// Decode until the input or output margin is too small to guarantee a
/// whole symbol, updating `sc` and the stream mode on block end or error.
pub(crate) fn inflate_fast(state: &mut InflateStream, sc: &mut Scratch<'_>) {
    let input = sc.input;
    let output = &mut *sc.output;
    // a length/distance pair consumes at most 48 bits, so one symbol can
    // pull at most 6 bytes; 258 output bytes bound the longest match
    let in_limit = input.len() - 5;
    let out_limit = output.len() - 257;

    let mut in_pos = sc.in_pos;
    let mut out_pos = sc.out_pos;
    let mut hold = sc.hold;
    let mut bits = sc.bits;

    let win = state.window.as_slice();
    let wsize = state.window.size();
    let whave = state.window.have;
    let wnext = state.window.next;
    let lcode: &[Code] = match state.lencode {
        TableSource::Fixed => &fixed_tables().lenfix,
        TableSource::Pool(off) => &state.codes[off..],
    };
    let dcode: &[Code] = match state.distcode {
        TableSource::Fixed => &fixed_tables().distfix,
        TableSource::Pool(off) => &state.codes[off..],
    };
    let lmask = (1u64 << state.lenbits) - 1;
    let dmask = (1u64 << state.distbits) - 1;
    let sane = state.sane;
    let dmax = state.dmax;

    let mut outcome = None;

    'main: while in_pos < in_limit && out_pos < out_limit {
        if bits < 15 {
            hold += (input[in_pos] as u64) << bits;
            in_pos += 1;
            bits += 8;
            hold += (input[in_pos] as u64) << bits;
            in_pos += 1;
            bits += 8;
        }
        let mut here = lcode[(hold & lmask) as usize];
        'dolen: loop {
            hold >>= here.bits;
            bits -= here.bits as u32;
            let op = here.op;
            if op == 0 {
                output[out_pos] = here.val as u8;
                out_pos += 1;
                break 'dolen;
            }
            if op & 16 != 0 {
                // length base plus extra bits
                let mut len = here.val as usize;
                let extra = (op & 15) as u32;
                if extra != 0 {
                    if bits < extra {
                        hold += (input[in_pos] as u64) << bits;
                        in_pos += 1;
                        bits += 8;
                    }
                    len += (hold as u32 & ((1u32 << extra) - 1)) as usize;
                    hold >>= extra;
                    bits -= extra;
                }
                if bits < 15 {
                    hold += (input[in_pos] as u64) << bits;
                    in_pos += 1;
                    bits += 8;
                    hold += (input[in_pos] as u64) << bits;
                    in_pos += 1;
                    bits += 8;
                }
                let mut dhere = dcode[(hold & dmask) as usize];
                'dodist: loop {
                    hold >>= dhere.bits;
                    bits -= dhere.bits as u32;
                    let dop = dhere.op;
                    if dop & 16 != 0 {
                        // distance base plus extra bits
                        let mut dist = dhere.val as usize;
                        let extra = (dop & 15) as u32;
                        if bits < extra {
                            hold += (input[in_pos] as u64) << bits;
                            in_pos += 1;
                            bits += 8;
                            if bits < extra {
                                hold += (input[in_pos] as u64) << bits;
                                in_pos += 1;
                                bits += 8;
                            }
                        }
                        dist += (hold as u32 & ((1u32 << extra) - 1)) as usize;
                        if dist > dmax {
                            outcome = Some(Outcome::Bad("invalid distance too far back"));
                            break 'main;
                        }
                        hold >>= extra;
                        bits -= extra;

                        if dist > out_pos {
                            // source starts before this call's output
                            let mut op_w = dist - out_pos;
                            if op_w > whave {
                                if sane {
                                    outcome =
                                        Some(Outcome::Bad("invalid distance too far back"));
                                    break 'main;
                                }
                                // zero-fill the bytes the history never held
                                if len <= op_w - whave {
                                    for _ in 0..len {
                                        output[out_pos] = 0;
                                        out_pos += 1;
                                    }
                                    break 'dolen;
                                }
                                len -= op_w - whave;
                                while op_w > whave {
                                    output[out_pos] = 0;
                                    out_pos += 1;
                                    op_w -= 1;
                                }
                                if op_w == 0 {
                                    copy_within_output(output, &mut out_pos, dist, len);
                                    break 'dolen;
                                }
                            }
                            if wnext == 0 {
                                let from = wsize - op_w;
                                if op_w < len {
                                    // some from the window, rest from output
                                    len -= op_w;
                                    copy_from_window(output, &mut out_pos, win, from, op_w);
                                    copy_within_output(output, &mut out_pos, dist, len);
                                } else {
                                    copy_from_window(output, &mut out_pos, win, from, len);
                                }
                            } else if wnext < op_w {
                                // history wraps the end of the circular buffer
                                let from = wsize + wnext - op_w;
                                let tail = op_w - wnext;
                                if tail < len {
                                    len -= tail;
                                    copy_from_window(output, &mut out_pos, win, from, tail);
                                    if wnext < len {
                                        len -= wnext;
                                        copy_from_window(output, &mut out_pos, win, 0, wnext);
                                        copy_within_output(output, &mut out_pos, dist, len);
                                    } else {
                                        copy_from_window(output, &mut out_pos, win, 0, len);
                                    }
                                } else {
                                    copy_from_window(output, &mut out_pos, win, from, len);
                                }
                            } else {
                                let from = wnext - op_w;
                                if op_w < len {
                                    len -= op_w;
                                    copy_from_window(output, &mut out_pos, win, from, op_w);
                                    copy_within_output(output, &mut out_pos, dist, len);
                                } else {
                                    copy_from_window(output, &mut out_pos, win, from, len);
                                }
                            }
                        } else {
                            copy_within_output(output, &mut out_pos, dist, len);
                        }
                        break 'dolen;
                    }
                    if dop & 64 == 0 {
                        // second-level distance table
                        dhere = dcode[dhere.val as usize
                            + (hold as u32 & ((1u32 << dop) - 1)) as usize];
                        continue 'dodist;
                    }
                    outcome = Some(Outcome::Bad("invalid distance code"));
                    break 'main;
                }
            }
            if op & 64 == 0 {
                // second-level literal/length table
                here = lcode[here.val as usize + (hold as u32 & ((1u32 << op) - 1)) as usize];
                continue 'dolen;
            }
            if op & 32 != 0 {
                outcome = Some(Outcome::EndOfBlock);
                break 'main;
            }
            outcome = Some(Outcome::Bad("invalid literal/length code"));
            break 'main;
        }
    }

    // return unused whole bytes from the accumulator to the input cursor
    let unused = (bits >> 3) as usize;
    in_pos -= unused;
    bits -= (unused as u32) << 3;
    hold &= (1u64 << bits) - 1;

    sc.in_pos = in_pos;
    sc.out_pos = out_pos;
    sc.hold = hold;
    sc.bits = bits;

    match outcome {
        Some(Outcome::EndOfBlock) => state.mode = Mode::Type,
        Some(Outcome::Bad(msg)) => {
            state.msg = Some(msg);
            state.mode = Mode::Bad;
        }
        None => {}
    }
}

fn copy_from_window(output: &mut [u8], out_pos: &mut usize, win: &[u8], from: usize, n: usize) {
    output[*out_pos..*out_pos + n].copy_from_slice(&win[from..from + n]);
    *out_pos += n;
}

/// Forward byte copy; source and destination overlap whenever the distance
/// is shorter than the match
fn copy_within_output(output: &mut [u8], out_pos: &mut usize, dist: usize, n: usize) {
    let from = *out_pos - dist;
    for i in 0..n {
        output[*out_pos + i] = output[from + i];
    }
    *out_pos += n;
}
