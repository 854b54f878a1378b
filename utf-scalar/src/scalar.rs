//! UTF-8 / UTF-16 primitives shared by the decoders and encoders.
//!
//! Everything here works on single code points or code units; the looping
//! lives in [`crate::transcode`].

use crate::classify::{MAX_CODE_POINT, is_surrogate};

#[inline(always)]
pub const fn is_high_surrogate(code_unit: u16) -> bool {
    code_unit >= 0xD800 && code_unit <= 0xDBFF
}

#[inline(always)]
pub const fn is_low_surrogate(code_unit: u16) -> bool {
    code_unit >= 0xDC00 && code_unit <= 0xDFFF
}

#[inline(always)]
pub const fn decode_surrogate_pair(hi: u16, lo: u16) -> u32 {
    let hi = (hi as u32) - 0xD800;
    let lo = (lo as u32) - 0xDC00;
    0x10000 + ((hi << 10) | lo)
}

/// Split a supplementary-plane code point into its high/low surrogates.
#[inline(always)]
pub const fn encode_surrogate_pair(cp: u32) -> (u16, u16) {
    let offset = cp - 0x10000;
    (
        0xD800 | ((offset >> 10) as u16),
        0xDC00 | ((offset & 0x3FF) as u16),
    )
}

/// Number of UTF-8 bytes needed for `cp`.
///
/// Zero for anything without a UTF-8 encoding: surrogates and values above
/// `U+10FFFF`.
#[inline]
pub const fn utf8_len(cp: u32) -> usize {
    if cp < 0x80 {
        1
    } else if cp < 0x800 {
        2
    } else if cp < 0x10000 {
        if is_surrogate(cp) { 0 } else { 3 }
    } else if cp <= MAX_CODE_POINT {
        4
    } else {
        0
    }
}

/// Encode `cp` into the front of `dst`, returning the number of bytes written.
///
/// Returns `None` when `dst` is shorter than [`utf8_len`]; nothing is written
/// in that case. Values without an encoding write nothing and return
/// `Some(0)`.
#[inline]
pub fn encode_utf8_into(cp: u32, dst: &mut [u8]) -> Option<usize> {
    let len = utf8_len(cp);
    let out = dst.get_mut(..len)?;
    match len {
        0 => {}
        1 => out[0] = cp as u8,
        2 => {
            out[0] = 0xC0 | (cp >> 6) as u8;
            out[1] = 0x80 | (cp & 0x3F) as u8;
        }
        3 => {
            out[0] = 0xE0 | (cp >> 12) as u8;
            out[1] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[2] = 0x80 | (cp & 0x3F) as u8;
        }
        _ => {
            out[0] = 0xF0 | (cp >> 18) as u8;
            out[1] = 0x80 | ((cp >> 12) & 0x3F) as u8;
            out[2] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[3] = 0x80 | (cp & 0x3F) as u8;
        }
    }
    Some(len)
}

/// Append the UTF-8 encoding of `cp` to `out`.
#[inline]
pub fn push_utf8(cp: u32, out: &mut Vec<u8>) {
    let mut buf = [0u8; 4];
    if let Some(len) = encode_utf8_into(cp, &mut buf) {
        out.extend_from_slice(&buf[..len]);
    }
}

/// Expected sequence length for a UTF-8 lead byte, or `None` if `byte` can't
/// start a sequence.
#[inline(always)]
pub(crate) const fn utf8_sequence_len(byte: u8) -> Option<usize> {
    match byte {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Valid range for the byte following `lead`.
///
/// Narrower than `0x80..=0xBF` after leads that would otherwise permit
/// overlong forms, encoded surrogates, or values past `U+10FFFF`.
#[inline(always)]
pub(crate) const fn second_byte_range(lead: u8) -> (u8, u8) {
    match lead {
        0xE0 => (0xA0, 0xBF),
        0xED => (0x80, 0x9F),
        0xF0 => (0x90, 0xBF),
        0xF4 => (0x80, 0x8F),
        _ => (0x80, 0xBF),
    }
}
