//! Lossy transcoding between UTF-8 bytes, UTF-16 code units and scalars.
//!
//! None of the decoders fail. Malformed input is dropped unit by unit:
//!
//! - UTF-8: a sequence that breaks off (bad continuation byte, overlong form,
//!   encoded surrogate, value past `U+10FFFF`, or end of input) is skipped up to
//!   the byte that broke it, and decoding restarts *at* that byte. A byte that
//!   can never start a sequence is skipped on its own.
//! - UTF-16: pairs are combined; a high surrogate as the very last unit is
//!   dropped; any other unpaired surrogate is passed through as its own value
//!   so callers that classify scalars can see (and reject) it.
//!
//! The encoders skip values that have no encoding, so
//! `decode(encode(seq)) == seq` for every sequence of scalar values.

use crate::error::TranscodeError;
use crate::scalar::{
    decode_surrogate_pair, encode_surrogate_pair, encode_utf8_into, is_high_surrogate,
    is_low_surrogate, push_utf8, second_byte_range, utf8_len, utf8_sequence_len,
};
use crate::classify::{MAX_CODE_POINT, is_surrogate};
use core::iter::FusedIterator;

/// Borrowing UTF-8 decoder yielding one scalar at a time.
#[derive(Debug, Clone)]
pub struct Utf8Scalars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Scalars<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Utf8Scalars { bytes, pos: 0 }
    }

    /// Rewind to the start of the input.
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    /// The bytes that have not been decoded yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl Iterator for Utf8Scalars<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let lead = *self.bytes.get(self.pos)?;
            let Some(len) = utf8_sequence_len(lead) else {
                self.pos += 1;
                continue;
            };
            if len == 1 {
                self.pos += 1;
                return Some(u32::from(lead));
            }

            let (first_min, first_max) = second_byte_range(lead);
            let mut cp = u32::from(lead & (0x7F >> len));
            let mut idx = self.pos + 1;
            let mut complete = true;

            for offset in 1..len {
                let (min, max) = if offset == 1 {
                    (first_min, first_max)
                } else {
                    (0x80, 0xBF)
                };
                match self.bytes.get(idx) {
                    Some(&byte) if (min..=max).contains(&byte) => {
                        cp = (cp << 6) | u32::from(byte & 0x3F);
                        idx += 1;
                    }
                    _ => {
                        complete = false;
                        break;
                    }
                }
            }

            self.pos = idx;
            if complete {
                return Some(cp);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bytes.len() - self.pos))
    }
}

impl FusedIterator for Utf8Scalars<'_> {}

#[inline(always)]
fn next_utf16(unit_at: impl Fn(usize) -> Option<u16>, pos: &mut usize) -> Option<u32> {
    let unit = unit_at(*pos)?;
    *pos += 1;

    if is_high_surrogate(unit) {
        match unit_at(*pos) {
            Some(lo) if is_low_surrogate(lo) => {
                *pos += 1;
                return Some(decode_surrogate_pair(unit, lo));
            }
            // Lone high surrogate at end of input: drop it.
            None => return None,
            Some(_) => {}
        }
    }

    Some(u32::from(unit))
}

/// Borrowing UTF-16 decoder over native `u16` code units.
#[derive(Debug, Clone)]
pub struct Utf16Scalars<'a> {
    units: &'a [u16],
    pos: usize,
}

impl<'a> Utf16Scalars<'a> {
    pub fn new(units: &'a [u16]) -> Self {
        Utf16Scalars { units, pos: 0 }
    }

    /// Rewind to the start of the input.
    pub fn restart(&mut self) {
        self.pos = 0;
    }
}

impl Iterator for Utf16Scalars<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        let units = self.units;
        next_utf16(|idx| units.get(idx).copied(), &mut self.pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.units.len() - self.pos;
        (remaining.div_ceil(2), Some(remaining))
    }
}

impl FusedIterator for Utf16Scalars<'_> {}

/// Borrowing UTF-16 decoder over little-endian bytes.
///
/// An odd trailing byte is ignored.
#[derive(Debug, Clone)]
pub struct Utf16LeScalars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf16LeScalars<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Utf16LeScalars { bytes, pos: 0 }
    }

    /// Rewind to the start of the input.
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    #[inline(always)]
    fn unit_at(bytes: &[u8], idx: usize) -> Option<u16> {
        let start = idx.checked_mul(2)?;
        let pair = bytes.get(start..start + 2)?;
        Some(u16::from_le_bytes([pair[0], pair[1]]))
    }
}

impl Iterator for Utf16LeScalars<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        let bytes = self.bytes;
        next_utf16(|idx| Self::unit_at(bytes, idx), &mut self.pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bytes.len() / 2).saturating_sub(self.pos);
        (remaining.div_ceil(2), Some(remaining))
    }
}

impl FusedIterator for Utf16LeScalars<'_> {}

/// Decode UTF-8 bytes, skipping malformed sequences.
pub fn decode_utf8(bytes: &[u8]) -> Vec<u32> {
    let mut out = Vec::with_capacity(bytes.len());
    out.extend(Utf8Scalars::new(bytes));
    out
}

/// Decode UTF-16 code units, combining surrogate pairs.
pub fn decode_utf16(units: &[u16]) -> Vec<u32> {
    let mut out = Vec::with_capacity(units.len());
    out.extend(Utf16Scalars::new(units));
    out
}

/// Decode little-endian UTF-16 bytes.
pub fn decode_utf16le(bytes: &[u8]) -> Vec<u32> {
    let mut out = Vec::with_capacity(bytes.len() / 2);
    out.extend(Utf16LeScalars::new(bytes));
    out
}

/// Encode scalars as UTF-8. Surrogates and values past `U+10FFFF` are skipped.
pub fn encode_utf8<I>(scalars: I) -> Vec<u8>
where
    I: IntoIterator<Item = u32>,
{
    let scalars = scalars.into_iter();
    let mut out = Vec::with_capacity(scalars.size_hint().0);
    for cp in scalars {
        push_utf8(cp, &mut out);
    }
    out
}

/// Encode scalars as UTF-16. Surrogates and values past `U+10FFFF` are skipped.
pub fn encode_utf16<I>(scalars: I) -> Vec<u16>
where
    I: IntoIterator<Item = u32>,
{
    let scalars = scalars.into_iter();
    let mut out = Vec::with_capacity(scalars.size_hint().0);
    for cp in scalars {
        if cp > MAX_CODE_POINT || is_surrogate(cp) {
            continue;
        }
        if cp < 0x10000 {
            out.push(cp as u16);
        } else {
            let (hi, lo) = encode_surrogate_pair(cp);
            out.push(hi);
            out.push(lo);
        }
    }
    out
}

/// Exact number of bytes [`switch_utf16_to_8`] writes for `units`.
pub fn utf8_len_of_utf16(units: &[u16]) -> usize {
    Utf16Scalars::new(units).map(utf8_len).sum()
}

/// Convert UTF-16 straight into a caller-provided byte buffer.
///
/// Returns the number of bytes written. If `dst` runs out of room the error
/// reports the full requirement; the bytes written before that point are left
/// in place.
pub fn switch_utf16_to_8(units: &[u16], dst: &mut [u8]) -> Result<usize, TranscodeError> {
    let mut written = 0;
    for cp in Utf16Scalars::new(units) {
        match encode_utf8_into(cp, &mut dst[written..]) {
            Some(len) => written += len,
            None => {
                return Err(TranscodeError::DestinationTooSmall {
                    needed: utf8_len_of_utf16(units),
                    capacity: dst.len(),
                });
            }
        }
    }
    Ok(written)
}
