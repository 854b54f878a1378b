//! Decimal formatting with the length known up front.
//!
//! [`count_digits`] and [`write_digits`] are a matched pair: the first says
//! exactly how many bytes the second writes, so numeric attribute values can
//! be formatted into a stack buffer sized once, with no second pass.

/// Longest decimal rendering of a `u64` (`18446744073709551615`).
pub const MAX_DIGITS: usize = 20;
/// Longest decimal rendering of an `i64`, sign included.
pub const MAX_SIGNED_LEN: usize = MAX_DIGITS;

#[inline]
pub const fn count_digits(value: u64) -> usize {
    match value.checked_ilog10() {
        Some(exponent) => exponent as usize + 1,
        None => 1,
    }
}

/// Write `value` in base 10 to the front of `dst`, returning the byte count.
///
/// `dst` must hold at least [`count_digits`]`(value)` bytes.
#[inline]
pub fn write_digits(dst: &mut [u8], value: u64) -> usize {
    let len = count_digits(value);
    let mut rest = value;
    for slot in dst[..len].iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    len
}

#[inline]
pub const fn count_signed(value: i64) -> usize {
    count_digits(value.unsigned_abs()) + (value < 0) as usize
}

/// [`write_digits`] with a leading `-` for negative values.
///
/// `dst` must hold at least [`count_signed`]`(value)` bytes.
#[inline]
pub fn write_signed(dst: &mut [u8], value: i64) -> usize {
    if value < 0 {
        dst[0] = b'-';
        1 + write_digits(&mut dst[1..], value.unsigned_abs())
    } else {
        write_digits(dst, value.unsigned_abs())
    }
}
