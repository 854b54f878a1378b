//! Code-point classification.
//!
//! Categories follow the WHATWG Infra definitions. The ASCII range is answered
//! by a 128-entry table built at compile time; everything above it falls
//! through to a handful of range comparisons.

use bitflags::bitflags;

/// Highest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

bitflags! {
    /// Set of syntactic categories a code point belongs to.
    ///
    /// A value never carries a category whose range does not include it: the
    /// set is derived from the code point alone (see [`classify`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u32 {
        /// Any code point in `0..=0x10FFFF` that is not a surrogate.
        const SCALAR_VALUE = 1 << 0;
        /// `U+0000..=U+007F`.
        const ASCII = 1 << 1;
        /// C0 controls plus `U+007F..=U+009F`.
        const CONTROL = 1 << 2;
        /// `U+0000..=U+001F`.
        const C0_CONTROL = 1 << 3;
        /// C0 controls plus `U+0020`.
        const C0_CONTROL_OR_SPACE = 1 << 4;
        /// TAB, LF or CR.
        const ASCII_TAB_OR_NEWLINE = 1 << 5;
        /// TAB, LF, FF, CR or SPACE.
        const ASCII_WHITESPACE = 1 << 6;
        /// `0-9`.
        const ASCII_DIGIT = 1 << 7;
        /// `0-9`, `A-F`.
        const ASCII_UPPER_HEX_DIGIT = 1 << 8;
        /// `0-9`, `a-f`.
        const ASCII_LOWER_HEX_DIGIT = 1 << 9;
        /// `0-9`, `A-F`, `a-f`.
        const ASCII_HEX_DIGIT = 1 << 10;
        /// `A-Z`.
        const ASCII_UPPER_ALPHA = 1 << 11;
        /// `a-z`.
        const ASCII_LOWER_ALPHA = 1 << 12;
        /// `A-Z`, `a-z`.
        const ASCII_ALPHA = 1 << 13;
        /// `0-9`, `A-Z`, `a-z`.
        const ASCII_ALPHANUMERIC = 1 << 14;
        /// `U+D800..=U+DFFF`.
        const SURROGATE = 1 << 15;
        /// One of the 66 permanently unassigned noncharacters.
        const NONCHARACTER = 1 << 16;
    }
}

impl Category {
    /// True for a Unicode scalar value (any non-surrogate code point).
    #[inline]
    pub const fn is_scalar_value(self) -> bool {
        self.contains(Category::SCALAR_VALUE)
    }

    /// True for a control that is not also ASCII whitespace.
    ///
    /// TAB, LF, FF and CR are controls but are routinely allowed where other
    /// controls are not.
    #[inline]
    pub const fn is_non_whitespace_control(self) -> bool {
        self.contains(Category::CONTROL) && !self.contains(Category::ASCII_WHITESPACE)
    }
}

const fn ascii_categories(cp: u32) -> Category {
    let mut bits = Category::SCALAR_VALUE.bits() | Category::ASCII.bits();

    if cp <= 0x1F {
        bits |= Category::C0_CONTROL.bits()
            | Category::C0_CONTROL_OR_SPACE.bits()
            | Category::CONTROL.bits();
    }
    if cp == 0x20 {
        bits |= Category::C0_CONTROL_OR_SPACE.bits();
    }
    if cp == 0x7F {
        bits |= Category::CONTROL.bits();
    }
    if cp == 0x09 || cp == 0x0A || cp == 0x0D {
        bits |= Category::ASCII_TAB_OR_NEWLINE.bits();
    }
    if cp == 0x09 || cp == 0x0A || cp == 0x0C || cp == 0x0D || cp == 0x20 {
        bits |= Category::ASCII_WHITESPACE.bits();
    }

    let digit = cp >= 0x30 && cp <= 0x39;
    let upper = cp >= 0x41 && cp <= 0x5A;
    let lower = cp >= 0x61 && cp <= 0x7A;
    let upper_hex = cp >= 0x41 && cp <= 0x46;
    let lower_hex = cp >= 0x61 && cp <= 0x66;

    if digit {
        bits |= Category::ASCII_DIGIT.bits()
            | Category::ASCII_UPPER_HEX_DIGIT.bits()
            | Category::ASCII_LOWER_HEX_DIGIT.bits()
            | Category::ASCII_HEX_DIGIT.bits()
            | Category::ASCII_ALPHANUMERIC.bits();
    }
    if upper_hex {
        bits |= Category::ASCII_UPPER_HEX_DIGIT.bits() | Category::ASCII_HEX_DIGIT.bits();
    }
    if lower_hex {
        bits |= Category::ASCII_LOWER_HEX_DIGIT.bits() | Category::ASCII_HEX_DIGIT.bits();
    }
    if upper {
        bits |= Category::ASCII_UPPER_ALPHA.bits()
            | Category::ASCII_ALPHA.bits()
            | Category::ASCII_ALPHANUMERIC.bits();
    }
    if lower {
        bits |= Category::ASCII_LOWER_ALPHA.bits()
            | Category::ASCII_ALPHA.bits()
            | Category::ASCII_ALPHANUMERIC.bits();
    }

    Category::from_bits_retain(bits)
}

static ASCII_TABLE: [Category; 128] = {
    let mut table = [Category::empty(); 128];
    let mut cp = 0;
    while cp < 128 {
        table[cp] = ascii_categories(cp as u32);
        cp += 1;
    }
    table
};

/// `U+FDD0..=U+FDEF`, or the last two code points of any plane.
#[inline]
pub const fn is_noncharacter(cp: u32) -> bool {
    (cp >= 0xFDD0 && cp <= 0xFDEF) || (cp <= MAX_CODE_POINT && cp & 0xFFFE == 0xFFFE)
}

#[inline]
pub const fn is_surrogate(cp: u32) -> bool {
    cp >= 0xD800 && cp <= 0xDFFF
}

/// Classify any integer.
///
/// Values outside `0..=0x10FFFF` (negative ones included) belong to no
/// category; surrogates belong to [`Category::SURROGATE`] alone.
#[inline]
pub fn classify(scalar: i64) -> Category {
    if scalar < 0 || scalar > i64::from(MAX_CODE_POINT) {
        return Category::empty();
    }
    classify_code_point(scalar as u32)
}

/// [`classify`] for values already known to be non-negative.
#[inline]
pub fn classify_code_point(cp: u32) -> Category {
    if cp < 0x80 {
        return ASCII_TABLE[cp as usize];
    }
    if cp > MAX_CODE_POINT {
        return Category::empty();
    }
    if is_surrogate(cp) {
        return Category::SURROGATE;
    }

    let mut categories = Category::SCALAR_VALUE;
    if cp <= 0x9F {
        categories |= Category::CONTROL;
    }
    if is_noncharacter(cp) {
        categories |= Category::NONCHARACTER;
    }
    categories
}
