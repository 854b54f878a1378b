//! Untrusted input, seen as a sequence of code points.
//!
//! Validators walk their input more than once (classify first, then emit), so
//! the scalar iterator must be cheap to clone. All of the implementations here
//! borrow the input and decode lazily.

use std::iter::Copied;
use std::slice;
use std::str::Chars;

use utf_scalar::{Utf8Scalars, Utf16LeScalars, Utf16Scalars};

/// Anything a validating constructor accepts.
pub trait Candidate {
    type Scalars: Iterator<Item = u32> + Clone;

    fn scalars(self) -> Self::Scalars;
}

/// Code points of a `&str`.
#[derive(Debug, Clone)]
pub struct StrScalars<'a>(Chars<'a>);

impl Iterator for StrScalars<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.0.next().map(u32::from)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> Candidate for &'a str {
    type Scalars = StrScalars<'a>;

    fn scalars(self) -> Self::Scalars {
        StrScalars(self.chars())
    }
}

impl<'a> Candidate for &'a String {
    type Scalars = StrScalars<'a>;

    fn scalars(self) -> Self::Scalars {
        StrScalars(self.chars())
    }
}

/// UTF-16 code units. Unpaired surrogates reach the validator as surrogate
/// code points.
impl<'a> Candidate for &'a [u16] {
    type Scalars = Utf16Scalars<'a>;

    fn scalars(self) -> Self::Scalars {
        Utf16Scalars::new(self)
    }
}

/// Raw code points, validated as given.
impl<'a> Candidate for &'a [u32] {
    type Scalars = Copied<slice::Iter<'a, u32>>;

    fn scalars(self) -> Self::Scalars {
        self.iter().copied()
    }
}

/// Possibly malformed UTF-8; malformed sequences are skipped.
impl<'a> Candidate for Utf8Scalars<'a> {
    type Scalars = Self;

    fn scalars(self) -> Self::Scalars {
        self
    }
}

impl<'a> Candidate for Utf16Scalars<'a> {
    type Scalars = Self;

    fn scalars(self) -> Self::Scalars {
        self
    }
}

impl<'a> Candidate for Utf16LeScalars<'a> {
    type Scalars = Self;

    fn scalars(self) -> Self::Scalars {
        self
    }
}

/// ASCII case-insensitive search for `needle` in a scalar stream.
///
/// Only ASCII letters fold; every other code point must match exactly.
pub(crate) fn contains_ignore_ascii_case<I>(haystack: I, needle: &[u8]) -> bool
where
    I: Iterator<Item = u32> + Clone,
{
    let mut rest = haystack;
    loop {
        let mut probe = rest.clone();
        if needle
            .iter()
            .all(|&expected| probe.next().is_some_and(|cp| eq_ignore_ascii_case(cp, expected)))
        {
            return true;
        }
        if rest.next().is_none() {
            return false;
        }
    }
}

/// True if the scalars spell `word` (ASCII, compared case-insensitively).
pub(crate) fn equals_ignore_ascii_case<I>(scalars: I, word: &[u8]) -> bool
where
    I: Iterator<Item = u32>,
{
    let mut scalars = scalars;
    word.iter()
        .all(|&expected| scalars.next().is_some_and(|cp| eq_ignore_ascii_case(cp, expected)))
        && scalars.next().is_none()
}

#[inline]
fn eq_ignore_ascii_case(cp: u32, expected: u8) -> bool {
    u8::try_from(cp).is_ok_and(|byte| byte.is_ascii() && byte.eq_ignore_ascii_case(&expected))
}
