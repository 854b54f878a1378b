//! Attribute values and text content.
//!
//! Unlike names, neither type can fail to validate: anything that would break
//! out of its context is escaped (attribute values) or escaped and dropped
//! (text). Their default state means "absent" and renders as nothing.

use std::fmt;
use std::sync::Arc;

use log::trace;
use utf_scalar::{Category, classify_code_point, utf8_len};

use crate::candidate::Candidate;
use crate::digits::{MAX_SIGNED_LEN, count_digits, count_signed, write_digits, write_signed};
use crate::encoded::Encoded;
use crate::err::Result;
use crate::scratch::ScratchBuffer;

const AMP: &[u8] = b"&amp;";
const QUOT: &[u8] = b"&quot;";
const LT: &[u8] = b"&lt;";

/// The `=value` part of an attribute, quoted only when it has to be.
///
/// Three states are kept apart:
/// - absent (the default): renders as nothing, so the attribute is a bare name;
/// - empty: renders as `=""`;
/// - anything else: `=value` or `="value"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeValue {
    bytes: Option<Arc<[u8]>>,
}

/// Forces the quoted form anywhere in the value.
fn needs_quotes(cp: u32) -> bool {
    matches!(
        u8::try_from(cp),
        Ok(b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
    ) || classify_code_point(cp).contains(Category::ASCII_WHITESPACE)
}

impl AttributeValue {
    pub fn new(candidate: impl Candidate) -> Self {
        let scalars = candidate.scalars();

        // First pass decides quoting, which applies to the whole value, and
        // sizes the scratch exactly. Scalars with no UTF-8 form emit nothing
        // and do not count, so a value made only of them is still `=""`.
        let mut quoted = false;
        let mut count = 0;
        let mut expansion = 0;
        for cp in scalars.clone().filter(|&cp| utf8_len(cp) > 0) {
            count += utf8_len(cp);
            quoted |= needs_quotes(cp);
            if cp == u32::from(b'&') {
                expansion += AMP.len() - 1;
            } else if cp == u32::from(b'"') {
                expansion += QUOT.len() - 1;
            }
        }
        if count == 0 {
            return AttributeValue::empty();
        }

        let mut scratch = ScratchBuffer::with_capacity(3 + count + expansion);
        if quoted {
            scratch.append(b"=\"");
            for cp in scalars {
                match u8::try_from(cp) {
                    Ok(b'&') => scratch.append(AMP),
                    Ok(b'"') => scratch.append(QUOT),
                    _ => scratch.push_scalar(cp),
                }
            }
            scratch.push(b'"');
        } else {
            scratch.push(b'=');
            for cp in scalars {
                if cp == u32::from(b'&') {
                    scratch.append(AMP);
                } else {
                    scratch.push_scalar(cp);
                }
            }
        }

        let bytes = scratch.freeze();
        trace!("validated attribute value `{}`", String::from_utf8_lossy(&bytes));
        AttributeValue { bytes: Some(bytes) }
    }

    /// An explicitly empty value: `=""`.
    pub fn empty() -> Self {
        AttributeValue {
            bytes: Some(Arc::from(&b"=\"\""[..])),
        }
    }

    /// No value at all; the attribute renders as its bare name.
    pub fn absent() -> Self {
        AttributeValue::default()
    }

    pub fn is_absent(&self) -> bool {
        self.bytes.is_none()
    }

    fn from_unsigned(value: u64) -> Self {
        let mut buf = [0u8; 1 + MAX_SIGNED_LEN];
        buf[0] = b'=';
        let len = 1 + count_digits(value);
        write_digits(&mut buf[1..len], value);
        AttributeValue {
            bytes: Some(Arc::from(&buf[..len])),
        }
    }

    fn from_signed(value: i64) -> Self {
        let mut buf = [0u8; 1 + MAX_SIGNED_LEN];
        buf[0] = b'=';
        let len = 1 + count_signed(value);
        write_signed(&mut buf[1..len], value);
        AttributeValue {
            bytes: Some(Arc::from(&buf[..len])),
        }
    }
}

impl Encoded for AttributeValue {
    fn encoded(&self) -> Result<&[u8]> {
        Ok(self.bytes.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(
            self.bytes.as_deref().unwrap_or_default(),
        ))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::new(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::from_signed(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::from_signed(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::from_unsigned(u64::from(value))
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::from_unsigned(value)
    }
}

/// Escaped character data.
///
/// Surrogates, noncharacters and controls other than ASCII whitespace are
/// dropped rather than rejected: text tolerates junk, names do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text {
    bytes: Option<Arc<[u8]>>,
}

fn dropped_from_text(categories: Category) -> bool {
    categories.is_empty()
        || categories.intersects(Category::SURROGATE | Category::NONCHARACTER)
        || categories.is_non_whitespace_control()
}

impl Text {
    pub fn new(candidate: impl Candidate) -> Self {
        let scalars = candidate.scalars();
        let mut scratch = ScratchBuffer::with_capacity(scalars.size_hint().0);
        let mut dropped = 0usize;

        for cp in scalars {
            if dropped_from_text(classify_code_point(cp)) {
                dropped += 1;
                continue;
            }
            match u8::try_from(cp) {
                Ok(b'&') => scratch.append(AMP),
                Ok(b'<') => scratch.append(LT),
                _ => scratch.push_scalar(cp),
            }
        }

        if dropped > 0 {
            trace!("dropped {dropped} code point(s) not allowed in text");
        }
        if scratch.is_empty() {
            return Text::default();
        }
        Text {
            bytes: Some(scratch.freeze()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_none()
    }
}

impl Encoded for Text {
    fn encoded(&self) -> Result<&[u8]> {
        Ok(self.bytes.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(
            self.bytes.as_deref().unwrap_or_default(),
        ))
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::new(value)
    }
}
