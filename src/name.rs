//! Element and attribute names.
//!
//! Both name types share one policy for the default (never validated) state:
//! reading it is an error. A name is never optional; an attribute with no
//! value is expressed through [`crate::AttributeValue`] instead.

use std::str::FromStr;
use std::sync::Arc;

use log::{debug, trace};
use utf_scalar::{Category, classify_code_point};

use crate::candidate::{Candidate, equals_ignore_ascii_case};
use crate::encoded::Encoded;
use crate::err::{Result, ValidationError};
use crate::scratch::ScratchBuffer;

const ELEMENT_NAME: &str = "element name";
const ATTRIBUTE_NAME: &str = "attribute name";

/// A tag name: an ASCII letter followed by ASCII letters and digits.
///
/// `script` is refused here; scripts carry their own body checks and are
/// built through [`crate::Script`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementName {
    bytes: Option<Arc<[u8]>>,
}

impl ElementName {
    pub fn new(candidate: impl Candidate) -> Result<Self> {
        let scalars = candidate.scalars();
        let mut iter = scalars.clone().enumerate();

        let Some((_, first)) = iter.next() else {
            debug!("rejected empty {ELEMENT_NAME}");
            return Err(ValidationError::EmptyInput { what: ELEMENT_NAME });
        };
        if !classify_code_point(first).contains(Category::ASCII_ALPHA) {
            debug!("rejected {ELEMENT_NAME} starting with U+{first:04X}");
            return Err(ValidationError::InvalidLeadingCharacter {
                what: ELEMENT_NAME,
                scalar: first,
            });
        }
        for (position, cp) in iter {
            if !classify_code_point(cp).contains(Category::ASCII_ALPHANUMERIC) {
                debug!("rejected {ELEMENT_NAME} containing U+{cp:04X} at {position}");
                return Err(ValidationError::InvalidCharacter {
                    what: ELEMENT_NAME,
                    scalar: cp,
                    position,
                });
            }
        }
        if equals_ignore_ascii_case(scalars.clone(), b"script") {
            return Err(ValidationError::ReservedName {
                name: "script",
                hint: "build script elements with `Script::inline` or `Script::file`",
            });
        }

        let mut scratch = ScratchBuffer::with_capacity(scalars.size_hint().0);
        for cp in scalars {
            scratch.push_scalar(cp);
        }
        let bytes = scratch.freeze();
        trace!("validated {ELEMENT_NAME} `{}`", String::from_utf8_lossy(&bytes));

        Ok(ElementName { bytes: Some(bytes) })
    }

    pub fn is_initialized(&self) -> bool {
        self.bytes.is_some()
    }
}

impl Encoded for ElementName {
    fn encoded(&self) -> Result<&[u8]> {
        self.bytes
            .as_deref()
            .ok_or(ValidationError::UninitializedUse { what: ELEMENT_NAME })
    }
}

impl FromStr for ElementName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        ElementName::new(s)
    }
}

/// An attribute name, stored with a leading space so it can be appended
/// directly after a tag name or a previous attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeName {
    bytes: Option<Arc<[u8]>>,
}

impl AttributeName {
    pub fn new(candidate: impl Candidate) -> Result<Self> {
        let scalars = candidate.scalars();

        let mut ampersands = 0;
        let mut count = 0;
        for (position, cp) in scalars.clone().enumerate() {
            count += 1;
            if is_forbidden_in_attribute_name(cp) {
                debug!("rejected {ATTRIBUTE_NAME} containing U+{cp:04X} at {position}");
                return Err(ValidationError::InvalidCharacter {
                    what: ATTRIBUTE_NAME,
                    scalar: cp,
                    position,
                });
            }
            if cp == u32::from(b'&') {
                ampersands += 1;
            }
        }
        if count == 0 {
            debug!("rejected empty {ATTRIBUTE_NAME}");
            return Err(ValidationError::EmptyInput {
                what: ATTRIBUTE_NAME,
            });
        }

        let mut scratch = ScratchBuffer::with_capacity(1 + count + ampersands * 4);
        scratch.push(b' ');
        for cp in scalars {
            if cp == u32::from(b'&') {
                scratch.append(b"&amp;");
            } else {
                scratch.push_scalar(cp);
            }
        }
        let bytes = scratch.freeze();
        trace!("validated {ATTRIBUTE_NAME} `{}`", String::from_utf8_lossy(&bytes[1..]));

        Ok(AttributeName { bytes: Some(bytes) })
    }

    pub fn is_initialized(&self) -> bool {
        self.bytes.is_some()
    }
}

impl Encoded for AttributeName {
    fn encoded(&self) -> Result<&[u8]> {
        self.bytes
            .as_deref()
            .ok_or(ValidationError::UninitializedUse {
                what: ATTRIBUTE_NAME,
            })
    }
}

impl FromStr for AttributeName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        AttributeName::new(s)
    }
}

fn is_forbidden_in_attribute_name(cp: u32) -> bool {
    let categories = classify_code_point(cp);
    categories.is_empty()
        || categories.intersects(
            Category::SURROGATE | Category::CONTROL | Category::ASCII_WHITESPACE,
        )
        || matches!(u8::try_from(cp), Ok(b'"' | b'\'' | b'>' | b'/' | b'='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_name_accepts_alphanumerics() {
        for name in ["html", "a", "h1", "DIV", "x2y3"] {
            let validated = ElementName::new(name).unwrap();
            assert_eq!(validated.encoded().unwrap(), name.as_bytes());
        }
    }

    #[test]
    fn test_element_name_errors() {
        assert_eq!(
            ElementName::new(""),
            Err(ValidationError::EmptyInput { what: ELEMENT_NAME })
        );
        assert_eq!(
            ElementName::new("1a"),
            Err(ValidationError::InvalidLeadingCharacter {
                what: ELEMENT_NAME,
                scalar: u32::from('1'),
            })
        );
        assert_eq!(
            ElementName::new("a-b"),
            Err(ValidationError::InvalidCharacter {
                what: ELEMENT_NAME,
                scalar: u32::from('-'),
                position: 1,
            })
        );
        assert!(matches!(
            ElementName::new("ScRiPt"),
            Err(ValidationError::ReservedName { name: "script", .. })
        ));
    }

    #[test]
    fn test_element_name_from_utf16_and_scalars() {
        let units: Vec<u16> = "section".encode_utf16().collect();
        assert_eq!(
            ElementName::new(units.as_slice()).unwrap(),
            ElementName::new("section").unwrap()
        );
        let raw: &[u32] = &[0x70];
        assert_eq!(ElementName::new(raw).unwrap().encoded().unwrap(), b"p");
    }

    #[test]
    fn test_default_names_are_uninitialized() {
        assert_eq!(
            ElementName::default().encoded(),
            Err(ValidationError::UninitializedUse { what: ELEMENT_NAME })
        );
        assert_eq!(
            AttributeName::default().encoded(),
            Err(ValidationError::UninitializedUse {
                what: ATTRIBUTE_NAME
            })
        );
        assert!(!AttributeName::default().is_initialized());
    }

    #[test]
    fn test_attribute_name_is_prefixed_and_escaped() {
        assert_eq!(AttributeName::new("lang").unwrap().encoded().unwrap(), b" lang");
        assert_eq!(
            AttributeName::new("data-a&b").unwrap().encoded().unwrap(),
            b" data-a&amp;b"
        );
        assert_eq!(
            AttributeName::new("\u{E9}t\u{E9}").unwrap().encoded_str().unwrap(),
            " \u{E9}t\u{E9}"
        );
    }

    #[test]
    fn test_attribute_name_allows_noncharacters() {
        assert_eq!(
            AttributeName::new("\u{FDD0}").unwrap().encoded_str().unwrap(),
            " \u{FDD0}"
        );
        assert!(AttributeName::new("x\u{FFFF}").is_ok());
    }

    #[test]
    fn test_attribute_name_rejections() {
        for (candidate, bad) in [
            ("a b", ' '),
            ("a\"", '"'),
            ("'", '\''),
            ("a>", '>'),
            ("a/", '/'),
            ("a=", '='),
            ("a\tb", '\t'),
            ("a\u{7F}", '\u{7F}'),
            ("a\u{9F}", '\u{9F}'),
        ] {
            match AttributeName::new(candidate) {
                Err(ValidationError::InvalidCharacter { scalar, .. }) => {
                    assert_eq!(scalar, u32::from(bad), "{candidate:?}")
                }
                other => panic!("{candidate:?} should be rejected, got {other:?}"),
            }
        }
        assert_eq!(
            AttributeName::new(""),
            Err(ValidationError::EmptyInput {
                what: ATTRIBUTE_NAME
            })
        );
        let lone: &[u16] = &[0x61, 0xD800, 0x62];
        assert!(matches!(
            AttributeName::new(lone),
            Err(ValidationError::InvalidCharacter { scalar: 0xD800, position: 1, .. })
        ));
    }
}
