#![doc = include_str!("../README.md")]
#![deny(unused_must_use)]
#![forbid(unsafe_code)]

pub use utf_scalar;

mod candidate;
mod digits;
mod element;
mod encoded;
pub mod err;
mod name;
mod scratch;
mod script;
mod value;
mod writer;

pub use candidate::{Candidate, StrScalars};
pub use digits::{MAX_DIGITS, MAX_SIGNED_LEN, count_digits, count_signed, write_digits, write_signed};
pub use element::{Attribute, Element};
pub use encoded::Encoded;
pub use err::{RenderError, RenderResult, Result, ValidationError};
pub use name::{AttributeName, ElementName};
pub use scratch::ScratchBuffer;
pub use script::{Script, UNSAFE_SCRIPT_PATTERNS};
pub use value::{AttributeValue, Text};
pub use writer::{HtmlWriter, WriterSettings};
