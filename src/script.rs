//! `<script>` elements.
//!
//! A script body is raw text to the HTML tokenizer: nothing inside it is
//! escaped, so the only defense is to refuse bodies that could end the element
//! early or switch the tokenizer into an escaped state. The match is ASCII
//! case-insensitive and finds the patterns anywhere in the body.

use std::sync::Arc;

use log::{debug, trace};
use utf_scalar::utf8_len;

use crate::candidate::{Candidate, contains_ignore_ascii_case};
use crate::element::Attribute;
use crate::encoded::Encoded;
use crate::err::{RenderResult, Result, ValidationError};
use crate::scratch::ScratchBuffer;
use crate::value::AttributeValue;

/// Substrings that are never allowed in an inline script body.
pub const UNSAFE_SCRIPT_PATTERNS: [&str; 3] = ["<!--", "<script", "</script"];

const OPEN: &[u8] = b"<script";
const CLOSE: &[u8] = b"</script>";

/// A script element, stored as everything between `<script` and `</script>`:
/// the attributes, the closing `>` of the start tag, then the body (if any).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    bytes: Option<Arc<[u8]>>,
}

fn push_attributes(scratch: &mut ScratchBuffer, attributes: &[Attribute]) -> Result<()> {
    for attribute in attributes {
        scratch.append(attribute.encoded()?);
    }
    Ok(())
}

impl Script {
    /// A script whose body is `body`, emitted verbatim.
    pub fn inline(body: impl Candidate, attributes: &[Attribute]) -> Result<Self> {
        let scalars = body.scalars();

        // A scalar with no UTF-8 form would vanish from the output and could
        // join two halves of a blocked pattern, so it is refused outright.
        if let Some((position, scalar)) = scalars
            .clone()
            .enumerate()
            .find(|&(_, cp)| utf8_len(cp) == 0)
        {
            debug!("rejected script body containing U+{scalar:04X} at {position}");
            return Err(ValidationError::InvalidCharacter {
                what: "script body",
                scalar,
                position,
            });
        }

        for pattern in UNSAFE_SCRIPT_PATTERNS {
            if contains_ignore_ascii_case(scalars.clone(), pattern.as_bytes()) {
                debug!("rejected script body containing `{pattern}`");
                return Err(ValidationError::UnsafeScriptContent { pattern });
            }
        }

        let mut scratch = ScratchBuffer::with_capacity(1 + scalars.size_hint().0);
        push_attributes(&mut scratch, attributes)?;
        scratch.push(b'>');
        for cp in scalars {
            scratch.push_scalar(cp);
        }

        let bytes = scratch.freeze();
        trace!("validated inline script of {} bytes", bytes.len());
        Ok(Script { bytes: Some(bytes) })
    }

    /// A script loaded from `src`, with an empty body.
    pub fn file(src: impl Candidate, attributes: &[Attribute]) -> Result<Self> {
        let src = AttributeValue::new(src);
        let src_bytes = src.encoded()?;

        let mut scratch = ScratchBuffer::with_capacity(5 + src_bytes.len());
        scratch.append(b" src");
        scratch.append(src_bytes);
        push_attributes(&mut scratch, attributes)?;
        scratch.push(b'>');

        let bytes = scratch.freeze();
        trace!("validated script file reference `{}`", String::from_utf8_lossy(&bytes));
        Ok(Script { bytes: Some(bytes) })
    }

    /// Stream the complete element, `<script ...>...</script>`.
    pub fn render_to<W: std::io::Write>(&self, writer: &mut W) -> RenderResult<()> {
        let bytes = self.encoded()?;
        writer.write_all(OPEN)?;
        writer.write_all(bytes)?;
        writer.write_all(CLOSE)?;
        Ok(())
    }

    /// The complete element as a string.
    pub fn to_html(&self) -> Result<String> {
        let bytes = self.encoded()?;
        let mut html = String::with_capacity(OPEN.len() + bytes.len() + CLOSE.len());
        html.push_str("<script");
        html.push_str(&String::from_utf8_lossy(bytes));
        html.push_str("</script>");
        Ok(html)
    }
}

impl Encoded for Script {
    fn encoded(&self) -> Result<&[u8]> {
        self.bytes
            .as_deref()
            .ok_or(ValidationError::UninitializedUse { what: "script" })
    }
}
