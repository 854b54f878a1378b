use std::borrow::Cow;
use std::sync::Arc;

use log::trace;

use crate::candidate::Candidate;
use crate::encoded::Encoded;
use crate::err::{Result, ValidationError};
use crate::name::{AttributeName, ElementName};
use crate::scratch::ScratchBuffer;
use crate::value::AttributeValue;

/// A validated name/value pair, pre-joined into ` name=value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: AttributeName,
    value: AttributeValue,
    bytes: Arc<[u8]>,
}

impl Attribute {
    /// Join an already validated name and value.
    ///
    /// An absent value contributes nothing, leaving a bare attribute name.
    pub fn new(name: AttributeName, value: AttributeValue) -> Result<Self> {
        let name_bytes = name.encoded()?;
        let value_bytes = value.encoded()?;

        let mut scratch = ScratchBuffer::with_capacity(name_bytes.len() + value_bytes.len());
        scratch.append(name_bytes);
        scratch.append(value_bytes);
        let bytes = scratch.freeze();

        Ok(Attribute { name, value, bytes })
    }

    /// Validate both halves from raw input.
    pub fn parse(name: impl Candidate, value: impl Candidate) -> Result<Self> {
        Attribute::new(AttributeName::new(name)?, AttributeValue::new(value))
    }

    /// A valueless attribute such as `disabled`.
    pub fn bare(name: impl Candidate) -> Result<Self> {
        Attribute::new(AttributeName::new(name)?, AttributeValue::absent())
    }

    pub fn name(&self) -> &AttributeName {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }
}

impl Encoded for Attribute {
    fn encoded(&self) -> Result<&[u8]> {
        Ok(&self.bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Tags {
    start: Arc<[u8]>,
    end: Arc<[u8]>,
}

/// An element with its start and end tags computed once, attributes included.
///
/// The default value has no tags: reading them is an error, since an element
/// without a validated name is a programming mistake rather than "no element".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Element {
    tags: Option<Tags>,
}

impl Element {
    pub fn new(name: &ElementName, attributes: &[Attribute]) -> Result<Self> {
        let name_bytes = name.encoded()?;
        let attributes_len: usize = attributes.iter().map(|attr| attr.bytes.len()).sum();

        let mut start = ScratchBuffer::with_capacity(2 + name_bytes.len() + attributes_len);
        start.push(b'<');
        start.append(name_bytes);
        for attribute in attributes {
            start.append(&attribute.bytes);
        }
        start.push(b'>');

        let mut end = ScratchBuffer::with_capacity(3 + name_bytes.len());
        end.append(b"</");
        end.append(name_bytes);
        end.push(b'>');

        let tags = Tags {
            start: start.freeze(),
            end: end.freeze(),
        };
        trace!(
            "built element {} with {} attribute(s)",
            String::from_utf8_lossy(&tags.start),
            attributes.len()
        );

        Ok(Element { tags: Some(tags) })
    }

    /// Validate the name from raw input, then build.
    pub fn parse(name: impl Candidate, attributes: &[Attribute]) -> Result<Self> {
        Element::new(&ElementName::new(name)?, attributes)
    }

    fn tags(&self) -> Result<&Tags> {
        self.tags
            .as_ref()
            .ok_or(ValidationError::UninitializedUse { what: "element" })
    }

    pub fn start_tag(&self) -> Result<&[u8]> {
        Ok(&self.tags()?.start)
    }

    pub fn end_tag(&self) -> Result<&[u8]> {
        Ok(&self.tags()?.end)
    }

    pub fn start_tag_str(&self) -> Result<Cow<'_, str>> {
        self.start_tag().map(String::from_utf8_lossy)
    }

    pub fn end_tag_str(&self) -> Result<Cow<'_, str>> {
        self.end_tag().map(String::from_utf8_lossy)
    }
}
