use std::borrow::Cow;
use std::io::Write;

use crate::err::{RenderResult, Result};

/// A validated fragment whose bytes can be streamed verbatim into HTML output.
pub trait Encoded {
    /// The frozen, already-escaped bytes.
    ///
    /// Fails with [`crate::ValidationError::UninitializedUse`] for types whose
    /// default state is not a legitimate value.
    fn encoded(&self) -> Result<&[u8]>;

    /// The encoded bytes as text, for diagnostics and tests.
    fn encoded_str(&self) -> Result<Cow<'_, str>> {
        self.encoded().map(String::from_utf8_lossy)
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> RenderResult<()> {
        writer.write_all(self.encoded()?)?;
        Ok(())
    }
}
