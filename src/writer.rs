use std::io::Write;

use log::trace;

use crate::element::Element;
use crate::encoded::Encoded;
use crate::err::{RenderError, RenderResult};
use crate::script::Script;
use crate::value::Text;

const DOCTYPE: &[u8] = b"<!DOCTYPE html>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterSettings {
    emit_doctype: bool,
    newline_after_doctype: bool,
    /// Spaces per nesting level; `None` writes everything on one line.
    indent: Option<usize>,
    max_depth: usize,
}

impl Default for WriterSettings {
    fn default() -> Self {
        WriterSettings {
            emit_doctype: true,
            newline_after_doctype: true,
            indent: None,
            max_depth: 256,
        }
    }
}

impl WriterSettings {
    pub fn new() -> Self {
        WriterSettings::default()
    }

    pub fn emit_doctype(mut self, emit_doctype: bool) -> Self {
        self.emit_doctype = emit_doctype;
        self
    }

    pub fn newline_after_doctype(mut self, newline_after_doctype: bool) -> Self {
        self.newline_after_doctype = newline_after_doctype;
        self
    }

    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn should_emit_doctype(&self) -> bool {
        self.emit_doctype
    }

    pub fn should_indent(&self) -> bool {
        self.indent.is_some()
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Streams validated fragments into `W`, keeping track of open elements so
/// that every `close` writes the right end tag.
///
/// Nothing is validated here: every fragment arrives already frozen.
pub struct HtmlWriter<W: Write> {
    writer: W,
    settings: WriterSettings,
    open: Vec<Element>,
    at_line_start: bool,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        HtmlWriter::with_settings(writer, WriterSettings::default())
    }

    pub fn with_settings(writer: W, settings: WriterSettings) -> Self {
        HtmlWriter {
            writer,
            settings,
            open: Vec::new(),
            at_line_start: true,
        }
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn start_document(&mut self) -> RenderResult<()> {
        trace!("start_document");
        if !self.settings.emit_doctype {
            return Ok(());
        }
        self.writer.write_all(DOCTYPE)?;
        if self.settings.newline_after_doctype {
            self.writer.write_all(b"\n")?;
            self.at_line_start = true;
        } else {
            self.at_line_start = false;
        }
        Ok(())
    }

    pub fn open(&mut self, element: &Element) -> RenderResult<()> {
        let start = element.start_tag()?;
        trace!("open {}", String::from_utf8_lossy(start));
        self.check_depth()?;

        self.line_break()?;
        self.writer.write_all(start)?;
        self.open.push(element.clone());
        Ok(())
    }

    pub fn close(&mut self) -> RenderResult<()> {
        let element = self.open.pop().ok_or(RenderError::UnbalancedClose)?;
        let end = element.end_tag()?;
        trace!("close {}", String::from_utf8_lossy(end));

        self.line_break()?;
        self.writer.write_all(end)?;
        Ok(())
    }

    pub fn text(&mut self, text: &Text) -> RenderResult<()> {
        trace!("text ({} bytes)", text.encoded()?.len());
        if text.is_empty() {
            return Ok(());
        }
        self.line_break()?;
        text.write_to(&mut self.writer)
    }

    pub fn script(&mut self, script: &Script) -> RenderResult<()> {
        trace!("script");
        // Fail before touching the output.
        script.encoded()?;
        self.check_depth()?;

        self.line_break()?;
        script.render_to(&mut self.writer)
    }

    /// An element holding only text, written on a single line.
    pub fn element(&mut self, element: &Element, text: &Text) -> RenderResult<()> {
        let start = element.start_tag()?;
        let end = element.end_tag()?;
        trace!("element {}", String::from_utf8_lossy(start));
        self.check_depth()?;

        self.line_break()?;
        self.writer.write_all(start)?;
        text.write_to(&mut self.writer)?;
        self.writer.write_all(end)?;
        Ok(())
    }

    /// Hand back the sink once every opened element has been closed.
    pub fn finish(mut self) -> RenderResult<W> {
        trace!("finish");
        if !self.open.is_empty() {
            return Err(RenderError::UnclosedElements {
                open: self.open.len(),
            });
        }
        if self.settings.should_indent() && !self.at_line_start {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn check_depth(&self) -> RenderResult<()> {
        let depth = self.open.len() + 1;
        if depth > self.settings.max_depth {
            return Err(RenderError::DepthExceeded {
                depth,
                max: self.settings.max_depth,
            });
        }
        Ok(())
    }

    /// Start a new indented line when pretty printing.
    fn line_break(&mut self) -> RenderResult<()> {
        let Some(width) = self.settings.indent else {
            return Ok(());
        };
        if !self.at_line_start {
            self.writer.write_all(b"\n")?;
        }
        for _ in 0..width * self.open.len() {
            self.writer.write_all(b" ")?;
        }
        self.at_line_start = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Attribute;
    use pretty_assertions::assert_eq;

    fn render(settings: WriterSettings, build: impl FnOnce(&mut HtmlWriter<Vec<u8>>)) -> String {
        let mut writer = HtmlWriter::with_settings(Vec::new(), settings);
        build(&mut writer);
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_compact_document() {
        let html = Element::parse("html", &[Attribute::parse("lang", "en").unwrap()]).unwrap();
        let p = Element::parse("p", &[]).unwrap();

        let out = render(WriterSettings::new(), |w| {
            w.start_document().unwrap();
            w.open(&html).unwrap();
            w.element(&p, &Text::new("1 < 2 & 3")).unwrap();
            w.close().unwrap();
        });
        assert_eq!(
            out,
            "<!DOCTYPE html>\n<html lang=en><p>1 &lt; 2 &amp; 3</p></html>"
        );
    }

    #[test]
    fn test_doctype_settings() {
        let out = render(WriterSettings::new().newline_after_doctype(false), |w| {
            w.start_document().unwrap();
        });
        assert_eq!(out, "<!DOCTYPE html>");

        let out = render(WriterSettings::new().emit_doctype(false), |w| {
            w.start_document().unwrap();
        });
        assert_eq!(out, "");
    }

    #[test]
    fn test_close_without_open() {
        let mut writer = HtmlWriter::new(Vec::new());
        assert!(matches!(writer.close(), Err(RenderError::UnbalancedClose)));
    }

    #[test]
    fn test_finish_with_open_elements() {
        let div = Element::parse("div", &[]).unwrap();
        let mut writer = HtmlWriter::new(Vec::new());
        writer.open(&div).unwrap();
        writer.open(&div).unwrap();
        assert_eq!(writer.depth(), 2);
        assert!(matches!(
            writer.finish(),
            Err(RenderError::UnclosedElements { open: 2 })
        ));
    }

    #[test]
    fn test_max_depth() {
        let div = Element::parse("div", &[]).unwrap();
        let mut writer = HtmlWriter::with_settings(Vec::new(), WriterSettings::new().max_depth(1));
        writer.open(&div).unwrap();
        assert!(matches!(
            writer.open(&div),
            Err(RenderError::DepthExceeded { depth: 2, max: 1 })
        ));
        assert!(matches!(
            writer.element(&div, &Text::default()),
            Err(RenderError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn test_uninitialized_element_writes_nothing() {
        let mut writer = HtmlWriter::new(Vec::new());
        assert!(matches!(
            writer.open(&Element::default()),
            Err(RenderError::Validation(_))
        ));
        assert!(matches!(
            writer.script(&Script::default()),
            Err(RenderError::Validation(_))
        ));
        assert_eq!(writer.depth(), 0);
        assert!(writer.finish().unwrap().is_empty());
    }
}
