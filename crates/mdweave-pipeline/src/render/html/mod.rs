//! HTML output.
//!
//! [`renderer`] builds an [`HtmlRenderer`] with one object renderer per node
//! kind. Extensions insert more specific renderers ahead of these.

mod blocks;
mod inlines;

pub use blocks::{
    CodeBlockRenderer, HeadingRenderer, ListRenderer, ParagraphRenderer, ThematicBreakRenderer,
};
pub use inlines::{
    CodeSpanRenderer, EmphasisRenderer, LineBreakRenderer, LinkRenderer, LiteralRenderer,
};

use super::{HtmlRenderer, OutputWriter, Renderer, escape_html};
use crate::syntax::HtmlAttributes;

/// HTML output switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Escape literal text. Code is always escaped.
    pub escape: bool,
    /// Emit block tags (`<p>`, `<h1>`, `<ul>`, ...). When off only block content is written.
    pub block_tags: bool,
    /// Emit inline tags (`<em>`, `<a>`, `<code>`, ...). When off only inline content is written.
    pub inline_tags: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            escape: true,
            block_tags: true,
            inline_tags: true,
        }
    }
}

/// [`OutputWriter`] accumulating HTML.
#[derive(Debug, Default)]
pub struct HtmlWriter {
    output: String,
    options: HtmlOptions,
    implicit_paragraph: bool,
}

impl HtmlWriter {
    #[must_use]
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            output: String::new(),
            options,
            implicit_paragraph: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Whether paragraphs are written without `<p>` (inside tight list items).
    #[must_use]
    pub fn implicit_paragraph(&self) -> bool {
        self.implicit_paragraph
    }

    /// Set the implicit paragraph flag, returning the previous value.
    pub fn set_implicit_paragraph(&mut self, implicit: bool) -> bool {
        std::mem::replace(&mut self.implicit_paragraph, implicit)
    }
}

impl OutputWriter for HtmlWriter {
    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_escaped(&mut self, text: &str) {
        self.output.push_str(&escape_html(text));
    }

    fn ensure_line(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }

    fn write_attributes(&mut self, attributes: &HtmlAttributes) {
        if let Some(id) = &attributes.id {
            self.write(" id=\"");
            self.write_escaped(id);
            self.write("\"");
        }
        if !attributes.classes.is_empty() {
            self.write(" class=\"");
            self.write_escaped(&attributes.classes.join(" "));
            self.write("\"");
        }
        for (key, value) in &attributes.properties {
            self.write(" ");
            self.write(key);
            self.write("=\"");
            self.write_escaped(value);
            self.write("\"");
        }
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// HTML renderer with the default object renderers registered.
#[must_use]
pub fn renderer(options: HtmlOptions) -> HtmlRenderer {
    let mut renderer = Renderer::new(HtmlWriter::new(options));
    let registry = &mut renderer.object_renderers;
    registry.push(Box::new(ParagraphRenderer));
    registry.push(Box::new(HeadingRenderer));
    registry.push(Box::new(ThematicBreakRenderer));
    registry.push(Box::new(CodeBlockRenderer));
    registry.push(Box::new(ListRenderer));
    registry.push(Box::new(LiteralRenderer));
    registry.push(Box::new(CodeSpanRenderer));
    registry.push(Box::new(EmphasisRenderer::default()));
    registry.push(Box::new(LinkRenderer));
    registry.push(Box::new(LineBreakRenderer));
    renderer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MarkdownRenderer;
    use crate::syntax::{Block, Document, Paragraph};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_attributes() {
        let mut writer = HtmlWriter::default();
        writer.write_attributes(&HtmlAttributes::parse(r#"#a .b .c data-x="1<2""#));
        assert_eq!(writer.take_output(), r#" id="a" class="b c" data-x="1&lt;2""#);
    }

    #[test]
    fn test_ensure_line() {
        let mut writer = HtmlWriter::default();
        writer.ensure_line();
        writer.write("<hr />");
        writer.ensure_line();
        writer.ensure_line();
        assert_eq!(writer.take_output(), "<hr />\n");
    }

    #[test]
    fn test_default_registry_order() {
        let renderer = renderer(HtmlOptions::default());
        assert_eq!(renderer.object_renderers().len(), 10);
        assert_eq!(renderer.object_renderers().position::<CodeBlockRenderer>(), Some(3));
        assert_eq!(renderer.object_renderers().position::<EmphasisRenderer>(), Some(7));
    }

    #[test]
    fn test_output_is_taken_per_render() {
        let mut renderer = renderer(HtmlOptions::default());
        let document = Document {
            blocks: vec![Block::Paragraph(Paragraph {
                inlines: vec![crate::syntax::Inline::text("a")],
            })],
        };
        assert_eq!(renderer.render(&document), "<p>a</p>\n");
        assert_eq!(renderer.render(&document), "<p>a</p>\n");
    }
}
