use super::HtmlWriter;
use crate::registry::Component;
use crate::render::{ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Block, Node, Numbering};

/// `<p>`; omitted inside tight list items.
#[derive(Debug, Default)]
pub struct ParagraphRenderer;

impl Component for ParagraphRenderer {}

impl ObjectRenderer<HtmlWriter> for ParagraphRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Paragraph(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Block::Paragraph(paragraph)) = node.as_block() else {
            return;
        };
        if ctx.writer.implicit_paragraph() {
            ctx.render_inlines(&paragraph.inlines);
            return;
        }

        let tags = ctx.writer.options().block_tags;
        ctx.writer.ensure_line();
        if tags {
            ctx.writer.write("<p>");
        }
        ctx.render_inlines(&paragraph.inlines);
        if tags {
            ctx.writer.write("</p>");
        }
        ctx.writer.write("\n");
    }
}

/// `<h1>` to `<h6>`.
#[derive(Debug, Default)]
pub struct HeadingRenderer;

impl Component for HeadingRenderer {}

impl ObjectRenderer<HtmlWriter> for HeadingRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Heading(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Block::Heading(heading)) = node.as_block() else {
            return;
        };
        let tags = ctx.writer.options().block_tags;
        ctx.writer.ensure_line();
        if tags {
            ctx.writer.write(&format!("<h{}>", heading.level));
        }
        ctx.render_inlines(&heading.inlines);
        if tags {
            ctx.writer.write(&format!("</h{}>", heading.level));
        }
        ctx.writer.write("\n");
    }
}

/// `<hr />`.
#[derive(Debug, Default)]
pub struct ThematicBreakRenderer;

impl Component for ThematicBreakRenderer {}

impl ObjectRenderer<HtmlWriter> for ThematicBreakRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::ThematicBreak(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, _: Node<'_>) {
        if ctx.writer.options().block_tags {
            ctx.writer.ensure_line();
            ctx.writer.write_line("<hr />");
        }
    }
}

/// `<pre><code>` for code blocks of every kind.
///
/// Renderers for front matter or math blocks are inserted before this one.
#[derive(Debug, Default)]
pub struct CodeBlockRenderer;

impl Component for CodeBlockRenderer {}

impl ObjectRenderer<HtmlWriter> for CodeBlockRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        node.as_code_block().is_some()
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(code) = node.as_code_block() else {
            return;
        };
        let tags = ctx.writer.options().block_tags;
        ctx.writer.ensure_line();
        if tags {
            ctx.writer.write("<pre><code");
            if !code.info.is_empty() {
                ctx.writer.write(" class=\"language-");
                ctx.writer.write_escaped(&code.info);
                ctx.writer.write("\"");
            }
            ctx.writer.write_attributes(&code.attributes);
            ctx.writer.write(">");
        }
        for line in &code.lines {
            ctx.writer.write_escaped(line);
            ctx.writer.write("\n");
        }
        if tags {
            ctx.writer.write_line("</code></pre>");
        }
    }
}

/// `<ul>` and `<ol>` with their items.
#[derive(Debug, Default)]
pub struct ListRenderer;

impl Component for ListRenderer {}

impl ObjectRenderer<HtmlWriter> for ListRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::List(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Block::List(list)) = node.as_block() else {
            return;
        };
        let tags = ctx.writer.options().block_tags;
        let tag = if list.marker.is_ordered() { "ol" } else { "ul" };

        ctx.writer.ensure_line();
        if tags {
            ctx.writer.write("<");
            ctx.writer.write(tag);
            if let (Some(numbering), Some(start)) = (list.marker.numbering, &list.marker.start) {
                if let Some(value) = numbering.value(start)
                    && value != 1
                {
                    ctx.writer.write(&format!(" start=\"{value}\""));
                }
                if numbering != Numbering::Decimal {
                    ctx.writer.write(&format!(" type=\"{}\"", numbering.html_type()));
                }
            }
            ctx.writer.write_line(">");
        }

        let previous = ctx.writer.set_implicit_paragraph(!list.loose);
        for item in &list.items {
            if tags {
                ctx.writer.write("<li>");
            }
            ctx.render_blocks(&item.blocks);
            if tags {
                ctx.writer.write_line("</li>");
            } else {
                ctx.writer.ensure_line();
            }
        }
        ctx.writer.set_implicit_paragraph(previous);

        if tags {
            ctx.writer.ensure_line();
            ctx.writer.write_line(&format!("</{tag}>"));
        }
    }
}
