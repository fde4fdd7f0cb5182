use super::HtmlWriter;
use crate::registry::Component;
use crate::render::{DecisionChain, ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Inline, Node, SpanNode};

/// Literal text, escaped unless [`HtmlOptions::escape`](super::HtmlOptions::escape) is off.
#[derive(Debug, Default)]
pub struct LiteralRenderer;

impl Component for LiteralRenderer {}

impl ObjectRenderer<HtmlWriter> for LiteralRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Literal(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Inline::Literal(literal)) = node.as_inline() else {
            return;
        };
        if ctx.writer.options().escape {
            ctx.writer.write_escaped(&literal.content);
        } else {
            ctx.writer.write(&literal.content);
        }
    }
}

/// `<code>`.
#[derive(Debug, Default)]
pub struct CodeSpanRenderer;

impl Component for CodeSpanRenderer {}

impl ObjectRenderer<HtmlWriter> for CodeSpanRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Code(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Inline::Code(code)) = node.as_inline() else {
            return;
        };
        let tags = ctx.writer.options().inline_tags;
        if tags {
            ctx.writer.write("<code>");
        }
        ctx.writer.write_escaped(&code.content);
        if tags {
            ctx.writer.write("</code>");
        }
    }
}

/// Writes every delimiter span, choosing its tag through a [`DecisionChain`].
///
/// The base strategy maps `*` and `_` spans to `<em>` (width 1) and
/// `<strong>` (width 2). Extensions push strategies for their own delimiter
/// characters; a span no strategy answers for is written without a tag.
pub struct EmphasisRenderer {
    tags: DecisionChain<SpanNode, &'static str>,
}

impl Default for EmphasisRenderer {
    fn default() -> Self {
        let mut tags = DecisionChain::new("emphasis tag chain");
        // A fresh chain is never frozen.
        let _ = tags.push(default_tag);
        Self { tags }
    }
}

fn default_tag(span: &SpanNode) -> Option<&'static str> {
    match (span.delimiter, span.width) {
        ('*' | '_', 1) => Some("em"),
        ('*' | '_', 2) => Some("strong"),
        _ => None,
    }
}

impl EmphasisRenderer {
    #[must_use]
    pub fn tags(&self) -> &DecisionChain<SpanNode, &'static str> {
        &self.tags
    }

    /// Tag chain; pushing fails once the renderer is frozen.
    pub fn tags_mut(&mut self) -> &mut DecisionChain<SpanNode, &'static str> {
        &mut self.tags
    }
}

impl Component for EmphasisRenderer {}

impl ObjectRenderer<HtmlWriter> for EmphasisRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        node.as_span().is_some()
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(span) = node.as_span() else {
            return;
        };
        let tag = self
            .tags
            .decide(span)
            .filter(|_| ctx.writer.options().inline_tags);

        if let Some(tag) = tag {
            ctx.writer.write(&format!("<{tag}>"));
        }
        ctx.render_inlines(&span.children);
        if let Some(tag) = tag {
            ctx.writer.write(&format!("</{tag}>"));
        }
    }

    fn freeze(&mut self) {
        self.tags.freeze();
    }
}

/// `<a href>`.
#[derive(Debug, Default)]
pub struct LinkRenderer;

impl Component for LinkRenderer {}

impl ObjectRenderer<HtmlWriter> for LinkRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Link(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Inline::Link(link)) = node.as_inline() else {
            return;
        };
        let tags = ctx.writer.options().inline_tags;
        if tags {
            ctx.writer.write("<a href=\"");
            ctx.writer.write_escaped(&link.url);
            ctx.writer.write("\"");
            if let Some(title) = &link.title {
                ctx.writer.write(" title=\"");
                ctx.writer.write_escaped(title);
                ctx.writer.write("\"");
            }
            ctx.writer.write(">");
        }
        ctx.render_inlines(&link.children);
        if tags {
            ctx.writer.write("</a>");
        }
    }
}

/// `<br />` for hard breaks, a newline for soft ones.
#[derive(Debug, Default)]
pub struct LineBreakRenderer;

impl Component for LineBreakRenderer {}

impl ObjectRenderer<HtmlWriter> for LineBreakRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::LineBreak(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Inline::LineBreak(line_break)) = node.as_inline() else {
            return;
        };
        if line_break.hard && ctx.writer.options().inline_tags {
            ctx.writer.write("<br />");
        }
        ctx.writer.write("\n");
    }
}
