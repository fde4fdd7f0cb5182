use super::NormalizeWriter;
use crate::registry::Component;
use crate::render::{ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Inline, LinkKind, Node, plain_text};

/// Literal text; a backslash-escaped first character is escaped again.
#[derive(Debug, Default)]
pub struct LiteralRenderer;

impl Component for LiteralRenderer {}

impl ObjectRenderer<NormalizeWriter> for LiteralRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Literal(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Inline::Literal(literal)) = node.as_inline() else {
            return;
        };
        if literal.first_char_escaped {
            ctx.writer.write("\\");
        }
        ctx.writer.write(&literal.content);
    }
}

#[derive(Debug, Default)]
pub struct CodeSpanRenderer;

impl Component for CodeSpanRenderer {}

impl ObjectRenderer<NormalizeWriter> for CodeSpanRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Code(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Inline::Code(code)) = node.as_inline() else {
            return;
        };
        let fence = "`".repeat(code.delimiter_count.max(1));
        let pad = if code.content.starts_with('`') || code.content.ends_with('`') {
            " "
        } else {
            ""
        };
        ctx.writer.write(&fence);
        ctx.writer.write(pad);
        ctx.writer.write(&code.content);
        ctx.writer.write(pad);
        ctx.writer.write(&fence);
    }
}

/// Any delimiter span: the delimiter character repeated by width on both sides.
#[derive(Debug, Default)]
pub struct DelimiterRenderer;

impl Component for DelimiterRenderer {}

impl ObjectRenderer<NormalizeWriter> for DelimiterRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        node.as_span().is_some()
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(span) = node.as_span() else {
            return;
        };
        let delimiter: String = std::iter::repeat_n(span.delimiter, span.width).collect();
        ctx.writer.write(&delimiter);
        ctx.render_inlines(&span.children);
        ctx.writer.write(&delimiter);
    }
}

/// `[label](url "title")`, `<url>` for angle-bracket auto-links.
///
/// Bare URLs are expanded to `[url](url)`; the auto-links extension inserts a
/// renderer ahead of this one that keeps them bare when expansion is off.
#[derive(Debug, Default)]
pub struct LinkRenderer;

impl Component for LinkRenderer {}

impl ObjectRenderer<NormalizeWriter> for LinkRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::Link(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Inline::Link(link)) = node.as_inline() else {
            return;
        };
        if link.kind == LinkKind::Autolink {
            ctx.writer.write("<");
            ctx.writer.write(&plain_text(&link.children));
            ctx.writer.write(">");
            return;
        }

        ctx.writer.write("[");
        ctx.render_inlines(&link.children);
        ctx.writer.write("](");
        let url = escape_destination(&link.url);
        if link.url.contains([' ', '(', ')']) {
            ctx.writer.write("<");
            ctx.writer.write(&url);
            ctx.writer.write(">");
        } else {
            ctx.writer.write(&url);
        }
        if let Some(title) = &link.title {
            ctx.writer.write(" \"");
            ctx.writer.write(&title.replace('"', "\\\""));
            ctx.writer.write("\"");
        }
        ctx.writer.write(")");
    }
}

/// Backslash-escape the characters that end or escape a link destination.
fn escape_destination(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '\\' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Default)]
pub struct LineBreakRenderer;

impl Component for LineBreakRenderer {}

impl ObjectRenderer<NormalizeWriter> for LineBreakRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Inline(Inline::LineBreak(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Inline::LineBreak(line_break)) = node.as_inline() else {
            return;
        };
        match (line_break.hard, line_break.backslash) {
            (true, true) => ctx.writer.write("\\\n"),
            (true, false) => ctx.writer.write("  \n"),
            (false, _) => ctx.writer.write("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::PipelineBuilder;
    use pretty_assertions::assert_eq;

    fn normalize(markdown: &str) -> String {
        PipelineBuilder::new().build().unwrap().normalize(markdown).unwrap()
    }

    #[test]
    fn test_inline_round_trip() {
        for source in [
            "**bold** and *em* and _under_\n",
            "***both***\n",
            "a `code` span\n",
            "[label *x*](https://e.dev \"Title\")\n",
            "<https://e.dev>\n",
            "one  \ntwo\\\nthree\nfour\n",
            "\\*not emphasis\\*\n",
        ] {
            assert_eq!(normalize(source), source, "input: {source:?}");
        }
    }

    #[test]
    fn test_code_span_with_backticks_is_padded() {
        assert_eq!(normalize("`` a`b ``"), "``a`b``\n");
        assert_eq!(normalize("`` `x` ``"), "`` `x` ``\n");
    }

    #[test]
    fn test_destination_with_parens_uses_angle_brackets() {
        assert_eq!(normalize("[w](<a (b)>)"), "[w](<a (b)>)\n");
    }

    #[test]
    fn test_backslash_in_destination_survives_reparse() {
        let pipeline = PipelineBuilder::new().build().unwrap();
        for source in ["p [](\\ ) q", "p [](\\\\) q", "[x](<a\\<b>)"] {
            let normalized = pipeline.normalize(source).unwrap();
            assert_eq!(
                pipeline.to_html(&normalized).unwrap(),
                pipeline.to_html(source).unwrap(),
                "input: {source:?}"
            );
        }
        assert_eq!(normalize("p [](\\\\) q"), "p [](\\\\) q\n");
    }
}
