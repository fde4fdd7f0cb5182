use super::insert_before;
use crate::error::PipelineError;
use crate::parsers::block::{Fence, FencedCodeParser};
use crate::parsers::{BlockMatch, BlockParser, BlockProcessor};
use crate::pipeline::{Extension, Pipeline, PipelineBuilder};
use crate::registry::Component;
use crate::render::html::{self, HtmlWriter};
use crate::render::normalize::{self, NormalizeWriter};
use crate::render::{HtmlRenderer, MarkdownRenderer, NormalizeRenderer, ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Block, CodeBlock, CodeBlockKind, Node};

/// `$$` display math blocks.
///
/// The content is passed through for a client-side typesetter; HTML output
/// wraps it in `\[ ... \]` inside a `math` div.
#[derive(Debug, Default)]
pub struct MathematicsExtension;

impl Component for MathematicsExtension {}

impl Extension for MathematicsExtension {
    fn name(&self) -> &'static str {
        "mathematics"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        if !builder.block_parsers.contains::<MathBlockParser>() {
            insert_before::<FencedCodeParser, _>(&mut builder.block_parsers, Box::new(MathBlockParser), self.name());
        }
        Ok(())
    }

    fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        if let Some(html_renderer) = renderer.downcast_mut::<HtmlRenderer>() {
            let registry = html_renderer.object_renderers_mut()?;
            if !registry.contains::<HtmlMathBlockRenderer>() {
                insert_before::<html::CodeBlockRenderer, _>(registry, Box::new(HtmlMathBlockRenderer), self.name());
            }
        } else if let Some(normalize_renderer) = renderer.downcast_mut::<NormalizeRenderer>() {
            let registry = normalize_renderer.object_renderers_mut()?;
            if !registry.contains::<NormalizeMathBlockRenderer>() {
                insert_before::<normalize::CodeBlockRenderer, _>(
                    registry,
                    Box::new(NormalizeMathBlockRenderer),
                    self.name(),
                );
            }
        }
        Ok(())
    }
}

/// Lines between `$$` fences, as a [`CodeBlockKind::Math`] code block with
/// class `math`.
#[derive(Debug, Default)]
pub struct MathBlockParser;

impl Component for MathBlockParser {}

impl BlockParser for MathBlockParser {
    fn try_open(&self, _processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let fence = Fence::open(lines[start], '$', 2)?;
        if !fence.info.is_empty() {
            return None;
        }
        let (body, consumed) = fence.collect_body(lines, start);

        let mut code = CodeBlock::new(CodeBlockKind::Math, fence.marker_string(), body);
        code.attributes.add_class("math");
        Some(BlockMatch::new(Block::CodeBlock(code), consumed))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct HtmlMathBlockRenderer;

impl Component for HtmlMathBlockRenderer {}

impl ObjectRenderer<HtmlWriter> for HtmlMathBlockRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        node.is_code_block(CodeBlockKind::Math)
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(code) = node.as_code_block() else {
            return;
        };
        ctx.writer.ensure_line();
        ctx.writer.write("<div");
        ctx.writer.write_attributes(&code.attributes);
        ctx.writer.write_line(">");
        ctx.writer.write_line("\\[");
        for line in &code.lines {
            ctx.writer.write_escaped(line);
            ctx.writer.write("\n");
        }
        ctx.writer.write("\\]");
        ctx.writer.write_line("</div>");
    }
}

#[derive(Debug, Default)]
pub struct NormalizeMathBlockRenderer;

impl Component for NormalizeMathBlockRenderer {}

impl ObjectRenderer<NormalizeWriter> for NormalizeMathBlockRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        node.is_code_block(CodeBlockKind::Math)
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(code) = node.as_code_block() else {
            return;
        };
        let empty_line = ctx.writer.options().empty_line_after_code_block;
        ctx.writer.begin_block();
        ctx.writer.write_line(&code.fence);
        for line in &code.lines {
            ctx.writer.write_line(line);
        }
        ctx.writer.write(&code.fence);
        ctx.writer.finish_block(empty_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        PipelineBuilder::new().with_mathematics().build().unwrap()
    }

    #[test]
    fn test_math_block_html() {
        assert_eq!(
            pipeline().to_html("$$\na < b\n$$").unwrap(),
            "<div class=\"math\">\n\\[\na &lt; b\n\\]</div>\n"
        );
    }

    #[test]
    fn test_math_block_round_trip() {
        let source = "$$\n\\sum_{i=1}^n i\n$$\n";
        assert_eq!(pipeline().normalize(source).unwrap(), source);
    }

    #[test]
    fn test_math_block_interrupts_paragraph() {
        let document = pipeline().parse("text\n$$\nx\n$$");
        assert_eq!(document.blocks.len(), 2);
        assert!(matches!(
            &document.blocks[1],
            Block::CodeBlock(code) if code.kind == CodeBlockKind::Math
        ));
    }

    #[test]
    fn test_dollars_with_text_are_not_a_fence() {
        let document = pipeline().parse("$$ not math");
        assert!(matches!(document.blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_without_extension_math_is_text() {
        let html = PipelineBuilder::new().build().unwrap().to_html("$$\nx\n$$").unwrap();
        assert_eq!(html, "<p>$$\nx\n$$</p>\n");
    }
}
