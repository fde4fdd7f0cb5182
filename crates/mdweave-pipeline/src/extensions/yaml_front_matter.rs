use super::insert_before;
use crate::error::PipelineError;
use crate::parsers::block::ThematicBreakParser;
use crate::parsers::{BlockMatch, BlockParser, BlockProcessor};
use crate::pipeline::{Extension, Pipeline, PipelineBuilder};
use crate::registry::Component;
use crate::render::html::{self, HtmlWriter};
use crate::render::normalize::{self, NormalizeWriter};
use crate::render::{HtmlRenderer, MarkdownRenderer, NormalizeRenderer, ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Block, CodeBlock, CodeBlockKind, Node};

/// A YAML block between `---` lines at the very start of the document.
///
/// The block is kept in the document as a [`CodeBlockKind::FrontMatter`]
/// code block. HTML output discards it; normalized output keeps it.
#[derive(Debug, Default)]
pub struct YamlFrontMatterExtension;

impl Component for YamlFrontMatterExtension {}

impl Extension for YamlFrontMatterExtension {
    fn name(&self) -> &'static str {
        "yaml_front_matter"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        // Must run before the thematic break parser, which also claims `---`.
        if !builder.block_parsers.contains::<YamlFrontMatterParser>() {
            insert_before::<ThematicBreakParser, _>(
                &mut builder.block_parsers,
                Box::new(YamlFrontMatterParser),
                self.name(),
            );
        }
        Ok(())
    }

    fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        if let Some(html_renderer) = renderer.downcast_mut::<HtmlRenderer>() {
            let registry = html_renderer.object_renderers_mut()?;
            if !registry.contains::<HtmlYamlFrontMatterRenderer>() {
                insert_before::<html::CodeBlockRenderer, _>(
                    registry,
                    Box::new(HtmlYamlFrontMatterRenderer),
                    self.name(),
                );
            }
        } else if let Some(normalize_renderer) = renderer.downcast_mut::<NormalizeRenderer>() {
            let registry = normalize_renderer.object_renderers_mut()?;
            if !registry.contains::<NormalizeYamlFrontMatterRenderer>() {
                insert_before::<normalize::CodeBlockRenderer, _>(
                    registry,
                    Box::new(NormalizeYamlFrontMatterRenderer),
                    self.name(),
                );
            }
        }
        Ok(())
    }
}

/// `---` on the first line of the document, closed by `---` or `...`.
///
/// An unclosed opening line is left to the other parsers.
#[derive(Debug, Default)]
pub struct YamlFrontMatterParser;

impl Component for YamlFrontMatterParser {}

impl BlockParser for YamlFrontMatterParser {
    fn try_open(&self, processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        if processor.depth() > 0 || start > 0 || lines[start].trim_end() != "---" {
            return None;
        }

        let close = lines[start + 1..]
            .iter()
            .position(|line| matches!(line.trim_end(), "---" | "..."))?;
        let body = lines[start + 1..start + 1 + close]
            .iter()
            .map(|line| (*line).to_owned())
            .collect();

        Some(BlockMatch::new(
            Block::CodeBlock(CodeBlock::new(CodeBlockKind::FrontMatter, "---", body)),
            close + 2,
        ))
    }
}

/// Writes nothing for front matter.
#[derive(Debug, Default)]
pub struct HtmlYamlFrontMatterRenderer;

impl Component for HtmlYamlFrontMatterRenderer {}

impl ObjectRenderer<HtmlWriter> for HtmlYamlFrontMatterRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        node.is_code_block(CodeBlockKind::FrontMatter)
    }

    fn write(&self, _: &mut RenderContext<'_, HtmlWriter>, _: Node<'_>) {}
}

/// Writes front matter back between `---` lines.
#[derive(Debug, Default)]
pub struct NormalizeYamlFrontMatterRenderer;

impl Component for NormalizeYamlFrontMatterRenderer {}

impl ObjectRenderer<NormalizeWriter> for NormalizeYamlFrontMatterRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        node.is_code_block(CodeBlockKind::FrontMatter)
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(code) = node.as_code_block() else {
            return;
        };
        ctx.writer.begin_block();
        ctx.writer.write_line("---");
        for line in &code.lines {
            ctx.writer.write_line(line);
        }
        ctx.writer.write("---");
        ctx.writer.finish_block(true);
    }
}
