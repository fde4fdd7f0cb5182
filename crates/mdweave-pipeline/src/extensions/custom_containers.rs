use super::{add_descriptor, insert_before};
use crate::delimiter::DelimiterDescriptor;
use crate::error::PipelineError;
use crate::parsers::block::{Fence, FencedCodeParser};
use crate::parsers::{BlockMatch, BlockParser, BlockProcessor};
use crate::pipeline::{Extension, Pipeline, PipelineBuilder};
use crate::registry::Component;
use crate::render::html::{self, EmphasisRenderer, HtmlWriter};
use crate::render::normalize::{self, NormalizeWriter};
use crate::render::{HtmlRenderer, MarkdownRenderer, NormalizeRenderer, ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Block, Container, HtmlAttributes, Node};

/// `:::` fenced containers and `::inline::` spans.
///
/// ```text
/// :::warning Read this {#notice}
/// Body with ::highlighted:: text.
/// :::
/// ```
///
/// The info word becomes a class of the container; a trailing `{...}` block
/// sets further attributes. Containers nest when the inner fence is shorter.
#[derive(Debug, Default)]
pub struct CustomContainerExtension;

impl Component for CustomContainerExtension {}

impl Extension for CustomContainerExtension {
    fn name(&self) -> &'static str {
        "custom_containers"
    }

    fn setup_parsers(&self, builder: &mut PipelineBuilder) -> Result<(), PipelineError> {
        if !builder.block_parsers.contains::<CustomContainerParser>() {
            insert_before::<FencedCodeParser, _>(
                &mut builder.block_parsers,
                Box::new(CustomContainerParser),
                self.name(),
            );
        }
        add_descriptor(builder, DelimiterDescriptor::new(':', 2, 2, true)?, self.name())
    }

    fn setup_renderer(&self, _: &Pipeline, renderer: &mut dyn MarkdownRenderer) -> Result<(), PipelineError> {
        if let Some(html_renderer) = renderer.downcast_mut::<HtmlRenderer>() {
            let registry = html_renderer.object_renderers_mut()?;
            if !registry.contains::<HtmlCustomContainerRenderer>() {
                insert_before::<html::CodeBlockRenderer, _>(
                    registry,
                    Box::new(HtmlCustomContainerRenderer),
                    self.name(),
                );
            }
            if !registry.contains::<HtmlCustomContainerInlineRenderer>() {
                insert_before::<EmphasisRenderer, _>(
                    registry,
                    Box::new(HtmlCustomContainerInlineRenderer),
                    self.name(),
                );
            }
        } else if let Some(normalize_renderer) = renderer.downcast_mut::<NormalizeRenderer>() {
            let registry = normalize_renderer.object_renderers_mut()?;
            if !registry.contains::<NormalizeCustomContainerRenderer>() {
                insert_before::<normalize::CodeBlockRenderer, _>(
                    registry,
                    Box::new(NormalizeCustomContainerRenderer),
                    self.name(),
                );
            }
        }
        Ok(())
    }
}

/// Parses `:::info arguments {attributes}` ... `:::` into a [`Container`].
#[derive(Debug, Default)]
pub struct CustomContainerParser;

impl Component for CustomContainerParser {}

impl BlockParser for CustomContainerParser {
    fn try_open(&self, processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let fence = Fence::open(lines[start], ':', 3)?;
        let (body, consumed) = fence.collect_body(lines, start);

        let (info_text, mut attributes) = HtmlAttributes::split_trailing(fence.info)
            .unwrap_or((fence.info, HtmlAttributes::default()));
        let (info, arguments) = match info_text.split_once(char::is_whitespace) {
            Some((info, arguments)) => (info.to_owned(), arguments.trim().to_owned()),
            None => (info_text.to_owned(), String::new()),
        };
        let explicit = attributes.classes.clone();
        attributes.classes.clear();
        attributes.add_class(&info);
        for class in &explicit {
            attributes.add_class(class);
        }

        let body: Vec<&str> = body.iter().map(String::as_str).collect();
        Some(BlockMatch::new(
            Block::Container(Container {
                fence_count: fence.count,
                info,
                arguments,
                attributes,
                blocks: processor.nested().parse_lines(&body),
            }),
            consumed,
        ))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}

/// `<div>` with the container's attributes.
#[derive(Debug, Default)]
pub struct HtmlCustomContainerRenderer;

impl Component for HtmlCustomContainerRenderer {}

impl ObjectRenderer<HtmlWriter> for HtmlCustomContainerRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Container(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(Block::Container(container)) = node.as_block() else {
            return;
        };
        let tags = ctx.writer.options().block_tags;
        ctx.writer.ensure_line();
        if tags {
            ctx.writer.write("<div");
            ctx.writer.write_attributes(&container.attributes);
            ctx.writer.write(">");
        }
        let implicit = ctx.writer.set_implicit_paragraph(false);
        ctx.render_blocks(&container.blocks);
        ctx.writer.set_implicit_paragraph(implicit);
        if tags {
            ctx.writer.ensure_line();
            ctx.writer.write_line("</div>");
        }
    }
}

/// `<span>` for `::text::` spans.
#[derive(Debug, Default)]
pub struct HtmlCustomContainerInlineRenderer;

impl Component for HtmlCustomContainerInlineRenderer {}

impl ObjectRenderer<HtmlWriter> for HtmlCustomContainerInlineRenderer {
    fn accept(&self, _: &HtmlWriter, node: Node<'_>) -> bool {
        node.as_span()
            .is_some_and(|span| span.delimiter == ':' && span.width == 2)
    }

    fn write(&self, ctx: &mut RenderContext<'_, HtmlWriter>, node: Node<'_>) {
        let Some(span) = node.as_span() else {
            return;
        };
        let tags = ctx.writer.options().inline_tags;
        if tags {
            ctx.writer.write("<span>");
        }
        ctx.render_inlines(&span.children);
        if tags {
            ctx.writer.write("</span>");
        }
    }
}

/// Writes containers back with their fence, info, arguments and attributes.
#[derive(Debug, Default)]
pub struct NormalizeCustomContainerRenderer;

impl Component for NormalizeCustomContainerRenderer {}

impl ObjectRenderer<NormalizeWriter> for NormalizeCustomContainerRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Container(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Block::Container(container)) = node.as_block() else {
            return;
        };
        let fence = ":".repeat(container.fence_count);

        ctx.writer.begin_block();
        ctx.writer.write(&fence);
        ctx.writer.write(&container.info);
        if !container.arguments.is_empty() {
            ctx.writer.write(" ");
            ctx.writer.write(&container.arguments);
        }
        // The info word is already written; only extra attributes remain.
        let mut attributes = container.attributes.clone();
        attributes.classes.retain(|class| *class != container.info);
        ctx.writer.write_attributes(&attributes);
        ctx.writer.write("\n");

        let compact = ctx.writer.set_compact(false);
        ctx.render_blocks(&container.blocks);
        ctx.writer.set_compact(compact);

        ctx.writer.ensure_line();
        ctx.writer.set_needs_blank(false);
        ctx.writer.write(&fence);
        ctx.writer.finish_block(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        PipelineBuilder::new().with_custom_containers().build().unwrap()
    }

    fn only_container(pipeline: &Pipeline, markdown: &str) -> Container {
        match pipeline.parse(markdown).blocks.as_slice() {
            [Block::Container(container)] => container.clone(),
            other => panic!("expected one container, got {other:?}"),
        }
    }

    #[test]
    fn test_container_info_arguments_and_attributes() {
        let container = only_container(&pipeline(), ":::warning Read this {#notice .wide}\nbody\n:::");
        assert_eq!(container.fence_count, 3);
        assert_eq!(container.info, "warning");
        assert_eq!(container.arguments, "Read this");
        assert_eq!(container.attributes.id.as_deref(), Some("notice"));
        assert_eq!(container.attributes.classes, vec!["warning", "wide"]);
        assert_eq!(container.blocks.len(), 1);
    }

    #[test]
    fn test_nested_containers() {
        let container = only_container(&pipeline(), "::::outer\n:::inner\ntext\n:::\n::::");
        assert_eq!(container.info, "outer");
        assert!(matches!(
            container.blocks.as_slice(),
            [Block::Container(inner)] if inner.info == "inner"
        ));
    }

    #[test]
    fn test_container_html() {
        assert_eq!(
            pipeline().to_html(":::note\nSome *text*\n:::").unwrap(),
            "<div class=\"note\">\n<p>Some <em>text</em></p>\n</div>\n"
        );
    }

    #[test]
    fn test_inline_span_html() {
        assert_eq!(
            pipeline().to_html("a ::marked:: word").unwrap(),
            "<p>a <span>marked</span> word</p>\n"
        );
    }

    #[test]
    fn test_container_round_trip() {
        let source = ":::tip Title {#t}\nFirst\n\nSecond ::x::\n:::\n\nAfter\n";
        assert_eq!(pipeline().normalize(source).unwrap(), source);
    }

    #[test]
    fn test_container_interrupts_paragraph() {
        let document = pipeline().parse("para\n:::box\nin\n:::");
        assert_eq!(document.blocks.len(), 2);
    }

    #[test]
    fn test_renderers_inserted_before_generic_ones() {
        let pipeline = pipeline();
        let renderer = pipeline.html_renderer().unwrap();
        let registry = renderer.object_renderers();
        assert_eq!(
            registry.position::<HtmlCustomContainerInlineRenderer>().map(|i| i + 1),
            registry.position::<EmphasisRenderer>()
        );
        assert!(
            registry.position::<HtmlCustomContainerRenderer>()
                < registry.position::<html::CodeBlockRenderer>()
        );
    }
}
