use super::NormalizeWriter;
use crate::registry::Component;
use crate::render::{ObjectRenderer, OutputWriter, RenderContext};
use crate::syntax::{Block, CodeBlockKind, List, Node};

#[derive(Debug, Default)]
pub struct ParagraphRenderer;

impl Component for ParagraphRenderer {}

impl ObjectRenderer<NormalizeWriter> for ParagraphRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Paragraph(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Block::Paragraph(paragraph)) = node.as_block() else {
            return;
        };
        ctx.writer.begin_block();
        ctx.render_inlines(&paragraph.inlines);
        ctx.writer.finish_block(true);
    }
}

/// ATX heading: `#` repeated by level.
#[derive(Debug, Default)]
pub struct HeadingRenderer;

impl Component for HeadingRenderer {}

impl ObjectRenderer<NormalizeWriter> for HeadingRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::Heading(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Block::Heading(heading)) = node.as_block() else {
            return;
        };
        let empty_line = ctx.writer.options().empty_line_after_heading;
        ctx.writer.begin_block();
        ctx.writer.write(&"#".repeat(usize::from(heading.level)));
        if !heading.inlines.is_empty() {
            ctx.writer.write(" ");
            ctx.render_inlines(&heading.inlines);
        }
        ctx.writer.finish_block(empty_line);
    }
}

#[derive(Debug, Default)]
pub struct ThematicBreakRenderer;

impl Component for ThematicBreakRenderer {}

impl ObjectRenderer<NormalizeWriter> for ThematicBreakRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::ThematicBreak(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Block::ThematicBreak(thematic_break)) = node.as_block() else {
            return;
        };
        ctx.writer.begin_block();
        ctx.writer
            .write(&thematic_break.marker.to_string().repeat(thematic_break.count));
        ctx.writer.finish_block(true);
    }
}

/// Indented code as indented code; every other kind fenced as written.
#[derive(Debug, Default)]
pub struct CodeBlockRenderer;

impl Component for CodeBlockRenderer {}

impl ObjectRenderer<NormalizeWriter> for CodeBlockRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        node.as_code_block().is_some()
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(code) = node.as_code_block() else {
            return;
        };
        let empty_line = ctx.writer.options().empty_line_after_code_block;
        ctx.writer.begin_block();

        if code.kind == CodeBlockKind::Indented {
            ctx.writer.push_indent("    ");
            for line in &code.lines {
                ctx.writer.write_line(line);
            }
            ctx.writer.pop_indent();
        } else {
            ctx.writer.write(&code.fence);
            ctx.writer.write(&code.info);
            if !code.arguments.is_empty() {
                ctx.writer.write(" ");
                ctx.writer.write(&code.arguments);
            }
            ctx.writer.write_attributes(&code.attributes);
            ctx.writer.write("\n");
            for line in &code.lines {
                ctx.writer.write_line(line);
            }
            ctx.writer.write(&code.fence);
        }

        ctx.writer.finish_block(empty_line);
    }
}

/// Lists, items indented under their marker.
#[derive(Debug, Default)]
pub struct ListRenderer;

impl Component for ListRenderer {}

impl ObjectRenderer<NormalizeWriter> for ListRenderer {
    fn accept(&self, _: &NormalizeWriter, node: Node<'_>) -> bool {
        matches!(node, Node::Block(Block::List(_)))
    }

    fn write(&self, ctx: &mut RenderContext<'_, NormalizeWriter>, node: Node<'_>) {
        let Some(Block::List(list)) = node.as_block() else {
            return;
        };
        let compact = ctx.writer.set_compact(!list.loose);

        for (index, item) in list.items.iter().enumerate() {
            let marker = item_marker(list, index);
            ctx.writer.begin_block();
            ctx.writer.write(&marker);
            if item.blocks.is_empty() {
                ctx.writer.finish_block(true);
                continue;
            }
            ctx.writer.write(" ");
            ctx.writer.push_indent(" ".repeat(marker.len() + 1));
            ctx.writer.continue_line();
            ctx.render_blocks(&item.blocks);
            ctx.writer.pop_indent();
        }

        ctx.writer.set_compact(compact);
        ctx.writer.finish_block(true);
    }
}

/// Marker of the item at `index`: the bullet, or the start value advanced by `index`.
fn item_marker(list: &List, index: usize) -> String {
    let marker = &list.marker;
    match (marker.numbering, &marker.start) {
        (Some(numbering), Some(start)) => {
            let first = numbering.value(start).unwrap_or(1);
            let offset = u64::try_from(index).unwrap_or(u64::MAX);
            format!("{}{}", numbering.format(first.saturating_add(offset)), marker.bullet)
        }
        _ => marker.bullet.to_string(),
    }
}
