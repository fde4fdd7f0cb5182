//! Syntax tree produced by parsing and consumed by renderers.

mod attributes;
mod block;
mod inline;
mod node;

pub use attributes::HtmlAttributes;
pub use block::{
    Block, CodeBlock, CodeBlockKind, Container, Heading, List, ListItem, ListMarker, Numbering,
    Paragraph, ThematicBreak,
};
pub use inline::{CodeSpan, Inline, LineBreak, Link, LinkKind, Literal, SpanNode, plain_text};
pub use node::Node;

/// A parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Spans with `delimiter` anywhere in the document, in document order.
    #[must_use]
    pub fn spans(&self, delimiter: char) -> Vec<&SpanNode> {
        let mut found = Vec::new();
        for block in &self.blocks {
            collect_block_spans(block, delimiter, &mut found);
        }
        found
    }
}

fn collect_block_spans<'a>(block: &'a Block, delimiter: char, found: &mut Vec<&'a SpanNode>) {
    match block {
        Block::Paragraph(Paragraph { inlines }) | Block::Heading(Heading { inlines, .. }) => {
            collect_inline_spans(inlines, delimiter, found);
        }
        Block::List(list) => {
            for item in &list.items {
                for child in &item.blocks {
                    collect_block_spans(child, delimiter, found);
                }
            }
        }
        Block::Container(container) => {
            for child in &container.blocks {
                collect_block_spans(child, delimiter, found);
            }
        }
        Block::ThematicBreak(_) | Block::CodeBlock(_) => {}
    }
}

fn collect_inline_spans<'a>(inlines: &'a [Inline], delimiter: char, found: &mut Vec<&'a SpanNode>) {
    for inline in inlines {
        match inline {
            Inline::Span(span) => {
                if span.delimiter == delimiter {
                    found.push(span);
                }
                collect_inline_spans(&span.children, delimiter, found);
            }
            Inline::Link(link) => collect_inline_spans(&link.children, delimiter, found),
            _ => {}
        }
    }
}
