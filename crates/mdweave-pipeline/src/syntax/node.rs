use super::{Block, CodeBlock, CodeBlockKind, Inline, SpanNode};

/// Borrowed view of any node offered to object renderers.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Block(&'a Block),
    Inline(&'a Inline),
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn as_block(self) -> Option<&'a Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Inline(_) => None,
        }
    }

    #[must_use]
    pub fn as_inline(self) -> Option<&'a Inline> {
        match self {
            Node::Inline(inline) => Some(inline),
            Node::Block(_) => None,
        }
    }

    /// The node as a code block of any kind.
    #[must_use]
    pub fn as_code_block(self) -> Option<&'a CodeBlock> {
        match self {
            Node::Block(Block::CodeBlock(code)) => Some(code),
            _ => None,
        }
    }

    /// Whether the node is a code block of `kind`.
    #[must_use]
    pub fn is_code_block(self, kind: CodeBlockKind) -> bool {
        self.as_code_block().is_some_and(|code| code.kind == kind)
    }

    #[must_use]
    pub fn as_span(self) -> Option<&'a SpanNode> {
        match self {
            Node::Inline(Inline::Span(span)) => Some(span),
            _ => None,
        }
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(block: &'a Block) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Inline> for Node<'a> {
    fn from(inline: &'a Inline) -> Self {
        Node::Inline(inline)
    }
}
