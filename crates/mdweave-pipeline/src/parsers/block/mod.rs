//! Block parsing.
//!
//! Documents are split into lines and handed to the [`BlockProcessor`]. At
//! every non-blank line the block parsers are asked in registry order to open
//! a block there; the first that does decides how many lines it consumes.
//! Container blocks (list items, custom containers) parse their inner lines
//! with a [`nested`](BlockProcessor::nested) processor.

mod code;
mod heading;
mod list;
mod paragraph;
mod thematic_break;

pub use code::{Fence, FencedCodeParser, IndentedCodeParser};
pub use heading::HeadingParser;
pub use list::{BulletItemParser, ListBlockParser, ListItemParser, OrderedItemParser};
pub use paragraph::ParagraphParser;
pub use thematic_break::ThematicBreakParser;

use tracing::trace;

use crate::parsers::InlineProcessor;
use crate::registry::{AsComponent, OrderedList};
use crate::syntax::{Block, Document};

/// A block opened by a parser.
#[derive(Debug)]
pub struct BlockMatch {
    pub block: Block,
    /// Number of lines consumed, at least 1.
    pub consumed: usize,
}

impl BlockMatch {
    #[must_use]
    pub fn new(block: Block, consumed: usize) -> Self {
        Self { block, consumed }
    }
}

/// A pluggable block grammar.
pub trait BlockParser: AsComponent {
    /// Try to open a block at `lines[start]`.
    ///
    /// `lines` holds every line of the enclosing container; parsers may look
    /// ahead as far as they need.
    fn try_open(
        &self,
        processor: &BlockProcessor<'_>,
        lines: &[&str],
        start: usize,
    ) -> Option<BlockMatch>;

    /// Whether this block may start in the middle of a paragraph.
    fn interrupts_paragraph(&self) -> bool {
        false
    }
}

/// Runs a block parser registry over lines.
pub struct BlockProcessor<'a> {
    parsers: &'a OrderedList<dyn BlockParser>,
    inlines: InlineProcessor<'a>,
    depth: usize,
}

impl<'a> BlockProcessor<'a> {
    #[must_use]
    pub fn new(
        parsers: &'a OrderedList<dyn BlockParser>,
        inline_parsers: &'a OrderedList<dyn crate::parsers::InlineParser>,
    ) -> Self {
        Self {
            parsers,
            inlines: InlineProcessor::new(inline_parsers),
            depth: 0,
        }
    }

    /// Processor for the content of a container block.
    #[must_use]
    pub fn nested(&self) -> Self {
        Self {
            parsers: self.parsers,
            inlines: InlineProcessor::new(self.inlines.parsers()),
            depth: self.depth + 1,
        }
    }

    #[must_use]
    pub fn inlines(&self) -> &InlineProcessor<'a> {
        &self.inlines
    }

    /// Container nesting depth, 0 for the document itself.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parse a whole document.
    #[must_use]
    pub fn parse_document(&self, text: &str) -> Document {
        let lines: Vec<&str> = text.lines().collect();
        Document {
            blocks: self.parse_lines(&lines),
        }
    }

    /// Parse the lines of one container.
    #[must_use]
    pub fn parse_lines(&self, lines: &[&str]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            if is_blank(lines[index]) {
                index += 1;
                continue;
            }

            match self.open_block(lines, index) {
                Some(matched) => {
                    blocks.push(matched.block);
                    index += matched.consumed.max(1);
                }
                None => {
                    trace!(line = index, "no block parser claimed line");
                    index += 1;
                }
            }
        }

        blocks
    }

    fn open_block(&self, lines: &[&str], start: usize) -> Option<BlockMatch> {
        self.parsers
            .iter()
            .find_map(|parser| parser.try_open(self, lines, start))
    }

    /// Whether a block that may interrupt a paragraph opens at `lines[start]`.
    #[must_use]
    pub fn interrupts_paragraph(&self, lines: &[&str], start: usize) -> bool {
        self.parsers
            .iter()
            .filter(|parser| parser.interrupts_paragraph())
            .any(|parser| parser.try_open(self, lines, start).is_some())
    }
}

/// Whether a line holds only whitespace.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Indentation width in columns, tabs advancing to the next multiple of 4.
#[must_use]
pub fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Remove up to `columns` columns of indentation.
#[must_use]
pub fn strip_indent(line: &str, columns: usize) -> &str {
    let mut width = 0;
    for (i, c) in line.char_indices() {
        if width >= columns {
            return &line[i..];
        }
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => return &line[i..],
        }
    }
    if width >= columns { "" } else { line.trim_start() }
}

/// The line without its indentation, if it is indented at most 3 columns.
#[must_use]
pub fn block_start(line: &str) -> Option<&str> {
    (indent_width(line) < 4).then(|| line.trim_start())
}
