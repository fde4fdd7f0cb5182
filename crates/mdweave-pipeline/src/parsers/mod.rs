//! Block and inline parser registries.

pub mod block;
mod cursor;
pub mod inline;

pub use block::{BlockMatch, BlockParser, BlockProcessor};
pub use cursor::Cursor;
pub use inline::{InlineParser, InlineProcessor};

use crate::delimiter::DelimiterParser;
use crate::registry::OrderedList;

/// Default block parsers in priority order.
#[must_use]
pub fn default_block_parsers() -> OrderedList<dyn BlockParser> {
    let mut parsers: OrderedList<dyn BlockParser> = OrderedList::new();
    parsers.push(Box::new(block::ThematicBreakParser));
    parsers.push(Box::new(block::HeadingParser));
    parsers.push(Box::new(block::FencedCodeParser));
    parsers.push(Box::new(block::IndentedCodeParser));
    parsers.push(Box::new(block::ListBlockParser::new()));
    parsers.push(Box::new(block::ParagraphParser));
    parsers
}

/// Default inline parsers in priority order.
#[must_use]
pub fn default_inline_parsers() -> OrderedList<dyn InlineParser> {
    let mut parsers: OrderedList<dyn InlineParser> = OrderedList::new();
    parsers.push(Box::new(inline::EscapeParser));
    parsers.push(Box::new(inline::CodeSpanParser));
    parsers.push(Box::new(inline::AutolinkParser));
    parsers.push(Box::new(inline::LinkParser));
    parsers.push(Box::new(DelimiterParser::new()));
    parsers.push(Box::new(inline::LineBreakParser));
    parsers
}
