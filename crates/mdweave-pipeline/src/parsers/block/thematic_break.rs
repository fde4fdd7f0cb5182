use super::{BlockMatch, BlockParser, BlockProcessor, block_start};
use crate::registry::Component;
use crate::syntax::{Block, ThematicBreak};

/// Three or more `*`, `-` or `_`, optionally separated by spaces.
#[derive(Debug, Default)]
pub struct ThematicBreakParser;

impl ThematicBreakParser {
    /// Parse a thematic break line.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<ThematicBreak> {
        let text = block_start(line)?;
        let marker = text.chars().next().filter(|c| matches!(c, '*' | '-' | '_'))?;

        let mut count = 0;
        for c in text.chars() {
            if c == marker {
                count += 1;
            } else if c != ' ' && c != '\t' {
                return None;
            }
        }

        (count >= 3).then_some(ThematicBreak { marker, count })
    }
}

impl Component for ThematicBreakParser {}

impl BlockParser for ThematicBreakParser {
    fn try_open(&self, _processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let thematic_break = Self::parse_line(lines[start])?;
        Some(BlockMatch::new(Block::ThematicBreak(thematic_break), 1))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}
