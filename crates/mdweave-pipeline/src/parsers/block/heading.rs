use super::{BlockMatch, BlockParser, BlockProcessor, block_start};
use crate::registry::Component;
use crate::syntax::{Block, Heading};

/// ATX headings: `#` to `######` followed by a space or the end of the line.
///
/// A closing sequence of `#` preceded by a space is dropped.
#[derive(Debug, Default)]
pub struct HeadingParser;

impl HeadingParser {
    /// Split a heading line into its level and raw content.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<(u8, &str)> {
        let text = block_start(line)?;
        let level = text.chars().take_while(|&c| c == '#').count();
        if !(1..=6).contains(&level) {
            return None;
        }

        let rest = &text[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }

        let mut content = rest.trim();
        let without_closing = content.trim_end_matches('#');
        if without_closing.is_empty() {
            content = "";
        } else if without_closing.ends_with([' ', '\t']) {
            content = without_closing.trim_end();
        }

        // `level` is 1..=6.
        Some((u8::try_from(level).unwrap_or(6), content))
    }
}

impl Component for HeadingParser {}

impl BlockParser for HeadingParser {
    fn try_open(&self, processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        let (level, content) = Self::parse_line(lines[start])?;
        Some(BlockMatch::new(
            Block::Heading(Heading {
                level,
                inlines: processor.inlines().parse(content),
            }),
            1,
        ))
    }

    fn interrupts_paragraph(&self) -> bool {
        true
    }
}
