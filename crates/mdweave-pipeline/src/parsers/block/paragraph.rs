use super::{BlockMatch, BlockParser, BlockProcessor, is_blank};
use crate::registry::Component;
use crate::syntax::{Block, Paragraph};

/// Fallback block: consecutive non-blank lines.
///
/// A paragraph ends at a blank line or where a parser that
/// [interrupts paragraphs](BlockParser::interrupts_paragraph) opens a block.
#[derive(Debug, Default)]
pub struct ParagraphParser;

impl Component for ParagraphParser {}

impl BlockParser for ParagraphParser {
    fn try_open(&self, processor: &BlockProcessor<'_>, lines: &[&str], start: usize) -> Option<BlockMatch> {
        if is_blank(lines[start]) {
            return None;
        }

        let mut end = start + 1;
        while end < lines.len() && !is_blank(lines[end]) && !processor.interrupts_paragraph(lines, end) {
            end += 1;
        }

        let text = lines[start..end]
            .iter()
            .map(|line| line.trim_start())
            .collect::<Vec<_>>()
            .join("\n");

        Some(BlockMatch::new(
            Block::Paragraph(Paragraph {
                inlines: processor.inlines().parse(text.trim_end()),
            }),
            end - start,
        ))
    }
}
