use super::soft_break;
use crate::parsers::{Cursor, InlineParser, InlineProcessor};
use crate::registry::Component;
use crate::syntax::{Inline, LineBreak};

/// Line endings inside a paragraph.
///
/// A line ending preceded by two or more spaces is a hard break, any other
/// is a soft break.
#[derive(Debug, Default)]
pub struct LineBreakParser;

impl Component for LineBreakParser {}

impl InlineParser for LineBreakParser {
    fn opening_chars(&self) -> &[char] {
        &['\n']
    }

    fn try_match(&self, _processor: &InlineProcessor<'_>, cursor: &mut Cursor<'_>) -> Option<Inline> {
        let hard = cursor.source()[..cursor.pos()].ends_with("  ");
        cursor.bump();
        if hard {
            Some(Inline::LineBreak(LineBreak {
                hard: true,
                backslash: false,
            }))
        } else {
            Some(soft_break())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::default_inline_parsers;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_soft_break() {
        let parsers = default_inline_parsers();
        let inlines = InlineProcessor::new(&parsers).parse("a \nb");
        assert_eq!(
            inlines,
            vec![Inline::text("a"), soft_break(), Inline::text("b")]
        );
    }
}
